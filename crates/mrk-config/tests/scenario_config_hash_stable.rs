//! Hash determinism: equal effective settings hash equally regardless of key
//! order, and any changed value changes the hash.

use mrk_config::load_layered_yaml_from_strings;

const BASE_YAML: &str = r#"
marketplace:
  marketplace_id: "EBAY_US"
paging:
  orders_page_size: 50
  transactions_page_size: 200
fees:
  keyword: "Promoted Listings"
"#;

const BASE_YAML_REORDERED: &str = r#"
fees:
  keyword: "Promoted Listings"
paging:
  transactions_page_size: 200
  orders_page_size: 50
marketplace:
  marketplace_id: "EBAY_US"
"#;

const OVERLAY_YAML: &str = r#"
marketplace:
  marketplace_id: "EBAY_GB"
transactions:
  window_days: 3
"#;

#[test]
fn same_input_produces_identical_hash() {
    let a = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();
    let b = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();
    assert_eq!(a.config_hash, b.config_hash);
    assert_eq!(a.canonical_json, b.canonical_json);
}

#[test]
fn reordered_keys_produce_same_hash() {
    let base = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();
    let reordered = load_layered_yaml_from_strings(&[BASE_YAML_REORDERED]).unwrap();
    assert_eq!(
        base.config_hash, reordered.config_hash,
        "key order in YAML must not change the hash"
    );
}

#[test]
fn overlay_changes_hash_and_values() {
    let base = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();
    let merged = load_layered_yaml_from_strings(&[BASE_YAML, OVERLAY_YAML]).unwrap();
    assert_ne!(base.config_hash, merged.config_hash);

    let settings = merged.settings().unwrap();
    assert_eq!(settings.marketplace.marketplace_id, "EBAY_GB");
    assert_eq!(settings.transactions.window_days, 3);
    assert_eq!(settings.paging.orders_page_size, 50);
}

#[test]
fn hash_is_64_hex_chars() {
    let loaded = load_layered_yaml_from_strings(&[BASE_YAML]).unwrap();
    assert_eq!(loaded.config_hash.len(), 64);
    assert!(loaded.config_hash.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn empty_layers_are_allowed() {
    let a = load_layered_yaml_from_strings(&["{}"]).unwrap();
    let b = load_layered_yaml_from_strings(&[""]).unwrap();
    assert_eq!(a.config_hash, b.config_hash);
    assert_eq!(a.canonical_json, "{}");
}
