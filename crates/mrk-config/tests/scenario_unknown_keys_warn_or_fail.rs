use mrk_config::{load_layered_yaml_from_strings, report_unknown_keys, UnknownKeyPolicy};

const YAML: &str = r#"
paging:
  orders_page_size: 25
  order_page_size: 10
fees:
  keyword: "Promoted Listings"
legacy:
  store_name: "shop"
"#;

#[test]
fn warn_reports_typos_and_stale_sections() {
    let loaded = load_layered_yaml_from_strings(&[YAML]).unwrap();
    let report = report_unknown_keys(&loaded.config_json, UnknownKeyPolicy::Warn).unwrap();
    assert_eq!(
        report.unknown_leaf_pointers,
        vec!["/legacy/store_name".to_string(), "/paging/order_page_size".to_string()]
    );
}

#[test]
fn fail_policy_errors_on_unknown_keys() {
    let loaded = load_layered_yaml_from_strings(&[YAML]).unwrap();
    let err = report_unknown_keys(&loaded.config_json, UnknownKeyPolicy::Fail).unwrap_err();
    assert!(err.to_string().contains("CONFIG_UNKNOWN_KEYS"));
}

#[test]
fn known_keys_only_is_clean() {
    let loaded = load_layered_yaml_from_strings(&["transactions:\n  window_days: 2\n"]).unwrap();
    let report = report_unknown_keys(&loaded.config_json, UnknownKeyPolicy::Fail).unwrap();
    assert!(report.is_clean());
}
