//! mrk-config
//!
//! Layered YAML settings. Documents merge in order (later overrides
//! earlier), the result is canonicalized and hashed so a reconciliation run
//! can be tied to the exact settings it used, and credential-looking literals
//! are refused outright: tokens belong to the transport collaborator, never
//! to these files.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

mod settings;

pub use settings::{
    FeeSettings, Granularity, ListingSettings, MarketplaceSettings, OrderSettings, PagingSettings,
    Settings, TransactionSettings, MAX_DAYS,
};

/// Leaf strings starting with any of these abort the load.
const SECRET_PREFIXES: &[&str] = &[
    "v^1.1#",     // marketplace OAuth user token
    "AgAAAA",     // legacy Auth'n'Auth token
    "sk-",        // generic API secret
    "AKIA",       // AWS access key ID
    "-----BEGIN", // PEM private keys
    "ghp_",       // GitHub PAT
    "glpat-",     // GitLab PAT
    "xoxb-",      // Slack bot token
];

/// Leaf key names whose values are refused regardless of shape.
const SECRET_KEYS: &[&str] = &[
    "token",
    "access_token",
    "refresh_token",
    "client_secret",
    "cert_id",
    "password",
];

/// JSON-pointer prefixes read by [`Settings`]. Anything outside them is
/// reported by [`report_unknown_keys`].
pub const KNOWN_POINTERS: &[&str] = &[
    "/marketplace/marketplace_id",
    "/paging/orders_page_size",
    "/paging/listings_page_size",
    "/paging/transactions_page_size",
    "/paging/ads_page_size",
    "/orders/lookback_days",
    "/listings/lookback_days",
    "/listings/granularity",
    "/transactions/window_days",
    "/fees/keyword",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnknownKeyPolicy {
    Warn,
    Fail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnknownKeyReport {
    /// Leaf pointers not covered by [`KNOWN_POINTERS`] (sorted).
    pub unknown_leaf_pointers: Vec<String>,
}

impl UnknownKeyReport {
    pub fn is_clean(&self) -> bool {
        self.unknown_leaf_pointers.is_empty()
    }
}

/// Report config leaves no setting reads (typos, stale sections).
/// `Fail` turns a non-empty report into an error; `Warn` always returns it.
pub fn report_unknown_keys(config_json: &Value, policy: UnknownKeyPolicy) -> Result<UnknownKeyReport> {
    let unknown: BTreeSet<String> = leaves(config_json)
        .into_iter()
        .filter(|leaf| !KNOWN_POINTERS.iter().any(|known| covers(known, &leaf.pointer)))
        .map(|leaf| leaf.pointer)
        .collect();

    let report = UnknownKeyReport {
        unknown_leaf_pointers: unknown.into_iter().collect(),
    };
    if policy == UnknownKeyPolicy::Fail && !report.is_clean() {
        let first: Vec<&str> = report
            .unknown_leaf_pointers
            .iter()
            .take(12)
            .map(String::as_str)
            .collect();
        bail!(
            "CONFIG_UNKNOWN_KEYS: {} unknown config key(s): {}",
            report.unknown_leaf_pointers.len(),
            first.join(", ")
        );
    }
    Ok(report)
}

/// Whether the setting at `known` reads `pointer`: the same pointer, or one
/// nested under it (`/fees` covers `/fees/keyword`, not `/feesx`).
fn covers(known: &str, pointer: &str) -> bool {
    pointer == known
        || pointer
            .strip_prefix(known)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// A scalar (or empty container) in a settings document.
struct Leaf<'a> {
    /// JSON pointer, tokens escaped (`~0`, `~1`).
    pointer: String,
    /// Nearest object key above the leaf (array slots inherit it).
    key: Option<&'a str>,
    value: &'a Value,
}

fn leaves(root: &Value) -> Vec<Leaf<'_>> {
    let mut out = Vec::new();
    let mut stack = vec![(String::new(), None, root)];
    while let Some((pointer, key, value)) = stack.pop() {
        match value {
            Value::Object(map) if !map.is_empty() => {
                for (k, child) in map {
                    let token = k.replace('~', "~0").replace('/', "~1");
                    stack.push((format!("{pointer}/{token}"), Some(k.as_str()), child));
                }
            }
            Value::Array(items) if !items.is_empty() => {
                for (i, child) in items.iter().enumerate() {
                    stack.push((format!("{pointer}/{i}"), key, child));
                }
            }
            _ if pointer.is_empty() => {}
            _ => out.push(Leaf {
                pointer,
                key,
                value,
            }),
        }
    }
    out
}

// -----------------------------------------------------------------------------
// Loading
// -----------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config_hash: String,
    pub canonical_json: String,
    pub config_json: Value,
}

impl LoadedConfig {
    /// Typed, validated settings (defaults fill anything absent).
    pub fn settings(&self) -> Result<Settings> {
        let settings: Settings = serde_json::from_value(self.config_json.clone())
            .context("config does not match the settings schema")?;
        settings.validate()?;
        Ok(settings)
    }
}

pub fn load_layered_yaml<P: AsRef<Path>>(paths: &[P]) -> Result<LoadedConfig> {
    let mut docs: Vec<String> = Vec::with_capacity(paths.len());
    for p in paths {
        let p = p.as_ref();
        let raw = fs::read_to_string(p)
            .with_context(|| format!("failed to read yaml path: {}", p.display()))?;
        docs.push(raw);
    }
    let doc_refs: Vec<&str> = docs.iter().map(String::as_str).collect();
    load_layered_yaml_from_strings(&doc_refs)
}

pub fn load_layered_yaml_from_strings(yaml_docs: &[&str]) -> Result<LoadedConfig> {
    let mut merged = serde_json::json!({});
    for (i, raw) in yaml_docs.iter().enumerate() {
        let v_yaml: serde_yaml::Value =
            serde_yaml::from_str(raw).with_context(|| format!("invalid yaml in layer {i}"))?;
        let v_json = match serde_json::to_value(v_yaml).context("yaml->json conversion failed")? {
            // An empty document is an empty layer.
            Value::Null => serde_json::json!({}),
            other => other,
        };
        merge_layer(&mut merged, v_json);
    }

    enforce_no_secret_literals(&merged)?;

    let (canonical_json, config_hash) = fingerprint(&merged)?;
    Ok(LoadedConfig {
        config_hash,
        canonical_json,
        config_json: merged,
    })
}

/// Merge `layer` into `base`: objects merge key by key, anything else in
/// `layer` replaces what was there.
fn merge_layer(base: &mut Value, layer: Value) {
    match layer {
        Value::Object(layer_map) if base.is_object() => {
            let Some(base_map) = base.as_object_mut() else {
                return;
            };
            for (k, v) in layer_map {
                match base_map.get_mut(&k) {
                    Some(existing) => merge_layer(existing, v),
                    None => {
                        base_map.insert(k, v);
                    }
                }
            }
        }
        other => *base = other,
    }
}

/// Compact JSON plus its SHA-256. `serde_json::Map` is key-sorted, so equal
/// settings render and hash identically whatever the source key order.
fn fingerprint(v: &Value) -> Result<(String, String)> {
    let canonical = serde_json::to_string(v).context("canonical json serialize failed")?;
    let hash = hex::encode(Sha256::digest(canonical.as_bytes()));
    Ok((canonical, hash))
}

/// Refuse credential-looking strings and any non-blank value under a secret
/// key name (also inside lists kept under that key).
fn enforce_no_secret_literals(v: &Value) -> Result<()> {
    for leaf in leaves(v) {
        let Some(s) = leaf.value.as_str() else {
            continue;
        };
        let secret_key = leaf.key.is_some_and(|k| SECRET_KEYS.contains(&k));
        if looks_like_secret(s) || (secret_key && !s.trim().is_empty()) {
            bail!("CONFIG_SECRET_DETECTED leaf={} value=REDACTED", leaf.pointer);
        }
    }
    Ok(())
}

fn looks_like_secret(s: &str) -> bool {
    let t = s.trim();
    t.len() >= 8 && SECRET_PREFIXES.iter().any(|p| t.starts_with(p))
}
