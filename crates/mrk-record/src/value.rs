use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// A normalized record: field name -> value, key-ordered.
pub type CanonicalRecord = BTreeMap<String, CanonicalValue>;

static ABSENT: CanonicalValue = CanonicalValue::Null;

/// Canonical form of any source-provided value.
///
/// `Null` doubles as "absent": lookups of missing fields return a reference
/// to a shared `Null` so callers can chain [`CanonicalValue::path`] without
/// unwrapping at every level.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CanonicalValue {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Seq(Vec<CanonicalValue>),
    Record(CanonicalRecord),
}

impl CanonicalValue {
    pub fn is_absent(&self) -> bool {
        matches!(self, CanonicalValue::Null)
    }

    /// Field lookup. Non-records and missing keys yield `Null`.
    pub fn get(&self, key: &str) -> &CanonicalValue {
        match self {
            CanonicalValue::Record(r) => r.field(key),
            _ => &ABSENT,
        }
    }

    /// Nested field lookup, e.g. `["ShippingDetails", "ShipmentTrackingDetails"]`.
    /// An empty path yields `self`.
    pub fn path(&self, keys: &[&str]) -> &CanonicalValue {
        keys.iter().fold(self, |v, k| v.get(k))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            CanonicalValue::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&CanonicalRecord> {
        match self {
            CanonicalValue::Record(r) => Some(r),
            _ => None,
        }
    }

    /// Presence test used by every "non-empty field" rule.
    ///
    /// `Null`, `false`, zero, empty strings, empty sequences and empty
    /// records are all treated as "no evidence".
    pub fn is_truthy(&self) -> bool {
        match self {
            CanonicalValue::Null => false,
            CanonicalValue::Bool(b) => *b,
            CanonicalValue::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
            CanonicalValue::String(s) => !s.trim().is_empty(),
            CanonicalValue::Seq(items) => !items.is_empty(),
            CanonicalValue::Record(r) => !r.is_empty(),
        }
    }

    /// Singleton-vs-sequence coercion.
    ///
    /// A sequence yields its elements, `Null` yields nothing, and any other
    /// value is treated as a one-element sequence.
    pub fn as_seq(&self) -> Vec<&CanonicalValue> {
        match self {
            CanonicalValue::Seq(items) => items.iter().collect(),
            CanonicalValue::Null => Vec::new(),
            other => vec![other],
        }
    }

    /// Textual form of a scalar (strings as-is, numbers rendered).
    pub fn text(&self) -> Option<String> {
        match self {
            CanonicalValue::String(s) => Some(s.clone()),
            CanonicalValue::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Identifier coercion: every identifier is compared in string form.
    ///
    /// Returns `None` for falsy values and for anything that is not a string
    /// or number, so empty identifiers never enter an identity set.
    pub fn id_string(&self) -> Option<String> {
        match self {
            CanonicalValue::String(s) => {
                let t = s.trim();
                if t.is_empty() {
                    None
                } else {
                    Some(t.to_string())
                }
            }
            CanonicalValue::Number(n) if self.is_truthy() => Some(n.to_string()),
            _ => None,
        }
    }
}

/// Field access on a bare [`CanonicalRecord`].
///
/// Nested lookups go through the first field's value, e.g.
/// `rec.field("ListingDetails").path(&["EndTime"])`, so an empty path is
/// always the value it starts from.
pub trait RecordExt {
    fn field(&self, key: &str) -> &CanonicalValue;
}

impl RecordExt for CanonicalRecord {
    fn field(&self, key: &str) -> &CanonicalValue {
        self.get(key).unwrap_or(&ABSENT)
    }
}

impl From<Value> for CanonicalValue {
    fn from(v: Value) -> Self {
        match v {
            Value::Null => CanonicalValue::Null,
            Value::Bool(b) => CanonicalValue::Bool(b),
            Value::Number(n) => CanonicalValue::Number(n),
            Value::String(s) => CanonicalValue::String(s),
            Value::Array(items) => {
                CanonicalValue::Seq(items.into_iter().map(CanonicalValue::from).collect())
            }
            Value::Object(map) => CanonicalValue::Record(
                map.into_iter()
                    .map(|(k, v)| (k, CanonicalValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for CanonicalValue {
    fn from(s: &str) -> Self {
        CanonicalValue::String(s.to_string())
    }
}

impl From<String> for CanonicalValue {
    fn from(s: String) -> Self {
        CanonicalValue::String(s)
    }
}

impl From<bool> for CanonicalValue {
    fn from(b: bool) -> Self {
        CanonicalValue::Bool(b)
    }
}

impl From<i64> for CanonicalValue {
    fn from(n: i64) -> Self {
        CanonicalValue::Number(Number::from(n))
    }
}

impl From<CanonicalRecord> for CanonicalValue {
    fn from(r: CanonicalRecord) -> Self {
        CanonicalValue::Record(r)
    }
}

impl From<Vec<CanonicalValue>> for CanonicalValue {
    fn from(items: Vec<CanonicalValue>) -> Self {
        CanonicalValue::Seq(items)
    }
}
