//! Recursive normalization of heterogeneous source values.
//!
//! Marketplace SDK layers hand back a mix of plain mappings, objects that can
//! serialize themselves, attribute-bearing objects and sequences. A
//! [`SourceNode`] captures that input shape; [`normalize`] folds it into a
//! [`CanonicalValue`].
//!
//! Dispatch order (first match wins):
//! 1. mapping            -> normalize every value, keep keys
//! 2. self-serializing   -> normalize the serialized form
//! 3. attribute object   -> normalize public attributes (names not starting with `_`)
//! 4. sequence           -> normalize every element, keep order
//! 5. anything else      -> scalar returned unchanged
//!
//! Normalization is total and idempotent. It assumes an acyclic input: a
//! [`SelfSerialize`] implementation that returns itself would recurse forever.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::{CanonicalRecord, CanonicalValue};

/// Attribute names starting with this marker are implementation-private and
/// never reach the canonical form.
pub const PRIVATE_MARKER: char = '_';

/// Capability of a source object to produce its own serialized form.
pub trait SelfSerialize: Send + Sync {
    fn to_source(&self) -> SourceNode;
}

/// Input shape accepted by [`normalize`].
#[derive(Clone)]
pub enum SourceNode {
    /// Leaf value (or an already-canonical value, returned unchanged).
    Scalar(CanonicalValue),
    /// Mapping-like input.
    Map(Vec<(String, SourceNode)>),
    /// Object exposing a self-serialization capability.
    Serializable(Arc<dyn SelfSerialize>),
    /// Object exposing introspectable attributes (private ones included; they
    /// are filtered during normalization).
    Object(Vec<(String, SourceNode)>),
    /// Sequence-like input.
    Seq(Vec<SourceNode>),
}

impl SourceNode {
    pub fn absent() -> Self {
        SourceNode::Scalar(CanonicalValue::Null)
    }

    pub fn serializable(obj: impl SelfSerialize + 'static) -> Self {
        SourceNode::Serializable(Arc::new(obj))
    }

    pub fn object<K: Into<String>>(attrs: impl IntoIterator<Item = (K, SourceNode)>) -> Self {
        SourceNode::Object(attrs.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn map<K: Into<String>>(entries: impl IntoIterator<Item = (K, SourceNode)>) -> Self {
        SourceNode::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl fmt::Debug for SourceNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceNode::Scalar(v) => f.debug_tuple("Scalar").field(v).finish(),
            SourceNode::Map(entries) => f.debug_tuple("Map").field(entries).finish(),
            SourceNode::Serializable(_) => f.write_str("Serializable(..)"),
            SourceNode::Object(attrs) => f.debug_tuple("Object").field(attrs).finish(),
            SourceNode::Seq(items) => f.debug_tuple("Seq").field(items).finish(),
        }
    }
}

impl From<Value> for SourceNode {
    fn from(v: Value) -> Self {
        match v {
            Value::Object(map) => {
                SourceNode::Map(map.into_iter().map(|(k, v)| (k, SourceNode::from(v))).collect())
            }
            Value::Array(items) => SourceNode::Seq(items.into_iter().map(SourceNode::from).collect()),
            scalar => SourceNode::Scalar(CanonicalValue::from(scalar)),
        }
    }
}

impl From<CanonicalValue> for SourceNode {
    fn from(v: CanonicalValue) -> Self {
        match v {
            CanonicalValue::Record(r) => {
                SourceNode::Map(r.into_iter().map(|(k, v)| (k, SourceNode::from(v))).collect())
            }
            CanonicalValue::Seq(items) => {
                SourceNode::Seq(items.into_iter().map(SourceNode::from).collect())
            }
            scalar => SourceNode::Scalar(scalar),
        }
    }
}

/// Normalize any [`SourceNode`] into its canonical form. Never fails.
pub fn normalize(node: SourceNode) -> CanonicalValue {
    match node {
        SourceNode::Map(entries) => CanonicalValue::Record(normalize_entries(entries, false)),
        SourceNode::Serializable(obj) => normalize(obj.to_source()),
        SourceNode::Object(attrs) => CanonicalValue::Record(normalize_entries(attrs, true)),
        SourceNode::Seq(items) => CanonicalValue::Seq(items.into_iter().map(normalize).collect()),
        SourceNode::Scalar(v) => v,
    }
}

fn normalize_entries(entries: Vec<(String, SourceNode)>, skip_private: bool) -> CanonicalRecord {
    entries
        .into_iter()
        .filter(|(k, _)| !(skip_private && k.starts_with(PRIVATE_MARKER)))
        .map(|(k, v)| (k, normalize(v)))
        .collect()
}
