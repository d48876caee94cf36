//! mrk-record
//!
//! Canonical record model shared by every reconciliation component.
//!
//! Marketplace responses arrive as nested objects whose shape varies by
//! endpoint and by page: a field that is "a list" may be one bare object,
//! nested containers may be missing, identifiers may be numbers or strings.
//! This crate owns the single in-memory shape ([`CanonicalValue`]) that all
//! of those are normalized into, plus the decimal money parser used when a
//! record carries an amount.
//!
//! Pure data. No IO, no sources, no clocks.

pub mod money;
mod normalize;
mod value;

pub use money::{parse_micros, Money, MoneyError, MICROS_SCALE};
pub use normalize::{normalize, SelfSerialize, SourceNode, PRIVATE_MARKER};
pub use value::{CanonicalRecord, CanonicalValue, RecordExt};
