//! Identifier candidates.
//!
//! The platform names the same identity in several ways: an order is either a
//! direct `order_id` field or an `ORDER_ID` entry in a `references` list; a
//! listing is keyed by `ItemID` or, failing that, `SKU`; an ad points at
//! either an `inventory_reference_id` or a `listing_id`. Each of those is a
//! tagged [`IdentifierCandidate`], extracted by strategies tried in a fixed
//! priority order. All values are string-coerced and never empty.

use serde::Serialize;

use mrk_record::CanonicalValue;

/// Reference type marking an order reference inside `references`.
pub const ORDER_REFERENCE_TYPE: &str = "ORDER_ID";

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum IdentifierCandidate {
    ItemId(String),
    Sku(String),
    DirectOrderId(String),
    OrderReference(String),
    InventoryReference(String),
    ListingId(String),
}

impl IdentifierCandidate {
    pub fn value(&self) -> &str {
        match self {
            Self::ItemId(v)
            | Self::Sku(v)
            | Self::DirectOrderId(v)
            | Self::OrderReference(v)
            | Self::InventoryReference(v)
            | Self::ListingId(v) => v,
        }
    }

    pub fn into_value(self) -> String {
        match self {
            Self::ItemId(v)
            | Self::Sku(v)
            | Self::DirectOrderId(v)
            | Self::OrderReference(v)
            | Self::InventoryReference(v)
            | Self::ListingId(v) => v,
        }
    }
}

type Strategy = (&'static str, fn(String) -> IdentifierCandidate);

const LISTING_KEY: &[Strategy] = &[
    ("ItemID", IdentifierCandidate::ItemId),
    ("SKU", IdentifierCandidate::Sku),
];

const AD_IDENTIFIERS: &[Strategy] = &[
    ("inventory_reference_id", IdentifierCandidate::InventoryReference),
    ("listing_id", IdentifierCandidate::ListingId),
];

fn candidates<'a>(
    record: &'a CanonicalValue,
    strategies: &'a [Strategy],
) -> impl Iterator<Item = IdentifierCandidate> + 'a {
    strategies
        .iter()
        .filter_map(move |(field, tag)| record.get(field).id_string().map(tag))
}

/// Identity key of a listing: `ItemID`, else `SKU`, else none.
pub fn listing_key(listing: &CanonicalValue) -> Option<IdentifierCandidate> {
    candidates(listing, LISTING_KEY).next()
}

/// Every identifier an ad carries (both kinds, falsy values dropped).
pub fn ad_identifiers(ad: &CanonicalValue) -> Vec<IdentifierCandidate> {
    candidates(ad, AD_IDENTIFIERS).collect()
}

/// Order identifiers a transaction claims.
///
/// A non-empty direct `order_id` is authoritative and is the only candidate.
/// Without it, every `ORDER_ID` reference is a candidate.
pub fn order_candidates(tx: &CanonicalValue) -> Vec<IdentifierCandidate> {
    if let Some(direct) = tx.get("order_id").id_string() {
        return vec![IdentifierCandidate::DirectOrderId(direct)];
    }
    tx.get("references")
        .as_seq()
        .into_iter()
        .filter(|r| r.get("reference_type").as_str() == Some(ORDER_REFERENCE_TYPE))
        .filter_map(|r| r.get("reference_id").id_string())
        .map(IdentifierCandidate::OrderReference)
        .collect()
}

/// Transaction membership: does `tx` belong to `order_id`?
pub fn belongs_to_order(tx: &CanonicalValue, order_id: &str) -> bool {
    let order_id = order_id.trim();
    !order_id.is_empty() && order_candidates(tx).iter().any(|c| c.value() == order_id)
}
