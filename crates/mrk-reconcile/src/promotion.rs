//! Promotion reconciliation between listings and campaign ads.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use mrk_record::CanonicalValue;

use crate::identity::{ad_identifiers, listing_key, IdentifierCandidate};
use crate::time::parse_utc_assumed;

/// Identifiers referenced by one campaign's ads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CampaignAdSet {
    pub campaign_id: String,
    pub inventory_ids: BTreeSet<String>,
    pub listing_ids: BTreeSet<String>,
}

impl CampaignAdSet {
    pub fn new(campaign_id: impl Into<String>) -> Self {
        Self {
            campaign_id: campaign_id.into(),
            ..Self::default()
        }
    }

    pub fn from_ads<'a>(
        campaign_id: impl Into<String>,
        ads: impl IntoIterator<Item = &'a CanonicalValue>,
    ) -> Self {
        let mut set = Self::new(campaign_id);
        for ad in ads {
            set.add_ad(ad);
        }
        set
    }

    pub fn add_ad(&mut self, ad: &CanonicalValue) {
        for id in ad_identifiers(ad) {
            match id {
                IdentifierCandidate::InventoryReference(v) => {
                    self.inventory_ids.insert(v);
                }
                IdentifierCandidate::ListingId(v) => {
                    self.listing_ids.insert(v);
                }
                _ => {}
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.inventory_ids.is_empty() && self.listing_ids.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &String> {
        self.inventory_ids.iter().chain(self.listing_ids.iter())
    }
}

/// Union of every campaign's inventory and listing ids.
pub fn promoted_ids(ad_sets: &[CampaignAdSet]) -> BTreeSet<String> {
    ad_sets.iter().flat_map(|s| s.ids().cloned()).collect()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PromotionPartition {
    pub promoted: Vec<CanonicalValue>,
    pub unpromoted: Vec<CanonicalValue>,
}

/// Split `listings` into promoted and unpromoted, preserving input order.
///
/// A listing is promoted when its key (`ItemID`, else `SKU`) is in any ad
/// set. Listings with no key are always unpromoted.
pub fn partition_by_promotion(
    listings: Vec<CanonicalValue>,
    ad_sets: &[CampaignAdSet],
) -> PromotionPartition {
    let promoted_ids = promoted_ids(ad_sets);
    let mut partition = PromotionPartition::default();
    for listing in listings {
        let promoted = listing_key(&listing).is_some_and(|k| promoted_ids.contains(k.value()));
        if promoted {
            partition.promoted.push(listing);
        } else {
            partition.unpromoted.push(listing);
        }
    }
    debug!(
        promoted = partition.promoted.len(),
        unpromoted = partition.unpromoted.len(),
        "listings partitioned"
    );
    partition
}

/// End time of a listing, zone-less values read as UTC.
pub fn listing_end_time(listing: &CanonicalValue) -> Option<DateTime<Utc>> {
    listing
        .path(&["ListingDetails", "EndTime"])
        .text()
        .as_deref()
        .and_then(parse_utc_assumed)
}

/// Active iff the end time is strictly after `now`. A missing or unreadable
/// end time is inactive.
pub fn is_active_listing(listing: &CanonicalValue, now: DateTime<Utc>) -> bool {
    listing_end_time(listing).is_some_and(|end| end > now)
}

pub fn active_listings(listings: Vec<CanonicalValue>, now: DateTime<Utc>) -> Vec<CanonicalValue> {
    listings
        .into_iter()
        .filter(|l| is_active_listing(l, now))
        .collect()
}
