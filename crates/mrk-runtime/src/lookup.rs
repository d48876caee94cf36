//! Source-backed lookups that sit directly on top of the paginator.

use tracing::{info, warn};

use mrk_reconcile::{match_order_transactions, AnchorTime, CampaignAdSet, ReconcileError, TimeWindow};
use mrk_record::CanonicalValue;
use mrk_source::{fetch_all, PageQuery, PagedSource};

/// Page parameter naming the campaign whose ads are listed.
pub const CAMPAIGN_ID_PARAM: &str = "campaign_id";

/// Transactions belonging to `order_id` within `window_days` of `anchor`.
///
/// One filtered collection run is issued. Zero candidates, zero matches and
/// a failed collection all come back as an empty vector; only a zone-less
/// anchor is an error.
pub fn find_order_transactions(
    source: &dyn PagedSource,
    order_id: &str,
    anchor: &AnchorTime,
    window_days: u32,
    page_size: u32,
) -> Result<Vec<CanonicalValue>, ReconcileError> {
    let window = TimeWindow::for_anchor(anchor, window_days)?;
    let query = PageQuery::new().with_filter(window.filter_expr());

    let outcome = fetch_all(source, page_size, &query);
    if let Some(err) = &outcome.error {
        warn!(
            source = source.name(),
            order_id,
            error = %err,
            "transaction collection failed; no transactions attributed"
        );
        return Ok(Vec::new());
    }

    let matched = match_order_transactions(order_id, &window, &outcome.items);
    info!(
        order_id,
        candidates = outcome.items.len(),
        matched = matched.len(),
        "order transactions matched"
    );
    Ok(matched)
}

/// Every identifier referenced by a campaign's ads, across all ad pages.
///
/// A failed collection keeps the ads gathered before the failure.
pub fn collect_campaign_ads(
    source: &dyn PagedSource,
    campaign_id: &str,
    page_size: u32,
) -> CampaignAdSet {
    let query = PageQuery::new().with_param(CAMPAIGN_ID_PARAM, campaign_id);
    let outcome = fetch_all(source, page_size, &query);
    if let Some(err) = &outcome.error {
        warn!(source = source.name(), campaign_id, error = %err, "ad collection ended early");
    }

    let set = CampaignAdSet::from_ads(campaign_id, &outcome.items);
    info!(
        campaign_id,
        ads = outcome.items.len(),
        inventory_ids = set.inventory_ids.len(),
        listing_ids = set.listing_ids.len(),
        "campaign ads collected"
    );
    set
}
