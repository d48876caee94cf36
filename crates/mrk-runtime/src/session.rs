use std::sync::Arc;

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::Serialize;
use tracing::{error, info, warn};

use mrk_config::{Granularity, Settings};
use mrk_reconcile::fulfillment::line_items;
use mrk_reconcile::{
    active_listings, attribute_advertising_fee, build_completion_request,
    orders_requiring_shipment, partition_by_promotion, AnchorTime, CampaignAdSet, FeeResult,
    PromotionPartition, ReconcileError, SaleCompletion,
};
use mrk_record::{CanonicalRecord, CanonicalValue};
use mrk_source::{fetch_all, Clock, PageQuery, PagedSource, SaleCompleter, SystemClock};

use crate::lookup::{collect_campaign_ads, find_order_transactions};

/// Order-state filter understood by the orders source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OrderStatus {
    #[default]
    All,
    /// Not yet paid.
    Active,
    /// Paid (cancelled orders included).
    Completed,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::All => "All",
            OrderStatus::Active => "Active",
            OrderStatus::Completed => "Completed",
        }
    }
}

/// Active listings split against every requested campaign.
#[derive(Debug, Clone, Serialize)]
pub struct PromotionReport {
    pub campaigns: Vec<CampaignAdSet>,
    pub active_listings: usize,
    #[serde(flatten)]
    pub partition: PromotionPartition,
}

/// What happened to a sale-completion request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CompletionStatus {
    /// Accepted by the platform; `warnings` is empty on a clean success.
    Accepted {
        request: CanonicalRecord,
        warnings: Vec<String>,
    },
    Rejected {
        request: CanonicalRecord,
        errors: Vec<String>,
    },
    /// Never reached the platform (no completer, or transport failure).
    NotSent {
        request: CanonicalRecord,
        reason: String,
    },
}

impl CompletionStatus {
    pub fn is_accepted(&self) -> bool {
        matches!(self, CompletionStatus::Accepted { .. })
    }
}

/// Handle over the platform's record sources for one reconciliation run.
///
/// Every source is optional. An operation whose source is missing logs
/// [`ReconcileError::NotInitialized`] and returns an empty result.
pub struct MarketplaceSession {
    orders: Option<Arc<dyn PagedSource>>,
    listings: Option<Arc<dyn PagedSource>>,
    transactions: Option<Arc<dyn PagedSource>>,
    ads: Option<Arc<dyn PagedSource>>,
    completer: Option<Arc<dyn SaleCompleter>>,
    clock: Arc<dyn Clock>,
    settings: Settings,
}

impl MarketplaceSession {
    pub fn new(settings: Settings) -> Self {
        Self {
            orders: None,
            listings: None,
            transactions: None,
            ads: None,
            completer: None,
            clock: Arc::new(SystemClock),
            settings,
        }
    }

    pub fn with_orders(mut self, source: Arc<dyn PagedSource>) -> Self {
        self.orders = Some(source);
        self
    }

    pub fn with_listings(mut self, source: Arc<dyn PagedSource>) -> Self {
        self.listings = Some(source);
        self
    }

    pub fn with_transactions(mut self, source: Arc<dyn PagedSource>) -> Self {
        self.transactions = Some(source);
        self
    }

    pub fn with_ads(mut self, source: Arc<dyn PagedSource>) -> Self {
        self.ads = Some(source);
        self
    }

    pub fn with_completer(mut self, completer: Arc<dyn SaleCompleter>) -> Self {
        self.completer = Some(completer);
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    fn require<'a>(
        slot: &'a Option<Arc<dyn PagedSource>>,
        what: &'static str,
    ) -> Option<&'a dyn PagedSource> {
        match slot {
            Some(source) => Some(source.as_ref()),
            None => {
                error!(error = %ReconcileError::NotInitialized(what), "operation skipped");
                None
            }
        }
    }

    // -------------------------------------------------------------------------
    // Orders
    // -------------------------------------------------------------------------

    /// Orders created in the last `days` days, optionally filtered by status.
    pub fn orders_last_days(&self, days: u32, status: OrderStatus) -> Vec<CanonicalValue> {
        let Some(source) = Self::require(&self.orders, "orders") else {
            return Vec::new();
        };
        let Some((from, to)) = self.lookback(days) else {
            return Vec::new();
        };
        let query = PageQuery::new()
            .with_param("CreateTimeFrom", from)
            .with_param("CreateTimeTo", to)
            .with_param("OrderStatus", status.as_str());

        let outcome = fetch_all(source, self.settings.paging.orders_page_size, &query);
        if let Some(err) = &outcome.error {
            warn!(source = source.name(), error = %err, "order collection ended early");
        }
        info!(days, status = status.as_str(), orders = outcome.items.len(), "orders collected");
        outcome.into_items()
    }

    /// Paid orders from the last `days` days that have not shipped.
    pub fn orders_requiring_shipment(&self, days: u32) -> Vec<CanonicalValue> {
        let completed = self.orders_last_days(days, OrderStatus::Completed);
        let due = orders_requiring_shipment(&completed);
        info!(completed = completed.len(), requiring_shipment = due.len(), "shipment check done");
        due
    }

    // -------------------------------------------------------------------------
    // Listings
    // -------------------------------------------------------------------------

    /// Listings started in the last `days` days.
    pub fn all_listings(&self, days: u32, granularity: Granularity) -> Vec<CanonicalValue> {
        let Some(source) = Self::require(&self.listings, "listings") else {
            return Vec::new();
        };
        let Some((from, to)) = self.lookback(days) else {
            return Vec::new();
        };
        let mut query = PageQuery::new()
            .with_param("StartTimeFrom", from)
            .with_param("StartTimeTo", to)
            .with_param("IncludeWatchCount", "true");
        if let Some(level) = granularity.as_param() {
            query = query.with_param("GranularityLevel", level);
        }

        let outcome = fetch_all(source, self.settings.paging.listings_page_size, &query);
        if let Some(err) = &outcome.error {
            warn!(source = source.name(), error = %err, "listing collection ended early");
        }
        info!(days, listings = outcome.items.len(), "listings collected");
        outcome.into_items()
    }

    /// Listings whose end time is still in the future.
    pub fn active_listings(&self) -> Vec<CanonicalValue> {
        let listing = &self.settings.listings;
        let all = self.all_listings(listing.lookback_days, listing.granularity);
        let total = all.len();
        let active = active_listings(all, self.now());
        info!(total, active = active.len(), "active listings selected");
        active
    }

    // -------------------------------------------------------------------------
    // Transactions and fees
    // -------------------------------------------------------------------------

    /// Transactions of `order_id` within the configured window of `anchor`.
    pub fn find_order_transactions(
        &self,
        order_id: &str,
        anchor: &AnchorTime,
    ) -> Result<Vec<CanonicalValue>, ReconcileError> {
        anchor.resolve()?;
        let Some(source) = Self::require(&self.transactions, "transactions") else {
            return Ok(Vec::new());
        };
        find_order_transactions(
            source,
            order_id,
            anchor,
            self.settings.transactions.window_days,
            self.settings.paging.transactions_page_size,
        )
    }

    /// Advertising fee charged for `order_id`, if any.
    pub fn check_order_advertising_fees(
        &self,
        order_id: &str,
        anchor: &AnchorTime,
    ) -> Result<FeeResult, ReconcileError> {
        let matched = self.find_order_transactions(order_id, anchor)?;
        let result = attribute_advertising_fee(order_id, &matched, &self.settings.fees.keyword)?;
        info!(order_id, has_fee = result.has_fee(), "advertising fee checked");
        Ok(result)
    }

    // -------------------------------------------------------------------------
    // Promotion
    // -------------------------------------------------------------------------

    pub fn collect_campaign_ads(&self, campaign_id: &str) -> CampaignAdSet {
        match Self::require(&self.ads, "ads") {
            Some(source) => {
                collect_campaign_ads(source, campaign_id, self.settings.paging.ads_page_size)
            }
            None => CampaignAdSet::new(campaign_id),
        }
    }

    /// Active listings partitioned against the ads of `campaign_ids`.
    pub fn promotion_report<S: AsRef<str>>(&self, campaign_ids: &[S]) -> PromotionReport {
        let campaigns: Vec<CampaignAdSet> = campaign_ids
            .iter()
            .map(|id| self.collect_campaign_ads(id.as_ref()))
            .collect();
        let active = self.active_listings();
        let active_count = active.len();
        let partition = partition_by_promotion(active, &campaigns);
        info!(
            campaigns = campaigns.len(),
            promoted = partition.promoted.len(),
            unpromoted = partition.unpromoted.len(),
            "promotion report built"
        );
        PromotionReport {
            campaigns,
            active_listings: active_count,
            partition,
        }
    }

    /// `[now - days, now]` as request parameters. An unrepresentable start
    /// is logged and answered with `None`.
    // -------------------------------------------------------------------------
    // Shipment completion
    // -------------------------------------------------------------------------

    /// Validate and submit a sale completion (paid/shipped flags, tracking).
    ///
    /// Invalid input is an error and nothing is sent. Every other outcome,
    /// including a missing completer, is reported in the returned status.
    pub fn complete_sale(
        &self,
        completion: &SaleCompletion,
    ) -> Result<CompletionStatus, ReconcileError> {
        let request = build_completion_request(completion)?;
        let Some(completer) = &self.completer else {
            let err = ReconcileError::NotInitialized("completer");
            error!(error = %err, "operation skipped");
            return Ok(CompletionStatus::NotSent {
                request,
                reason: err.to_string(),
            });
        };

        match completer.complete_sale(&request) {
            Ok(ack) if ack.ack.is_success() => {
                info!(
                    completer = completer.name(),
                    ack = ack.ack.as_str(),
                    tracking = request.contains_key("Shipment"),
                    "sale completion accepted"
                );
                Ok(CompletionStatus::Accepted {
                    request,
                    warnings: ack.errors,
                })
            }
            Ok(ack) => {
                warn!(
                    completer = completer.name(),
                    errors = ?ack.errors,
                    "sale completion rejected"
                );
                Ok(CompletionStatus::Rejected {
                    request,
                    errors: ack.errors,
                })
            }
            Err(err) => {
                warn!(completer = completer.name(), error = %err, "sale completion not sent");
                Ok(CompletionStatus::NotSent {
                    request,
                    reason: err.to_string(),
                })
            }
        }
    }

    fn lookback(&self, days: u32) -> Option<(String, String)> {
        let now = self.now();
        let Some(from) = now.checked_sub_signed(Duration::days(i64::from(days))) else {
            let err =
                ReconcileError::InvalidArgument(format!("lookback of {days} days is out of range"));
            error!(error = %err, "operation skipped");
            return None;
        };
        Some((
            from.to_rfc3339_opts(SecondsFormat::Secs, true),
            now.to_rfc3339_opts(SecondsFormat::Secs, true),
        ))
    }
}

/// Anchor instant of an order: its first line item's `CreatedDate`, else the
/// order's `CreatedTime`.
pub fn order_anchor(order: &CanonicalValue) -> Option<AnchorTime> {
    line_items(order)
        .first()
        .and_then(|item| item.get("CreatedDate").text())
        .filter(|s| !s.trim().is_empty())
        .or_else(|| order.get("CreatedTime").text())
        .filter(|s| !s.trim().is_empty())
        .map(AnchorTime::Text)
}
