//! mrk-reconcile
//!
//! Pure reconciliation over canonical records: which transactions belong to
//! an order, whether an order still needs shipping, which transaction is its
//! advertising fee, which listings are promoted, and what a sale-completion
//! request carries. Nothing here fetches or submits; callers hand in records
//! already collected by `mrk-source`.

mod error;
pub mod fee;
pub mod fulfillment;
pub mod identity;
pub mod promotion;
pub mod shipment;
pub mod time;
pub mod window;

pub use error::ReconcileError;
pub use fee::{attribute_advertising_fee, AdvertisingFee, FeeResult, DEFAULT_FEE_KEYWORD};
pub use fulfillment::{
    assess, is_unshipped, orders_requiring_shipment, requires_shipment, FulfillmentSignal,
};
pub use identity::{belongs_to_order, IdentifierCandidate};
pub use promotion::{
    active_listings, is_active_listing, partition_by_promotion, CampaignAdSet, PromotionPartition,
};
pub use shipment::{build_completion_request, SaleCompletion, SaleIdentifier};
pub use window::{
    match_order_transactions, AnchorTime, TimeWindow, DEFAULT_WINDOW_DAYS, MAX_WINDOW_DAYS,
};
