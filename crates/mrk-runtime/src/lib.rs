//! mrk-runtime
//!
//! Source-backed reconciliation. [`MarketplaceSession`] holds the record
//! sources, sale completer, clock and settings for one run and exposes the
//! operations that need to fetch or submit; the free functions in [`lookup`]
//! do the same against a single explicit source.

pub mod lookup;
mod session;

pub use lookup::{collect_campaign_ads, find_order_transactions, CAMPAIGN_ID_PARAM};
pub use session::{
    order_anchor, CompletionStatus, MarketplaceSession, OrderStatus, PromotionReport,
};
