use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Upper bound for every day count (lookbacks and the transaction window).
pub const MAX_DAYS: u32 = 3650;

/// Detail level requested for listing pages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Granularity {
    /// Parameter omitted; the source picks its own default.
    None,
    #[default]
    Coarse,
    Medium,
    Fine,
}

impl Granularity {
    /// Value for the `GranularityLevel` page parameter, if any.
    pub fn as_param(&self) -> Option<&'static str> {
        match self {
            Granularity::None => None,
            Granularity::Coarse => Some("Coarse"),
            Granularity::Medium => Some("Medium"),
            Granularity::Fine => Some("Fine"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketplaceSettings {
    pub marketplace_id: String,
}

impl Default for MarketplaceSettings {
    fn default() -> Self {
        Self {
            marketplace_id: "EBAY_US".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PagingSettings {
    pub orders_page_size: u32,
    pub listings_page_size: u32,
    pub transactions_page_size: u32,
    pub ads_page_size: u32,
}

impl Default for PagingSettings {
    fn default() -> Self {
        Self {
            orders_page_size: 50,
            listings_page_size: 30,
            transactions_page_size: 200,
            ads_page_size: 500,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderSettings {
    pub lookback_days: u32,
}

impl Default for OrderSettings {
    fn default() -> Self {
        Self { lookback_days: 7 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingSettings {
    pub lookback_days: u32,
    pub granularity: Granularity,
}

impl Default for ListingSettings {
    fn default() -> Self {
        Self {
            lookback_days: 120,
            granularity: Granularity::Coarse,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransactionSettings {
    /// Half-width of the match window around an order's anchor time.
    pub window_days: u32,
}

impl Default for TransactionSettings {
    fn default() -> Self {
        Self { window_days: 2 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeeSettings {
    /// Memo substring that marks an advertising fee transaction.
    pub keyword: String,
}

impl Default for FeeSettings {
    fn default() -> Self {
        Self {
            keyword: "Promoted Listings".to_string(),
        }
    }
}

/// Effective settings for one reconciliation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub marketplace: MarketplaceSettings,
    pub paging: PagingSettings,
    pub orders: OrderSettings,
    pub listings: ListingSettings,
    pub transactions: TransactionSettings,
    pub fees: FeeSettings,
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        let pages = [
            ("orders_page_size", self.paging.orders_page_size),
            ("listings_page_size", self.paging.listings_page_size),
            ("transactions_page_size", self.paging.transactions_page_size),
            ("ads_page_size", self.paging.ads_page_size),
        ];
        for (name, size) in pages {
            if size == 0 {
                bail!("CONFIG_INVALID paging.{name} must be greater than zero");
            }
        }
        let spans = [
            ("orders.lookback_days", self.orders.lookback_days),
            ("listings.lookback_days", self.listings.lookback_days),
            ("transactions.window_days", self.transactions.window_days),
        ];
        for (name, days) in spans {
            if days > MAX_DAYS {
                bail!("CONFIG_INVALID {name} must be at most {MAX_DAYS}, got {days}");
            }
        }
        if self.fees.keyword.trim().is_empty() {
            bail!("CONFIG_INVALID fees.keyword must not be empty");
        }
        if self.marketplace.marketplace_id.trim().is_empty() {
            bail!("CONFIG_INVALID marketplace.marketplace_id must not be empty");
        }
        Ok(())
    }
}
