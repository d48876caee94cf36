//! Advertising fee attribution.

use serde::Serialize;
use tracing::debug;

use mrk_record::{CanonicalValue, Money};

use crate::ReconcileError;

/// Memo substring identifying a promoted-listing fee.
pub const DEFAULT_FEE_KEYWORD: &str = "Promoted Listings";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdvertisingFee {
    pub order_id: String,
    pub amount: Money,
    pub transaction_date: Option<String>,
    pub transaction: CanonicalValue,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FeeResult {
    NoFee,
    Charged(AdvertisingFee),
}

impl FeeResult {
    pub fn has_fee(&self) -> bool {
        matches!(self, FeeResult::Charged(_))
    }

    pub fn fee(&self) -> Option<&AdvertisingFee> {
        match self {
            FeeResult::Charged(fee) => Some(fee),
            FeeResult::NoFee => None,
        }
    }
}

/// First transaction whose `transaction_memo` contains `keyword` is the fee.
///
/// Later matches are not aggregated. An empty keyword never matches.
pub fn attribute_advertising_fee(
    order_id: &str,
    matched: &[CanonicalValue],
    keyword: &str,
) -> Result<FeeResult, ReconcileError> {
    if keyword.is_empty() {
        return Ok(FeeResult::NoFee);
    }
    let Some(tx) = matched.iter().find(|tx| {
        tx.get("transaction_memo")
            .as_str()
            .is_some_and(|memo| memo.contains(keyword))
    }) else {
        debug!(order_id, keyword, "no fee transaction among matches");
        return Ok(FeeResult::NoFee);
    };

    let amount = Money::from_amount(tx.get("amount")).map_err(|source| {
        ReconcileError::MalformedAmount {
            order_id: order_id.to_string(),
            source,
        }
    })?;

    Ok(FeeResult::Charged(AdvertisingFee {
        order_id: order_id.to_string(),
        amount,
        transaction_date: tx.get("transaction_date").text(),
        transaction: tx.clone(),
    }))
}
