//! Sale-completion requests: marking an order paid/shipped and attaching
//! tracking details.
//!
//! The request names the sale with exactly one identifier, picked in
//! priority order: `OrderID`, then `OrderLineItemID`, then the
//! `ItemID` + `TransactionID` pair. Tracking number and carrier travel
//! together or not at all.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use mrk_record::{CanonicalRecord, CanonicalValue};

use crate::ReconcileError;

/// Which sale a completion request is about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SaleIdentifier {
    Order { order_id: String },
    OrderLineItem { order_line_item_id: String },
    ItemTransaction { item_id: String, transaction_id: String },
}

/// Caller-supplied completion details. Blank strings count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleCompletion {
    pub order_id: Option<String>,
    pub order_line_item_id: Option<String>,
    pub item_id: Option<String>,
    pub transaction_id: Option<String>,
    pub tracking_number: Option<String>,
    pub shipping_carrier: Option<String>,
    pub shipped_time: Option<DateTime<Utc>>,
    pub paid: Option<bool>,
    pub shipped: Option<bool>,
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl SaleCompletion {
    pub fn for_order(order_id: impl Into<String>) -> Self {
        Self {
            order_id: Some(order_id.into()),
            ..Self::default()
        }
    }

    pub fn with_tracking(mut self, number: impl Into<String>, carrier: impl Into<String>) -> Self {
        self.tracking_number = Some(number.into());
        self.shipping_carrier = Some(carrier.into());
        self
    }

    pub fn identifier(&self) -> Result<SaleIdentifier, ReconcileError> {
        if let Some(order_id) = present(&self.order_id) {
            return Ok(SaleIdentifier::Order {
                order_id: order_id.to_string(),
            });
        }
        if let Some(line) = present(&self.order_line_item_id) {
            return Ok(SaleIdentifier::OrderLineItem {
                order_line_item_id: line.to_string(),
            });
        }
        match (present(&self.item_id), present(&self.transaction_id)) {
            (Some(item_id), Some(transaction_id)) => Ok(SaleIdentifier::ItemTransaction {
                item_id: item_id.to_string(),
                transaction_id: transaction_id.to_string(),
            }),
            _ => Err(ReconcileError::InvalidArgument(
                "one of OrderID, OrderLineItemID or ItemID+TransactionID is required".to_string(),
            )),
        }
    }

    /// Tracking number and carrier, if both are given.
    fn tracking(&self) -> Result<Option<(&str, &str)>, ReconcileError> {
        match (present(&self.tracking_number), present(&self.shipping_carrier)) {
            (Some(number), Some(carrier)) => Ok(Some((number, carrier))),
            (None, None) => Ok(None),
            (Some(_), None) => Err(ReconcileError::InvalidArgument(
                "tracking number given without a shipping carrier".to_string(),
            )),
            (None, Some(_)) => Err(ReconcileError::InvalidArgument(
                "shipping carrier given without a tracking number".to_string(),
            )),
        }
    }
}

fn text(s: &str) -> CanonicalValue {
    CanonicalValue::String(s.to_string())
}

/// Request record for a sale completion.
///
/// Validation runs before anything is built, so an `Err` means nothing
/// should be sent. `Shipment` is only present when it has content.
pub fn build_completion_request(
    completion: &SaleCompletion,
) -> Result<CanonicalRecord, ReconcileError> {
    let identifier = completion.identifier()?;
    let tracking = completion.tracking()?;

    let mut request = CanonicalRecord::new();
    match identifier {
        SaleIdentifier::Order { order_id } => {
            request.insert("OrderID".to_string(), text(&order_id));
        }
        SaleIdentifier::OrderLineItem { order_line_item_id } => {
            request.insert("OrderLineItemID".to_string(), text(&order_line_item_id));
        }
        SaleIdentifier::ItemTransaction {
            item_id,
            transaction_id,
        } => {
            request.insert("ItemID".to_string(), text(&item_id));
            request.insert("TransactionID".to_string(), text(&transaction_id));
        }
    }
    if let Some(paid) = completion.paid {
        request.insert("Paid".to_string(), CanonicalValue::Bool(paid));
    }
    if let Some(shipped) = completion.shipped {
        request.insert("Shipped".to_string(), CanonicalValue::Bool(shipped));
    }

    let mut shipment = CanonicalRecord::new();
    if let Some(at) = completion.shipped_time {
        shipment.insert(
            "ShippedTime".to_string(),
            CanonicalValue::String(at.to_rfc3339_opts(SecondsFormat::Secs, true)),
        );
    }
    if let Some((number, carrier)) = tracking {
        let mut details = CanonicalRecord::new();
        details.insert("ShipmentTrackingNumber".to_string(), text(number));
        details.insert("ShippingCarrierUsed".to_string(), text(carrier));
        shipment.insert(
            "ShipmentTrackingDetails".to_string(),
            CanonicalValue::Record(details),
        );
    }
    if !shipment.is_empty() {
        request.insert("Shipment".to_string(), CanonicalValue::Record(shipment));
    }

    Ok(request)
}
