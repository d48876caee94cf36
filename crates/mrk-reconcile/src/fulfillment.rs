//! Shipped/unshipped inference for orders.
//!
//! Signals are checked in a fixed precedence; the first one that decides
//! wins:
//!
//! 1. a non-empty order-level `ShippedTime` means shipped;
//! 2. any line item without its own `ShippedTime` means unshipped;
//! 3. non-empty `ShippingDetails.ShipmentTrackingDetails` means shipped;
//! 4. otherwise unshipped.

use serde::Serialize;

use mrk_record::CanonicalValue;

/// `OrderStatus` value of an order that has been paid for.
pub const COMPLETED_STATUS: &str = "Completed";

/// Which rule decided an order's fulfillment state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "signal", rename_all = "snake_case")]
pub enum FulfillmentSignal {
    OrderShippedTime,
    UnshippedLineItem { index: usize },
    TrackingDetails,
    NoEvidence,
}

impl FulfillmentSignal {
    pub fn is_unshipped(&self) -> bool {
        matches!(
            self,
            FulfillmentSignal::UnshippedLineItem { .. } | FulfillmentSignal::NoEvidence
        )
    }
}

/// Line items of an order.
///
/// `TransactionArray` is either a sequence of line items or a record holding
/// them (one or many) under `Transaction`. Non-record entries are dropped.
pub fn line_items(order: &CanonicalValue) -> Vec<&CanonicalValue> {
    let array = order.get("TransactionArray");
    let items = match array {
        CanonicalValue::Record(_) => array.get("Transaction").as_seq(),
        other => other.as_seq(),
    };
    items
        .into_iter()
        .filter(|item| item.as_record().is_some())
        .collect()
}

pub fn assess(order: &CanonicalValue) -> FulfillmentSignal {
    if order.get("ShippedTime").is_truthy() {
        return FulfillmentSignal::OrderShippedTime;
    }
    if let Some(index) = line_items(order)
        .iter()
        .position(|item| !item.get("ShippedTime").is_truthy())
    {
        return FulfillmentSignal::UnshippedLineItem { index };
    }
    if order
        .path(&["ShippingDetails", "ShipmentTrackingDetails"])
        .is_truthy()
    {
        return FulfillmentSignal::TrackingDetails;
    }
    FulfillmentSignal::NoEvidence
}

pub fn is_unshipped(order: &CanonicalValue) -> bool {
    assess(order).is_unshipped()
}

/// Paid for but not yet shipped.
pub fn requires_shipment(order: &CanonicalValue) -> bool {
    order.get("OrderStatus").as_str() == Some(COMPLETED_STATUS) && is_unshipped(order)
}

pub fn orders_requiring_shipment(orders: &[CanonicalValue]) -> Vec<CanonicalValue> {
    orders
        .iter()
        .filter(|o| requires_shipment(o))
        .cloned()
        .collect()
}
