use mrk_reconcile::*;
use mrk_record::CanonicalValue;
use serde_json::json;

#[test]
fn scenario_top_level_shipped_time_means_shipped() {
    let order: CanonicalValue = json!({
        "OrderID": "1",
        "ShippedTime": "2024-03-02T10:00:00.000Z",
        "TransactionArray": {"Transaction": [{}, {}]}
    })
    .into();
    assert!(!is_unshipped(&order));
    assert_eq!(assess(&order), FulfillmentSignal::OrderShippedTime);
}

#[test]
fn scenario_one_of_two_line_items_unshipped_means_unshipped() {
    let order: CanonicalValue = json!({
        "OrderID": "2",
        "OrderStatus": "Completed",
        "TransactionArray": {"Transaction": [
            {"ShippedTime": "2024-03-02T10:00:00.000Z"},
            {"CreatedDate": "2024-03-01T10:00:00.000Z"}
        ]}
    })
    .into();
    assert!(is_unshipped(&order));
    assert!(requires_shipment(&order));
}

#[test]
fn scenario_tracking_only_counts_when_all_items_shipped() {
    let shipped_items = json!({"Transaction": [{"ShippedTime": "2024-03-02T10:00:00.000Z"}]});
    let tracked: CanonicalValue = json!({
        "TransactionArray": shipped_items.clone(),
        "ShippingDetails": {"ShipmentTrackingDetails": [{"ShipmentTrackingNumber": "9400"}]}
    })
    .into();
    let untracked: CanonicalValue = json!({"TransactionArray": shipped_items}).into();

    assert!(!is_unshipped(&tracked));
    assert!(is_unshipped(&untracked));
}
