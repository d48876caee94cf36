use std::sync::Arc;

use chrono::{TimeZone, Utc};
use mrk_config::{Granularity, Settings};
use mrk_reconcile::{AnchorTime, ReconcileError};
use mrk_runtime::{order_anchor, MarketplaceSession, OrderStatus};
use mrk_source::testkit::ScriptedSource;
use mrk_source::FixedClock;
use serde_json::json;

fn clock() -> Arc<FixedClock> {
    Arc::new(FixedClock::new(Utc.with_ymd_and_hms(2024, 3, 5, 12, 0, 0).unwrap()))
}

#[test]
fn scenario_orders_query_carries_lookback_and_status() {
    let orders = Arc::new(ScriptedSource::new("orders").page(vec![json!({"OrderID": "1"})], false));
    let session = MarketplaceSession::new(Settings::default())
        .with_orders(orders.clone())
        .with_clock(clock());

    let got = session.orders_last_days(7, OrderStatus::Active);
    assert_eq!(got.len(), 1);

    let calls = orders.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].page_number, 1);
    assert_eq!(calls[0].page_size, 50);
    assert_eq!(calls[0].params["CreateTimeFrom"], "2024-02-27T12:00:00Z");
    assert_eq!(calls[0].params["CreateTimeTo"], "2024-03-05T12:00:00Z");
    assert_eq!(calls[0].params["OrderStatus"], "Active");
}

#[test]
fn scenario_out_of_range_lookback_returns_empty_without_fetch() {
    let orders = Arc::new(ScriptedSource::new("orders").page(vec![json!({"OrderID": "1"})], false));
    let listings = Arc::new(ScriptedSource::new("listings").page(vec![json!({"ItemID": "9"})], false));
    let session = MarketplaceSession::new(Settings::default())
        .with_orders(orders.clone())
        .with_listings(listings.clone())
        .with_clock(clock());

    assert!(session.orders_last_days(u32::MAX, OrderStatus::All).is_empty());
    assert!(session.orders_requiring_shipment(u32::MAX).is_empty());
    assert!(session.all_listings(u32::MAX, Granularity::Coarse).is_empty());
    assert_eq!(orders.call_count(), 0);
    assert_eq!(listings.call_count(), 0);
}

#[test]
fn scenario_oversized_fee_window_is_an_error() {
    let mut settings = Settings::default();
    settings.transactions.window_days = 4_000_000_000;
    let transactions = Arc::new(ScriptedSource::new("transactions").page(vec![], false));
    let session = MarketplaceSession::new(settings)
        .with_transactions(transactions.clone())
        .with_clock(clock());

    let err = session
        .check_order_advertising_fees("A", &AnchorTime::from("2024-03-01T12:00:00Z"))
        .unwrap_err();
    assert!(matches!(err, ReconcileError::InvalidArgument(_)));
    assert_eq!(transactions.call_count(), 0);
}

#[test]
fn scenario_orders_requiring_shipment_filters_completed_unshipped() {
    let orders = Arc::new(ScriptedSource::new("orders").page(
        vec![
            json!({"OrderID": "1", "OrderStatus": "Completed",
                   "TransactionArray": {"Transaction": {"CreatedDate": "2024-03-04T09:00:00.000Z"}}}),
            json!({"OrderID": "2", "OrderStatus": "Completed", "ShippedTime": "2024-03-04T10:00:00.000Z"}),
            json!({"OrderID": "3", "OrderStatus": "Cancelled"}),
        ],
        false,
    ));
    let session = MarketplaceSession::new(Settings::default())
        .with_orders(orders.clone())
        .with_clock(clock());

    let due = session.orders_requiring_shipment(7);
    let ids: Vec<_> = due.iter().filter_map(|o| o.get("OrderID").id_string()).collect();
    assert_eq!(ids, vec!["1".to_string()]);
    assert_eq!(orders.calls()[0].params["OrderStatus"], "Completed");
}

#[test]
fn scenario_fee_check_uses_order_anchor_and_settings() {
    let order: mrk_record::CanonicalValue = json!({
        "OrderID": "11-22",
        "CreatedTime": "2024-03-01T08:00:00.000Z",
        "TransactionArray": {"Transaction": [{"CreatedDate": "2024-03-01T09:00:00.000Z"}]}
    })
    .into();

    let transactions = Arc::new(ScriptedSource::new("transactions").page(
        vec![
            json!({"record": {"order_id": "11-22", "transaction_date": "2024-03-01T09:05:00.000Z",
                              "transaction_memo": "Final value fee", "amount": {"value": "4.10", "currency": "USD"}}}),
            json!({"record": {"order_id": "11-22", "transaction_date": "2024-03-02T00:00:00.000Z",
                              "transaction_memo": "Promoted Listings - General", "amount": {"value": "1.05", "currency": "USD"}}}),
        ],
        false,
    ));

    let mut settings = Settings::default();
    settings.transactions.window_days = 1;
    let session = MarketplaceSession::new(settings).with_transactions(transactions.clone());

    let anchor = order_anchor(&order).unwrap();
    let result = session.check_order_advertising_fees("11-22", &anchor).unwrap();
    let fee = result.fee().unwrap();
    assert_eq!(fee.amount.micros, 1_050_000);
    assert_eq!(fee.transaction_date.as_deref(), Some("2024-03-02T00:00:00.000Z"));

    let calls = transactions.calls();
    assert_eq!(calls[0].page_size, 200);
    assert_eq!(
        calls[0].filter.as_deref(),
        Some("transactionDate:[2024-02-29T09:00:00Z..2024-03-02T09:00:00Z]")
    );
}
