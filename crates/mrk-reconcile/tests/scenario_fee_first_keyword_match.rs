use mrk_reconcile::*;
use mrk_record::CanonicalValue;
use serde_json::json;

#[test]
fn scenario_fee_attribution_picks_promoted_listing_memo() {
    let matched: Vec<CanonicalValue> = vec![
        json!({"transaction_memo": "Store fee", "amount": {"value": "0.35", "currency": "USD"}}).into(),
        json!({
            "transaction_memo": "Promoted Listings \u{2014} Standard",
            "transaction_date": "2024-03-02T00:00:00.000Z",
            "amount": {"value": "3.75", "currency": "USD"}
        })
        .into(),
    ];

    let result = attribute_advertising_fee("11-22", &matched, DEFAULT_FEE_KEYWORD).unwrap();
    assert!(result.has_fee());
    let fee = result.fee().unwrap();
    assert_eq!(fee.transaction, matched[1]);
    assert_eq!(fee.amount.to_string(), "3.75 USD");
    assert_eq!(fee.order_id, "11-22");
}

#[test]
fn scenario_custom_keyword_is_honoured() {
    let matched: Vec<CanonicalValue> =
        vec![json!({"transaction_memo": "Offsite Ads fee", "amount": {"value": "1"}}).into()];
    assert!(!attribute_advertising_fee("A", &matched, DEFAULT_FEE_KEYWORD)
        .unwrap()
        .has_fee());
    assert!(attribute_advertising_fee("A", &matched, "Offsite Ads")
        .unwrap()
        .has_fee());
}
