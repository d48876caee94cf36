use mrk_record::{normalize, CanonicalValue, SelfSerialize, SourceNode};
use serde_json::json;

/// SDK-style reply object: public attributes, a private cache, and a nested
/// self-serializing amount.
struct Fee;

impl SelfSerialize for Fee {
    fn to_source(&self) -> SourceNode {
        SourceNode::object([
            ("value", SourceNode::from(json!("0.35"))),
            ("currency", SourceNode::from(json!("USD"))),
            ("_raw", SourceNode::from(json!("<xml/>"))),
        ])
    }
}

fn order_reply() -> SourceNode {
    SourceNode::object([
        ("OrderID", SourceNode::from(json!("11-22"))),
        ("_session", SourceNode::from(json!({"token": "x"}))),
        (
            "TransactionArray",
            SourceNode::object([(
                "Transaction",
                SourceNode::Seq(vec![
                    SourceNode::object([("CreatedDate", SourceNode::from(json!("2024-03-01T09:00:00.000Z")))]),
                    SourceNode::serializable(Fee),
                ]),
            )]),
        ),
        ("Total", SourceNode::map([("_currency", SourceNode::from(json!("USD")))])),
    ])
}

#[test]
fn scenario_normalize_is_idempotent_on_mixed_input() {
    let once = normalize(order_reply());
    let twice = normalize(SourceNode::from(once.clone()));
    assert_eq!(once, twice);
}

#[test]
fn scenario_private_attributes_dropped_only_on_objects() {
    let v = normalize(order_reply());
    assert!(v.get("_session").is_absent());
    assert_eq!(v.get("OrderID").as_str(), Some("11-22"));

    let items = v.path(&["TransactionArray", "Transaction"]).as_seq();
    assert_eq!(items.len(), 2);
    assert_eq!(items[1].get("value").as_str(), Some("0.35"));
    assert!(items[1].get("_raw").is_absent());

    // Mapping keys are data, not attributes.
    assert_eq!(v.path(&["Total", "_currency"]).as_str(), Some("USD"));
}

#[test]
fn scenario_scalars_pass_through() {
    for raw in [json!(null), json!(true), json!(42), json!("text")] {
        let expected = CanonicalValue::from(raw.clone());
        assert_eq!(normalize(SourceNode::from(raw)), expected);
    }
}
