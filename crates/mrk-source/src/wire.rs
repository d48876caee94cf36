//! Wire-page decoding.
//!
//! Different endpoints of the platform disagree on envelope shape: `Ack` vs
//! `ack`, `HasMoreItems: "false"` (a string) vs `has_more: false`, `Errors`
//! as a list of `{LongMessage}` objects or bare strings, and item lists that
//! collapse to a single bare object when only one item exists. All of that is
//! resolved here so the paginator only ever sees a [`Page`].

use serde_json::Value;

use mrk_record::SourceNode;

use crate::{Ack, FetchError, Page};

const ACK_KEYS: &[&str] = &["ack", "Ack"];
const ITEM_KEYS: &[&str] = &["items", "Items"];
const HAS_MORE_KEYS: &[&str] = &["has_more", "hasMore", "HasMoreItems", "HasMoreOrders"];
const ERROR_KEYS: &[&str] = &["errors", "Errors"];
const MESSAGE_KEYS: &[&str] = &["LongMessage", "longMessage", "message", "ShortMessage"];

/// Decode one JSON page envelope.
///
/// A missing `ack` means success; missing items mean an empty page; a
/// missing more-pages flag means this is the last page.
pub fn decode_page(v: Value) -> Result<Page, FetchError> {
    let Value::Object(mut obj) = v else {
        return Err(FetchError::Decode(format!(
            "page envelope must be a JSON object, got {}",
            kind(&v)
        )));
    };

    let ack = match first_of(&mut obj, ACK_KEYS) {
        None | Some(Value::Null) => Ack::Success,
        Some(Value::String(s)) => Ack::parse(&s),
        Some(other) => {
            return Err(FetchError::Decode(format!(
                "ack must be a string, got {}",
                kind(&other)
            )))
        }
    };

    let items = match first_of(&mut obj, ITEM_KEYS) {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.into_iter().map(SourceNode::from).collect(),
        Some(single) => vec![SourceNode::from(single)],
    };

    let has_more = first_of(&mut obj, HAS_MORE_KEYS)
        .map(|v| parse_flag(&v))
        .unwrap_or(false);

    let errors = match first_of(&mut obj, ERROR_KEYS) {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(errs)) => errs.iter().filter_map(error_message).collect(),
        Some(single) => error_message(&single).into_iter().collect(),
    };

    Ok(Page {
        ack,
        items,
        has_more,
        errors,
    })
}

/// Native bools pass through; strings compare case-insensitively against
/// `"true"`. Everything else (including the `"false"` sentinel) is `false`.
pub fn parse_flag(v: &Value) -> bool {
    match v {
        Value::Bool(b) => *b,
        Value::String(s) => s.trim().eq_ignore_ascii_case("true"),
        _ => false,
    }
}

fn first_of(obj: &mut serde_json::Map<String, Value>, keys: &[&str]) -> Option<Value> {
    keys.iter().find_map(|k| obj.remove(*k))
}

fn error_message(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Object(obj) => MESSAGE_KEYS
            .iter()
            .find_map(|k| obj.get(*k).and_then(Value::as_str))
            .map(str::to_string)
            .or_else(|| Some(v.to_string())),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

fn kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn string_sentinel_false_ends_pagination() {
        let page = decode_page(json!({
            "Ack": "Success",
            "Items": [{"ItemID": "1"}],
            "HasMoreItems": "false"
        }))
        .unwrap();
        assert!(!page.has_more);
        assert_eq!(page.items.len(), 1);
    }

    #[test]
    fn string_and_native_true_continue() {
        assert!(decode_page(json!({"HasMoreOrders": "true"})).unwrap().has_more);
        assert!(decode_page(json!({"has_more": true})).unwrap().has_more);
        assert!(!decode_page(json!({"has_more": "no"})).unwrap().has_more);
    }

    #[test]
    fn single_bare_item_becomes_one_element_page() {
        let page = decode_page(json!({"items": {"OrderID": "A"}})).unwrap();
        assert_eq!(page.items.len(), 1);
    }

    #[test]
    fn defaults_when_fields_missing() {
        let page = decode_page(json!({})).unwrap();
        assert_eq!(page.ack, Ack::Success);
        assert!(page.items.is_empty());
        assert!(!page.has_more);
        assert!(page.errors.is_empty());
    }

    #[test]
    fn failure_ack_with_long_messages() {
        let page = decode_page(json!({
            "Ack": "Failure",
            "Errors": [{"ShortMessage": "short", "LongMessage": "Auth token is invalid."}, "plain"]
        }))
        .unwrap();
        assert_eq!(page.ack, Ack::Failure);
        assert_eq!(page.errors, vec!["Auth token is invalid.", "plain"]);
    }

    #[test]
    fn single_error_object_is_accepted() {
        let page = decode_page(json!({"ack": "Warning", "errors": {"message": "slow down"}})).unwrap();
        assert_eq!(page.ack, Ack::Warning);
        assert_eq!(page.errors, vec!["slow down"]);
    }

    #[test]
    fn non_object_envelope_is_decode_error() {
        let err = decode_page(json!([1, 2])).unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
        let err = decode_page(json!({"ack": 1})).unwrap_err();
        assert!(err.to_string().contains("ack must be a string"));
    }
}
