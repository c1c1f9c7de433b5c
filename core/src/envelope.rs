//! List envelope normalization.
//!
//! # Design
//! List endpoints answer with a bare array, `{ "data": [...] }`, or an object
//! keyed by the resource name (`{ "users": [...] }`). `ListEnvelope` names
//! those shapes and `normalize_list` collapses them. Anything else is an
//! empty list, never an error: a missing list means "no items".

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

/// Shapes a collection response can take.
#[derive(Debug, Clone, PartialEq)]
pub enum ListEnvelope {
    /// `[ ... ]`
    Bare(Vec<Value>),
    /// `{ "data": [ ... ] }`
    Data(Vec<Value>),
    /// `{ "<resource>": [ ... ] }`
    Named(Vec<Value>),
    /// Anything else, including `{}` and `null`.
    Unrecognized,
}

impl ListEnvelope {
    pub fn classify(value: Value, resource: &str) -> Self {
        match value {
            Value::Array(items) => ListEnvelope::Bare(items),
            Value::Object(mut map) => {
                if let Some(Value::Array(items)) = map.remove("data") {
                    return ListEnvelope::Data(items);
                }
                match map.remove(resource) {
                    Some(Value::Array(items)) => ListEnvelope::Named(items),
                    _ => ListEnvelope::Unrecognized,
                }
            }
            _ => ListEnvelope::Unrecognized,
        }
    }

    pub fn into_items(self) -> Vec<Value> {
        match self {
            ListEnvelope::Bare(items) | ListEnvelope::Data(items) | ListEnvelope::Named(items) => items,
            ListEnvelope::Unrecognized => Vec::new(),
        }
    }
}

/// The items of a list response, whatever envelope it came in.
pub fn normalize_list(value: Value, resource: &str) -> Vec<Value> {
    ListEnvelope::classify(value, resource).into_items()
}

/// Normalize, then decode each item. Items that do not decode are skipped.
pub fn decode_list<T: DeserializeOwned>(value: Value, resource: &str) -> Vec<T> {
    normalize_list(value, resource)
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(resource, error = %e, "skipping malformed list item");
                None
            }
        })
        .collect()
}

/// A single record from a create/update response: `{ "data": {...} }`,
/// `{ "<key>": {...} }`, or the record itself.
pub fn decode_record<T: DeserializeOwned>(value: Value, key: &str) -> Option<T> {
    let Value::Object(mut map) = value else {
        return None;
    };
    for wrapper in ["data", key] {
        if let Some(inner @ Value::Object(_)) = map.remove(wrapper) {
            if let Ok(record) = serde_json::from_value(inner) {
                return Some(record);
            }
        }
    }
    serde_json::from_value(Value::Object(map)).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item() -> Value {
        json!({ "id": 7, "name": "Cleaning" })
    }

    #[test]
    fn three_shapes_give_the_same_items() {
        let bare = normalize_list(json!([item()]), "categories");
        let data = normalize_list(json!({ "data": [item()] }), "categories");
        let named = normalize_list(json!({ "categories": [item()] }), "categories");
        assert_eq!(bare, vec![item()]);
        assert_eq!(data, bare);
        assert_eq!(named, bare);
    }

    #[test]
    fn classify_names_the_shape() {
        assert!(matches!(ListEnvelope::classify(json!([]), "users"), ListEnvelope::Bare(_)));
        assert!(matches!(ListEnvelope::classify(json!({ "data": [] }), "users"), ListEnvelope::Data(_)));
        assert!(matches!(ListEnvelope::classify(json!({ "users": [] }), "users"), ListEnvelope::Named(_)));
    }

    #[test]
    fn data_wins_over_resource_key() {
        let items = normalize_list(json!({ "data": [1], "users": [2, 3] }), "users");
        assert_eq!(items, vec![json!(1)]);
    }

    #[test]
    fn non_array_data_falls_through_to_resource_key() {
        let items = normalize_list(json!({ "data": { "total": 2 }, "services": [1, 2] }), "services");
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn unrecognized_shapes_are_empty() {
        assert!(normalize_list(json!({}), "users").is_empty());
        assert!(normalize_list(Value::Null, "users").is_empty());
        assert!(normalize_list(json!("oops"), "users").is_empty());
        assert!(normalize_list(json!({ "users": "none" }), "users").is_empty());
        assert!(normalize_list(json!({ "categories": [1] }), "users").is_empty());
    }

    #[derive(Debug, serde::Deserialize, PartialEq)]
    struct Named {
        name: String,
    }

    #[test]
    fn decode_list_skips_bad_items() {
        let records: Vec<Named> = decode_list(json!([{ "name": "a" }, { "nope": 1 }, { "name": "b" }]), "x");
        assert_eq!(records, vec![Named { name: "a".into() }, Named { name: "b".into() }]);
    }

    #[test]
    fn rows_with_duplicate_spellings_are_kept() {
        let users: Vec<crate::types::User> = decode_list(
            json!({ "data": [
                { "id": 1, "full_name": "Root", "name": "Root", "email": "root@example.com" },
                { "id": 2, "email": "lan@example.com", "phone_number": "09", "numberPhone": "09" }
            ]}),
            "users",
        );
        assert_eq!(users.len(), 2);

        let categories: Vec<crate::types::Category> =
            decode_list(json!([{ "id": 1, "name": "Home", "item_count": "3", "itemCount": 3 }]), "categories");
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].item_count, Some(3));
    }

    #[test]
    fn decode_record_unwraps_known_wrappers() {
        let wrapped: Option<Named> = decode_record(json!({ "data": { "name": "a" } }), "category");
        assert_eq!(wrapped, Some(Named { name: "a".into() }));
        let keyed: Option<Named> = decode_record(json!({ "message": "ok", "category": { "name": "b" } }), "category");
        assert_eq!(keyed, Some(Named { name: "b".into() }));
        let bare: Option<Named> = decode_record(json!({ "name": "c" }), "category");
        assert_eq!(bare, Some(Named { name: "c".into() }));
        let none: Option<Named> = decode_record(json!({ "message": "created" }), "category");
        assert_eq!(none, None);
    }
}
