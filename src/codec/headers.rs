//! Header Map Module
//!
//! Multi-valued response headers for cache entries. Each header name maps
//! to an ordered list of [`Value`]s; a single-valued header is stored as a
//! one-element list so the serialized grammar stays uniform.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::codec::Value;

// == Header Map ==
/// An ordered map from header name to a list of dynamically-typed values.
///
/// Serializes as a JSON object whose values are always arrays.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HeaderMap {
    entries: BTreeMap<String, Vec<Value>>,
}

impl HeaderMap {
    // == Constructor ==
    /// Creates an empty header map.
    pub fn new() -> Self {
        Self::default()
    }

    // == Append ==
    /// Appends a value to the given header, preserving existing values.
    pub fn append(&mut self, name: &str, value: impl Into<Value>) {
        self.entries
            .entry(name.to_string())
            .or_default()
            .push(value.into());
    }

    // == Insert ==
    /// Replaces all values for the given header with a single value.
    pub fn insert(&mut self, name: &str, value: impl Into<Value>) {
        self.entries.insert(name.to_string(), vec![value.into()]);
    }

    /// Returns the first value for the given header, if any.
    pub fn get_first(&self, name: &str) -> Option<&Value> {
        self.entries.get(name).and_then(|values| values.first())
    }

    /// Returns all values for the given header.
    pub fn get_all(&self, name: &str) -> &[Value] {
        self.entries.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns true if the map holds no headers.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the number of header names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterates over header names and their value lists.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<Value>)> {
        self.entries.iter()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_preserves_order() {
        let mut headers = HeaderMap::new();
        headers.append("X-Custom", "first");
        headers.append("X-Custom", "second");

        assert_eq!(
            headers.get_all("X-Custom"),
            &[Value::from("first"), Value::from("second")]
        );
    }

    #[test]
    fn test_insert_replaces() {
        let mut headers = HeaderMap::new();
        headers.append("X-Custom", "first");
        headers.insert("X-Custom", "only");

        assert_eq!(headers.get_all("X-Custom"), &[Value::from("only")]);
    }

    #[test]
    fn test_get_first() {
        let mut headers = HeaderMap::new();
        headers.append("Content-Language", "en");
        headers.append("Content-Language", "fr");

        assert_eq!(headers.get_first("Content-Language"), Some(&Value::from("en")));
        assert_eq!(headers.get_first("Missing"), None);
    }

    #[test]
    fn test_single_value_serializes_as_list() {
        let mut headers = HeaderMap::new();
        headers.insert("X-Count", 5i64);

        let encoded = serde_json::to_string(&headers).unwrap();
        assert_eq!(encoded, r#"{"X-Count":[5]}"#);
    }

    #[test]
    fn test_round_trip_mixed_value_types() {
        let mut headers = HeaderMap::new();
        headers.append("X-Mixed", "text");
        headers.append("X-Mixed", 2i64);
        headers.append("X-Mixed", 4.4f64);
        headers.append("X-Mixed", true);
        headers.append("X-Mixed", Value::Null);
        headers.append("X-Other", Value::List(vec![Value::Int(1), Value::Int(2)]));

        let encoded = serde_json::to_string(&headers).unwrap();
        let decoded: HeaderMap = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, headers);
    }

    #[test]
    fn test_round_trip_nested_map_value() {
        let mut inner = std::collections::BTreeMap::new();
        inner.insert("dir".to_string(), Value::from("ltr"));

        let mut headers = HeaderMap::new();
        headers.append("X-Structured", Value::Map(inner));

        let encoded = serde_json::to_string(&headers).unwrap();
        let decoded: HeaderMap = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, headers);
    }

    #[test]
    fn test_empty_map_round_trip() {
        let headers = HeaderMap::new();
        let encoded = serde_json::to_string(&headers).unwrap();
        assert_eq!(encoded, "{}");
        let decoded: HeaderMap = serde_json::from_str(&encoded).unwrap();
        assert!(decoded.is_empty());
    }
}
