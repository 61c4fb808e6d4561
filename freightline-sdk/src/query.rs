//! Canonical query identity.
//!
//! A logical list query is an endpoint path plus its full filter/ordering
//! parameter set. [`QueryParams`] is the canonical, order-independent form of
//! that parameter set; [`QueryKey`] is the derived identity ("bucket") the
//! paginated fetch layer uses to decide whether two operations belong to the
//! same query. Equal logical parameter sets produce equal keys regardless of
//! field declaration order.

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{SdkError, SdkResult};

/// Canonical form of a query's parameters.
///
/// Keys are held sorted; values are plain strings. Build one from a typed
/// filter struct with [`QueryParams::try_from_serialize`], or assemble it
/// directly with [`QueryParams::with`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(BTreeMap<String, String>);

impl QueryParams {
    /// Create an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a parameter, replacing any previous value for the key.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Look up a parameter value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no parameters are set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The parameters in key order.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Canonicalize any `Serialize` filter struct.
    ///
    /// The struct must serialize to a JSON object (or null, taken as empty).
    /// `None` fields are dropped, scalars are stringified, arrays of scalars
    /// are comma-joined. Nested objects have no canonical query form and are
    /// rejected.
    pub fn try_from_serialize<P: Serialize>(params: &P) -> SdkResult<Self> {
        let mut map = BTreeMap::new();
        match serde_json::to_value(params)? {
            Value::Null => {}
            Value::Object(fields) => {
                for (key, value) in fields {
                    match Self::scalar(&key, value)? {
                        Some(rendered) => {
                            map.insert(key, rendered);
                        }
                        None => continue,
                    }
                }
            }
            other => {
                return Err(SdkError::InvalidRequest(format!(
                    "query parameters must serialize to an object, got {other}"
                )))
            }
        }
        Ok(Self(map))
    }

    fn scalar(key: &str, value: Value) -> SdkResult<Option<String>> {
        match value {
            Value::Null => Ok(None),
            Value::String(s) => Ok(Some(s)),
            Value::Bool(b) => Ok(Some(b.to_string())),
            Value::Number(n) => Ok(Some(n.to_string())),
            Value::Array(items) => {
                let mut parts = Vec::with_capacity(items.len());
                for item in items {
                    match Self::scalar(key, item)? {
                        Some(part) => parts.push(part),
                        None => continue,
                    }
                }
                Ok(Some(parts.join(",")))
            }
            Value::Object(_) => Err(SdkError::InvalidRequest(format!(
                "query parameter '{key}' is a nested object and cannot be canonicalized"
            ))),
        }
    }
}

/// Identity of a logical query: endpoint path plus canonical parameters.
///
/// Two fetch operations belong to the same query iff their keys are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey(String);

impl QueryKey {
    /// Derive the key for a path and parameter set.
    pub fn derive(path: &str, params: &QueryParams) -> Self {
        let mut encoded = url::form_urlencoded::Serializer::new(String::new());
        for (key, value) in params.pairs() {
            encoded.append_pair(key, value);
        }
        Self(format!(
            "{}?{}",
            path.trim_matches('/'),
            encoded.finish()
        ))
    }

    /// The key as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Filters {
        text: Option<String>,
        page_size: u32,
        statuses: Vec<&'static str>,
        archived: Option<bool>,
    }

    #[test]
    fn test_canonicalization_drops_nones_and_joins_arrays() {
        let params = QueryParams::try_from_serialize(&Filters {
            text: Some("abc".to_string()),
            page_size: 25,
            statuses: vec!["planned", "ongoing"],
            archived: None,
        })
        .unwrap();

        assert_eq!(params.get("text"), Some("abc"));
        assert_eq!(params.get("page_size"), Some("25"));
        assert_eq!(params.get("statuses"), Some("planned,ongoing"));
        assert_eq!(params.get("archived"), None);
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn test_key_is_deterministic_and_order_independent() {
        let a = QueryParams::new().with("text", "abc").with("ordering", "-date");
        let b = QueryParams::new().with("ordering", "-date").with("text", "abc");

        assert_eq!(QueryKey::derive("trips/", &a), QueryKey::derive("trips/", &b));
        assert_eq!(
            QueryKey::derive("trips/", &a),
            QueryKey::derive("trips/", &a)
        );
    }

    #[test]
    fn test_different_params_produce_different_keys() {
        let a = QueryParams::new().with("text", "abc");
        let b = QueryParams::new().with("text", "abd");

        assert_ne!(QueryKey::derive("trips/", &a), QueryKey::derive("trips/", &b));
        assert_ne!(
            QueryKey::derive("trips/", &a),
            QueryKey::derive("invoices/", &a)
        );
    }

    #[test]
    fn test_key_encodes_reserved_characters() {
        let tricky = QueryParams::new().with("text", "a&b=c");
        let plain = QueryParams::new().with("text", "a").with("b", "c");

        assert_ne!(
            QueryKey::derive("trips/", &tricky),
            QueryKey::derive("trips/", &plain)
        );
    }

    #[test]
    fn test_nested_objects_are_rejected() {
        #[derive(Serialize)]
        struct Nested {
            filter: Filters,
        }

        let result = QueryParams::try_from_serialize(&Nested {
            filter: Filters {
                text: None,
                page_size: 1,
                statuses: vec![],
                archived: None,
            },
        });

        assert!(matches!(result, Err(SdkError::InvalidRequest(_))));
    }
}
