//! Run-wide variable store and last response snapshot

use std::fmt;
use std::time::Duration;

use indexmap::IndexMap;
use serde::ser::Error as _;
use serde::{Serialize, Serializer};
use serde_json::value::RawValue;

use crate::jsonpath::{JsonKind, JsonMatch};

/// A value held in the [`Store`]
///
/// Numbers, booleans and raw JSON fragments keep their kind but always
/// display as the JSON text they were read from.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreValue {
    String(String),
    /// Number exactly as written in the response
    Number(String),
    Bool(bool),
    /// Object or array exactly as written in the response
    Raw(String),
}

impl StoreValue {
    /// Classify a value found in a response body by its JSON kind
    pub fn from_match(found: &JsonMatch) -> Self {
        match found.kind() {
            JsonKind::String | JsonKind::Null => StoreValue::String(found.text()),
            JsonKind::Number => StoreValue::Number(found.raw().to_string()),
            JsonKind::Bool => StoreValue::Bool(found.raw() == "true"),
            JsonKind::Object | JsonKind::Array => StoreValue::Raw(found.raw().to_string()),
        }
    }
}

impl Serialize for StoreValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            StoreValue::String(s) | StoreValue::Raw(s) => serializer.serialize_str(s),
            StoreValue::Bool(b) => serializer.serialize_bool(*b),
            StoreValue::Number(n) => RawValue::from_string(n.clone())
                .map_err(S::Error::custom)?
                .serialize(serializer),
        }
    }
}

impl fmt::Display for StoreValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreValue::String(s) | StoreValue::Number(s) | StoreValue::Raw(s) => f.write_str(s),
            StoreValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<String> for StoreValue {
    fn from(s: String) -> Self {
        StoreValue::String(s)
    }
}

impl From<&str> for StoreValue {
    fn from(s: &str) -> Self {
        StoreValue::String(s.to_string())
    }
}

/// Key/value store shared by every stage of every scenario in a run
///
/// Keys are never removed; writing an existing key overwrites it.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Store {
    values: IndexMap<String, StoreValue>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<StoreValue>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&StoreValue> {
        self.values.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Entries in first-insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &StoreValue)> {
        self.values.iter()
    }
}

/// Snapshot of the most recent HTTP response
#[derive(Debug, Clone, Default, Serialize)]
pub struct LastResponse {
    pub status: u16,
    /// Header names are lowercase; repeated headers are joined with ", "
    pub headers: IndexMap<String, String>,
    pub body: String,
    #[serde(skip)]
    pub elapsed: Duration,
}

impl LastResponse {
    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Mutable state threaded through every stage of a run
#[derive(Debug, Default)]
pub struct RunContext {
    pub store: Store,
    pub last_response: Option<LastResponse>,
}

impl RunContext {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jsonpath;

    fn stored(body: &str, path: &str) -> StoreValue {
        StoreValue::from_match(&jsonpath::get(body, path).unwrap())
    }

    #[test]
    fn test_last_write_wins() {
        let mut store = Store::new();
        store.insert("token", "first");
        store.insert("token", "second");
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("token").unwrap().to_string(), "second");
    }

    #[test]
    fn test_classification_by_kind() {
        let body = r#"{"s":"John","n":1,"b":false,"o":{"a": [1, 2]},"z":null}"#;
        assert_eq!(stored(body, "s"), StoreValue::String("John".into()));
        assert_eq!(stored(body, "n"), StoreValue::Number("1".into()));
        assert_eq!(stored(body, "b"), StoreValue::Bool(false));
        assert_eq!(stored(body, "o"), StoreValue::Raw(r#"{"a": [1, 2]}"#.into()));
        assert_eq!(stored(body, "z"), StoreValue::String(String::new()));
    }

    #[test]
    fn test_display_matches_raw_json() {
        let body = r#"{"f":1.50,"t":true,"a":[1,"x"]}"#;
        assert_eq!(stored(body, "f").to_string(), "1.50");
        assert_eq!(stored(body, "t").to_string(), "true");
        assert_eq!(stored(body, "a").to_string(), r#"[1,"x"]"#);
    }

    #[test]
    fn test_serializes_numbers_verbatim() {
        let mut store = Store::new();
        store.insert("id", StoreValue::Number("12345678901234567890123".into()));
        store.insert("ok", StoreValue::Bool(true));
        store.insert("tags", StoreValue::Raw(r#"["a"]"#.into()));
        assert_eq!(
            serde_json::to_string(&store).unwrap(),
            r#"{"id":12345678901234567890123,"ok":true,"tags":"[\"a\"]"}"#
        );
    }

    #[test]
    fn test_header_lookup_ignores_case() {
        let mut response = LastResponse::default();
        response.headers.insert("content-type".into(), "application/json".into());
        assert_eq!(response.header("Content-Type"), Some("application/json"));
        assert_eq!(response.header("X-Missing"), None);
    }
}
