//! Dotted JSON path lookup
//!
//! A gjson-compatible subset used by validation and extraction:
//!
//! - `user.name` - object member access, `\.` escapes a literal dot in a key
//! - `items.0.id` - numeric segments index into arrays
//! - `items.#` - array length
//! - `items.#.id` - map the rest of the path over every array element
//! - `user.na*` / `user.n?me` - wildcard match on object keys (first match wins)

use indexmap::IndexMap;
use serde_json::value::RawValue;
use serde_json::Value as JsonValue;

/// Kind of a resolved JSON value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonKind {
    String,
    Number,
    Bool,
    Object,
    Array,
    Null,
}

impl JsonKind {
    /// Classify raw JSON text by its first significant character
    fn of_raw(raw: &str) -> Self {
        match raw.trim_start().as_bytes().first() {
            Some(b'"') => JsonKind::String,
            Some(b'{') => JsonKind::Object,
            Some(b'[') => JsonKind::Array,
            Some(b't') | Some(b'f') => JsonKind::Bool,
            Some(b'n') => JsonKind::Null,
            _ => JsonKind::Number,
        }
    }
}

/// A value found by [`get`], kept as the exact text of the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonMatch {
    raw: String,
    kind: JsonKind,
}

impl JsonMatch {
    fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let kind = JsonKind::of_raw(&raw);
        Self { raw, kind }
    }

    pub fn kind(&self) -> JsonKind {
        self.kind
    }

    /// Source text, including quotes for strings
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// String form: strings unquoted, null empty, everything else raw JSON text
    pub fn text(&self) -> String {
        match self.kind {
            JsonKind::String => {
                serde_json::from_str(&self.raw).unwrap_or_else(|_| self.raw.clone())
            }
            JsonKind::Null => String::new(),
            _ => self.raw.clone(),
        }
    }

    /// `true` for numbers written with a fraction or an exponent
    pub fn is_fractional_number(&self) -> bool {
        self.kind == JsonKind::Number && self.raw.contains(['.', 'e', 'E'])
    }
}

/// Resolve `path` against a raw JSON document
///
/// Returns `None` when the text is not JSON or the path does not resolve.
pub fn get(json_text: &str, path: &str) -> Option<JsonMatch> {
    if path.is_empty() {
        return None;
    }
    let document: &RawValue = serde_json::from_str(json_text).ok()?;
    let segments = split_path(path);
    resolve(document, &segments)
}

/// String form of a value written in a scenario file
///
/// Strings are unquoted, null is empty, everything else is compact JSON.
pub fn value_text(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}

fn split_path(path: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut chars = path.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if let Some(escaped) = chars.next() {
                    current.push(escaped);
                }
            }
            '.' => segments.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    segments.push(current);
    segments
}

fn resolve(value: &RawValue, segments: &[String]) -> Option<JsonMatch> {
    let Some((segment, rest)) = segments.split_first() else {
        return Some(JsonMatch::new(value.get()));
    };

    match JsonKind::of_raw(value.get()) {
        JsonKind::Object => {
            let members: IndexMap<String, &RawValue> = serde_json::from_str(value.get()).ok()?;
            if let Some(child) = members.get(segment.as_str()) {
                return resolve(child, rest);
            }
            if has_wildcard(segment) {
                return members
                    .iter()
                    .find(|(key, _)| wildcard_match(segment, key))
                    .and_then(|(_, child)| resolve(child, rest));
            }
            None
        }
        JsonKind::Array => {
            let items: Vec<&RawValue> = serde_json::from_str(value.get()).ok()?;
            if segment == "#" {
                if rest.is_empty() {
                    return Some(JsonMatch::new(items.len().to_string()));
                }
                let mapped: Vec<String> = items
                    .iter()
                    .filter_map(|item| resolve(item, rest))
                    .map(|found| found.raw)
                    .collect();
                return Some(JsonMatch::new(format!("[{}]", mapped.join(","))));
            }
            let index: usize = segment.parse().ok()?;
            items.get(index).and_then(|child| resolve(child, rest))
        }
        _ => None,
    }
}

fn has_wildcard(segment: &str) -> bool {
    segment.contains('*') || segment.contains('?')
}

fn wildcard_match(pattern: &str, key: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let key: Vec<char> = key.chars().collect();
    matches_from(&pattern, &key)
}

fn matches_from(pattern: &[char], key: &[char]) -> bool {
    match pattern.split_first() {
        None => key.is_empty(),
        Some(('*', rest)) => (0..=key.len()).any(|skip| matches_from(rest, &key[skip..])),
        Some(('?', rest)) => !key.is_empty() && matches_from(rest, &key[1..]),
        Some((c, rest)) => key.first() == Some(c) && matches_from(rest, &key[1..]),
    }
}
