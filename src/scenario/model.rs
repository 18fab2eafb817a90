//! Scenario definitions as they appear in scenario files

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// A single declarative test case
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Unique scenario name, used by `depends`
    pub name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    /// Scenarios that must run before this one (pass or fail)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends: Vec<String>,

    /// Store key -> fake data tag
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub fake: IndexMap<String, String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<RequestSpec>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<CommandSpec>,

    #[serde(default, skip_serializing_if = "Expectations::is_empty")]
    pub expect: Expectations,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extract: Vec<Extraction>,
}

impl Scenario {
    /// Whether the validation and extraction stages have anything to look at
    ///
    /// Every request produces a response to check. A command-only scenario
    /// only reaches those stages when it declares expectations or extractions.
    pub fn inspects_response(&self) -> bool {
        self.request.is_some() || !self.expect.is_empty() || !self.extract.is_empty()
    }
}

/// HTTP request part of a scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestSpec {
    #[serde(default = "default_method")]
    pub method: String,

    /// Path appended to the configured base URL
    pub url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub headers: IndexMap<String, String>,
}

fn default_method() -> String {
    "GET".to_string()
}

/// Shell command part of a scenario
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommandSpec {
    pub command: String,

    /// Working directory; defaults to the current directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<String>,

    /// Store key receiving the trimmed stdout
    #[serde(default, rename = "as", skip_serializing_if = "Option::is_none")]
    pub capture: Option<String>,
}

/// Expected response properties
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Expectations {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,

    /// Header name -> exact expected value
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub headers: IndexMap<String, String>,

    /// JSON path -> expected value, compared by string form
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub json: IndexMap<String, JsonValue>,
}

impl Expectations {
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.headers.is_empty() && self.json.is_empty()
    }
}

/// Copy a value out of the response body into the store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Extraction {
    #[serde(default)]
    pub path: String,

    /// Store key
    #[serde(default, rename = "as")]
    pub var: String,
}

impl Extraction {
    pub fn new(path: impl Into<String>, var: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            var: var.into(),
        }
    }
}
