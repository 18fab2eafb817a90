//! Error types for scenarist

use thiserror::Error;

use crate::fake::FakeError;
use crate::pipeline::dependency::DependencyError;

/// Main error type for scenarist
///
/// Everything that stops a run before (or instead of) executing scenarios ends up here.
/// Failures of a single scenario are [`StageError`]s and never abort the process on their own.
#[derive(Error, Debug)]
pub enum ScenaristError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Load error: {0}")]
    Load(String),

    #[error("Invalid argument: {0}")]
    Argument(String),

    #[error(transparent)]
    Dependency(#[from] DependencyError),
}

pub type Result<T> = std::result::Result<T, ScenaristError>;

/// Error raised by a pipeline stage; fails the current scenario only.
#[derive(Error, Debug)]
pub enum StageError {
    #[error("scenario must have either a request or a command")]
    NothingToExecute,

    #[error("failed to generate fake data for '{key}': {source}")]
    FakeDataGenerationFailed {
        key: String,
        #[source]
        source: FakeError,
    },

    #[error("command execution failed: {}", describe_command_failure(.reason, .stderr))]
    CommandExecutionFailed { reason: String, stderr: String },

    #[error("failed to create request: {0}")]
    RequestConstructionFailed(String),

    #[error("failed to make request: {0}")]
    RequestFailed(#[source] reqwest::Error),

    #[error("no response to validate")]
    NoResponseToValidate,

    #[error("unexpected status code: expected {expected}, got {actual}")]
    UnexpectedStatusCode { expected: u16, actual: u16 },

    #[error("header not found: expected {header} to be present")]
    HeaderNotFound { header: String },

    #[error("header not equal: expected header {header} to be {expected}, got {actual}")]
    HeaderNotEqual {
        header: String,
        expected: String,
        actual: String,
    },

    #[error("json path not found: expected {path} to be present")]
    JsonPathNotFound { path: String },

    #[error("json path not equal: expected {path} to be {expected}, got {actual}")]
    JsonPathNotEqual {
        path: String,
        expected: String,
        actual: String,
    },

    #[error("no response to extract data from")]
    NoResponseToExtract,

    #[error("extraction path cannot be empty")]
    ExtractionPathEmpty,

    #[error("extraction variable name cannot be empty")]
    ExtractionVariableNameEmpty,

    #[error("extraction path not found: expected {path} to be present")]
    ExtractionPathNotFound { path: String },
}

fn describe_command_failure(reason: &str, stderr: &str) -> String {
    let stderr = stderr.trim();
    if stderr.is_empty() {
        reason.to_string()
    } else {
        format!("{}: {}", stderr, reason)
    }
}
