//! scenarist library interface
//!
//! Runs declarative end-to-end scenarios: each scenario may generate fake
//! data, run a shell command, send an HTTP request, check the response and
//! extract values for the scenarios that depend on it.
//!
//! # Module Organization
//!
//! - [`scenario`] - Scenario model and file loading
//! - [`config`] - Global run configuration
//! - [`pipeline`] - Dependency ordering, pipeline stages, runner and reporters
//! - [`fake`] - Fake data tag expansion
//! - [`jsonpath`] - Dotted JSON path lookup
//! - [`signals`] - Interrupt handling (was_interrupted, set_interrupted)
//! - [`errors`] - Error types (ScenaristError, StageError, Result)
//! - [`status`] - Exit status codes (ExitStatus)
//! - [`core`] - Main execution logic

pub mod cli;
pub mod config;
pub mod core;
pub mod errors;
pub mod fake;
pub mod jsonpath;
pub mod logging;
pub mod output;
pub mod pipeline;
pub mod scenario;
pub mod signals;
pub mod status;

pub use errors::{Result, ScenaristError, StageError};
pub use status::ExitStatus;
