//! Exit status codes for the CLI
//!
//! - 0: every scenario passed
//! - 1: the run could not start (bad arguments, config, scenario files, dependency graph)
//! - 10: at least one scenario failed
//! - 130: user interrupted (Ctrl+C, standard SIGINT exit code)

use std::process::{ExitCode, Termination};

/// Exit status codes following standard Unix conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitStatus {
    /// All scenarios passed (or `--list` succeeded)
    Success = 0,
    /// The run refused to start
    Error = 1,
    /// One or more scenarios failed
    Failed = 10,
    /// User interrupted (Ctrl+C) - standard SIGINT code
    Interrupted = 130,
}

impl Termination for ExitStatus {
    fn report(self) -> ExitCode {
        ExitCode::from(self as u8)
    }
}

impl ExitStatus {
    /// Exit status for a finished run given its failure count
    ///
    /// Failures count regardless of stop-on-error: a run that stopped early
    /// because of a failure still exits non-zero.
    pub fn from_failures(failed: usize) -> Self {
        if failed == 0 {
            ExitStatus::Success
        } else {
            ExitStatus::Failed
        }
    }
}
