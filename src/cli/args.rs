//! CLI argument definitions using clap

use clap::{ArgAction, Parser, ValueEnum};
use std::path::{Path, PathBuf};

use crate::errors::ScenaristError;

/// scenarist - run declarative API and CLI scenarios
#[derive(Parser, Debug, Clone)]
#[command(name = "scenarist", version, about, long_about = None)]
pub struct Args {
    /// Global configuration file (YAML)
    #[arg(short = 'c', long = "config", value_name = "FILE", env = "SCENARIST_CONFIG")]
    pub config: PathBuf,

    /// Folders containing scenario files (*.yaml, *.yml)
    #[arg(value_name = "FOLDER", required = true, num_args = 1..)]
    pub folders: Vec<PathBuf>,

    // =========================================================================
    // RUN CONTROL
    // =========================================================================

    /// Print every pipeline stage as it completes
    #[arg(short = 'v', long = "verbose", action = ArgAction::SetTrue)]
    pub verbose: bool,

    /// Stop the run at the first failing scenario
    #[arg(long = "stop-on-error", action = ArgAction::SetTrue)]
    pub stop_on_error: bool,

    /// Override the configured base URL
    #[arg(long = "base-url", value_name = "URL")]
    pub base_url: Option<String>,

    /// Override the configured request timeout (0 disables it)
    #[arg(long = "timeout", value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Print the resolved execution order and exit
    #[arg(long = "list", action = ArgAction::SetTrue)]
    pub list: bool,

    // =========================================================================
    // OUTPUT
    // =========================================================================

    /// Report format: text (default) or json (JSON Lines)
    #[arg(
        long = "log-format",
        value_name = "FORMAT",
        value_enum,
        default_value_t = LogFormat::Text
    )]
    pub log_format: LogFormat,

    /// Disable colored output
    #[arg(long = "no-color", action = ArgAction::SetTrue)]
    pub no_color: bool,

    /// Print debug logs to stderr
    #[arg(long = "debug", action = ArgAction::SetTrue)]
    pub debug: bool,
}

impl Args {
    /// Check that every path argument points at something usable
    pub fn validate(&self) -> Result<(), ScenaristError> {
        check_config_file(&self.config)?;
        for folder in &self.folders {
            check_folder(folder)?;
        }
        Ok(())
    }
}

fn check_config_file(path: &Path) -> Result<(), ScenaristError> {
    if !path.exists() {
        return Err(ScenaristError::Argument(format!(
            "config file does not exist: {}",
            path.display()
        )));
    }
    if !path.is_file() {
        return Err(ScenaristError::Argument(format!(
            "config path is not a file: {}",
            path.display()
        )));
    }
    Ok(())
}

fn check_folder(path: &Path) -> Result<(), ScenaristError> {
    if !path.exists() {
        return Err(ScenaristError::Argument(format!(
            "folder does not exist: {}",
            path.display()
        )));
    }
    if !path.is_dir() {
        return Err(ScenaristError::Argument(format!(
            "path is not a folder: {}",
            path.display()
        )));
    }
    Ok(())
}

/// Report format
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Colored, human-readable progress (default)
    #[default]
    Text,
    /// JSON Lines format for parsing
    Json,
}
