//! Common test utilities for scenarist integration tests
//!
//! This module provides shared test infrastructure including:
//! - Scenario folder fixtures in temporary directories
//! - CLI invocation helpers
//! - Reporter output capture

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use scenarist::output::Painter;
use scenarist::pipeline::{ConsoleReporter, JsonReporter};
use tempfile::TempDir;

/// Exit status codes of the binary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Success = 0,
    Error = 1,
    Failed = 10,
    Interrupted = 130,
}

impl From<i32> for ExitStatus {
    fn from(code: i32) -> Self {
        match code {
            0 => ExitStatus::Success,
            10 => ExitStatus::Failed,
            130 => ExitStatus::Interrupted,
            _ => ExitStatus::Error,
        }
    }
}

/// A temporary project: one config file plus a scenario folder
pub struct Suite {
    pub dir: TempDir,
}

impl Default for Suite {
    fn default() -> Self {
        Self::new()
    }
}

impl Suite {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        std::fs::create_dir(dir.path().join("scenarios"))
            .expect("Failed to create scenario folder");
        Self { dir }
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.path().join("config.yaml")
    }

    pub fn scenario_dir(&self) -> PathBuf {
        self.dir.path().join("scenarios")
    }

    /// Write the global config with the given base URL and extra `config:` lines
    pub fn config(&self, base_url: &str, extra: &str) -> &Self {
        let mut yaml = format!("global:\n  config:\n    base_url: {}\n", base_url);
        for line in extra.lines().filter(|l| !l.trim().is_empty()) {
            yaml.push_str("    ");
            yaml.push_str(line);
            yaml.push('\n');
        }
        std::fs::write(self.config_path(), yaml).expect("Failed to write config");
        self
    }

    /// Write a scenario file into the scenario folder
    pub fn scenarios(&self, file: &str, yaml: &str) -> &Self {
        write_file(&self.scenario_dir(), file, yaml);
        self
    }

    /// Run the binary against this suite
    pub fn run(&self, extra_args: &[&str]) -> CliResponse {
        let config = self.config_path();
        let folder = self.scenario_dir();
        let mut args: Vec<&str> = vec!["--config", config.to_str().unwrap()];
        args.extend_from_slice(extra_args);
        args.push(folder.to_str().unwrap());
        scenarist(&args)
    }
}

pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).expect("Failed to write fixture");
    path
}

/// Result of running the CLI
#[derive(Debug)]
pub struct CliResponse {
    pub stdout: String,
    pub stderr: String,
    pub exit_status: ExitStatus,
    pub exit_code: i32,
}

impl CliResponse {
    /// Check if stdout contains a substring
    pub fn contains(&self, needle: &str) -> bool {
        self.stdout.contains(needle)
    }

    /// Parse every stdout line as JSON
    pub fn json_lines(&self) -> Vec<serde_json::Value> {
        self.stdout
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| serde_json::from_str(l).expect("stdout line is not JSON"))
            .collect()
    }
}

/// Run the CLI with the given arguments (excluding the program name)
pub fn scenarist(args: &[&str]) -> CliResponse {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_scenarist"));
    cmd.args(args)
        .env("NO_COLOR", "1")
        .env_remove("SCENARIST_CONFIG")
        .env_remove("SCENARIST_LOG")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let output = cmd.output().expect("Failed to execute command");
    parse_output(output)
}

fn parse_output(output: Output) -> CliResponse {
    let exit_code = output.status.code().unwrap_or(1);
    CliResponse {
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        exit_status: ExitStatus::from(exit_code),
        exit_code,
    }
}

/// Console reporter writing plain text into memory
pub fn console_reporter(verbose: bool) -> ConsoleReporter<Vec<u8>> {
    ConsoleReporter::new(Vec::new(), Painter::plain(), verbose)
}

pub fn console_output(reporter: ConsoleReporter<Vec<u8>>) -> String {
    String::from_utf8(reporter.into_inner()).expect("reporter output is UTF-8")
}

/// JSON reporter writing into memory
pub fn json_reporter() -> JsonReporter<Vec<u8>> {
    JsonReporter::new(Vec::new())
}

pub fn json_output(reporter: JsonReporter<Vec<u8>>) -> Vec<serde_json::Value> {
    let text = String::from_utf8(reporter.into_inner()).expect("reporter output is UTF-8");
    text.lines()
        .map(|l| serde_json::from_str(l).expect("reporter line is not JSON"))
        .collect()
}
