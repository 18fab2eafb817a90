//! Shell command stage

use std::process::{ExitStatus, Stdio};

use tokio::process::Command;
use tracing::debug;

use super::store::RunContext;
use crate::errors::StageError;
use crate::scenario::CommandSpec;

/// Captured result of a finished process
#[derive(Debug)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub status: ExitStatus,
}

/// Run `command` through the platform shell, capturing stdout and stderr
///
/// There is no timeout: the call waits for the process to exit.
pub async fn run_shell(command: &str, directory: Option<&str>) -> std::io::Result<CommandOutput> {
    let mut cmd = if cfg!(windows) {
        let mut cmd = Command::new("cmd");
        cmd.arg("/C");
        cmd
    } else {
        let mut cmd = Command::new("sh");
        cmd.arg("-c");
        cmd
    };
    cmd.arg(command)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    if let Some(dir) = directory.filter(|d| !d.is_empty()) {
        cmd.current_dir(dir);
    }

    let output = cmd.output().await?;
    Ok(CommandOutput {
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        status: output.status,
    })
}

/// Run the scenario command, if any, and capture its trimmed stdout
pub async fn execute_command(
    spec: Option<&CommandSpec>,
    ctx: &mut RunContext,
) -> Result<(), StageError> {
    let Some(spec) = spec else {
        return Ok(());
    };

    debug!(command = %spec.command, directory = ?spec.directory, "Running command");

    let output = run_shell(&spec.command, spec.directory.as_deref())
        .await
        .map_err(|e| StageError::CommandExecutionFailed {
            reason: e.to_string(),
            stderr: String::new(),
        })?;

    if !output.status.success() {
        return Err(StageError::CommandExecutionFailed {
            reason: output.status.to_string(),
            stderr: output.stderr,
        });
    }

    if let Some(key) = spec.capture.as_deref().filter(|k| !k.is_empty()) {
        let captured = output.stdout.trim().to_string();
        debug!(key, value = %captured, "Captured command output");
        ctx.store.insert(key, captured);
    }

    Ok(())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn spec(command: &str, capture: Option<&str>) -> CommandSpec {
        CommandSpec {
            command: command.to_string(),
            directory: None,
            capture: capture.map(String::from),
        }
    }

    #[tokio::test]
    async fn test_no_command_is_noop() {
        let mut ctx = RunContext::new();
        execute_command(None, &mut ctx).await.unwrap();
        assert!(ctx.store.is_empty());
    }

    #[tokio::test]
    async fn test_captures_trimmed_stdout() {
        let mut ctx = RunContext::new();
        execute_command(Some(&spec("printf '  hello world \\n\\n'", Some("out"))), &mut ctx)
            .await
            .unwrap();
        assert_eq!(ctx.store.get("out").unwrap().to_string(), "hello world");
    }

    #[tokio::test]
    async fn test_without_capture_key_stores_nothing() {
        let mut ctx = RunContext::new();
        execute_command(Some(&spec("echo hi", None)), &mut ctx).await.unwrap();
        assert!(ctx.store.is_empty());
    }

    #[tokio::test]
    async fn test_runs_in_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("marker.txt"), "found").unwrap();
        let mut ctx = RunContext::new();
        let command = CommandSpec {
            command: "cat marker.txt".to_string(),
            directory: Some(dir.path().to_string_lossy().into_owned()),
            capture: Some("marker".to_string()),
        };
        execute_command(Some(&command), &mut ctx).await.unwrap();
        assert_eq!(ctx.store.get("marker").unwrap().to_string(), "found");
    }

    #[tokio::test]
    async fn test_nonzero_exit_includes_stderr() {
        let mut ctx = RunContext::new();
        let err = execute_command(Some(&spec("echo broken >&2; exit 3", Some("out"))), &mut ctx)
            .await
            .unwrap_err();
        match &err {
            StageError::CommandExecutionFailed { stderr, .. } => {
                assert_eq!(stderr.trim(), "broken")
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().contains("broken"));
        assert!(!ctx.store.contains_key("out"));
    }

    #[tokio::test]
    async fn test_missing_directory_fails() {
        let mut ctx = RunContext::new();
        let command = CommandSpec {
            command: "true".to_string(),
            directory: Some("/definitely/not/a/dir".to_string()),
            capture: None,
        };
        let err = execute_command(Some(&command), &mut ctx).await.unwrap_err();
        assert!(matches!(err, StageError::CommandExecutionFailed { .. }));
    }

    #[test]
    fn test_run_shell_blocking_caller() {
        let output = tokio_test::block_on(run_shell("echo out; echo err >&2", None)).unwrap();
        assert!(output.status.success());
        assert_eq!(output.stdout.trim(), "out");
        assert_eq!(output.stderr.trim(), "err");
    }
}
