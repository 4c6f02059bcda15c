//! Process execution utilities
//!
//! Thin wrappers around [`std::process::Command`] used to hand a resolved
//! build over to Gradle:
//! - Output capture
//! - Directory context
//! - Environment variables
//! - Streaming output

use crate::error::{Error, Result};
use std::path::Path;
use std::process::{Command, Output, Stdio};

/// Result of a command execution
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Whether the command succeeded (exit code 0)
    pub success: bool,
    /// Exit code of the command
    pub exit_code: i32,
    /// Standard output
    pub stdout: String,
    /// Standard error
    pub stderr: String,
}

impl CommandResult {
    /// Create from std::process::Output
    pub fn from_output(output: Output) -> Self {
        Self {
            success: output.status.success(),
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }

    /// Get combined output (stdout + stderr)
    pub fn combined_output(&self) -> String {
        if self.stderr.is_empty() {
            self.stdout.clone()
        } else if self.stdout.is_empty() {
            self.stderr.clone()
        } else {
            format!("{}\n{}", self.stdout, self.stderr)
        }
    }
}

/// Run a command in a specific directory and capture output
pub fn run_command_in_dir(program: &str, args: &[&str], dir: &Path) -> Result<CommandResult> {
    let output = Command::new(program)
        .args(args)
        .current_dir(dir)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .map_err(|e| Error::process(format!("Failed to execute {}: {}", program, e)).with_source(e))?;

    Ok(CommandResult::from_output(output))
}

/// Run a command in a directory with extra environment, streaming its output
///
/// Returns the exit code (`-1` when terminated by a signal).
pub fn run_command_streaming_in_dir(
    program: &Path,
    args: &[String],
    dir: &Path,
    env: &[(String, String)],
) -> Result<i32> {
    let mut cmd = Command::new(program);
    cmd.args(args)
        .current_dir(dir)
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());

    for (key, value) in env {
        cmd.env(key, value);
    }

    let status = cmd.status().map_err(|e| {
        Error::process(format!("Failed to execute {}: {}", program.display(), e)).with_source(e)
    })?;

    Ok(status.code().unwrap_or(-1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn test_run_command_in_dir() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = run_command_in_dir("pwd", &[], dir.path()).unwrap();
        assert!(result.success);
        let reported = std::fs::canonicalize(result.stdout.trim()).unwrap();
        assert_eq!(reported, std::fs::canonicalize(dir.path()).unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn test_streaming_passes_env_and_exit_code() {
        let dir = tempfile::TempDir::new().unwrap();
        let code = run_command_streaming_in_dir(
            Path::new("sh"),
            &["-c".to_string(), "test \"$DROIDCFG_PROBE\" = yes && exit 7".to_string()],
            dir.path(),
            &[("DROIDCFG_PROBE".to_string(), "yes".to_string())],
        )
        .unwrap();
        assert_eq!(code, 7);
    }

    #[test]
    fn test_missing_program_is_process_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = run_command_in_dir("nonexistent_command_12345", &[], dir.path()).unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::ProcessError);
    }

    #[test]
    fn test_command_result_combined_output() {
        let result = CommandResult {
            success: true,
            exit_code: 0,
            stdout: "out".to_string(),
            stderr: "err".to_string(),
        };
        assert!(result.combined_output().contains("out"));
        assert!(result.combined_output().contains("err"));
    }
}
