//! External tool boundary
//!
//! The curl and ping strategies delegate the network probe to a system
//! binary. This module isolates process execution behind [`ToolAdapter`] so
//! the strategies only deal with arguments in and text out.

use crate::error::{AppError, Result};
use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// Captured result of one tool invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    /// Process exit code; `None` when terminated by a signal
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    pub fn new(exit_code: Option<i32>, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            exit_code,
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// stdout followed by stderr, as a shell would interleave `2>&1`
    pub fn combined(&self) -> String {
        match (self.stdout.is_empty(), self.stderr.is_empty()) {
            (_, true) => self.stdout.clone(),
            (true, false) => self.stderr.clone(),
            (false, false) => {
                let mut merged = self.stdout.clone();
                if !merged.ends_with('\n') {
                    merged.push('\n');
                }
                merged.push_str(&self.stderr);
                merged
            }
        }
    }

    /// Fallback detail when a failing tool printed nothing
    pub fn exit_description(&self, program: &str) -> String {
        match self.exit_code {
            Some(code) => format!("{} exited with status {}", program, code),
            None => format!("{} was terminated by a signal", program),
        }
    }
}

/// Runs an external program and captures its output
#[async_trait]
pub trait ToolAdapter: Send + Sync {
    /// Run `program` with `args`. A non-zero exit is *not* an error; only a
    /// failure to run the program at all is.
    async fn run(&self, program: &str, args: &[String]) -> Result<ToolOutput>;
}

/// Adapter that spawns real child processes
#[derive(Debug, Clone)]
pub struct ProcessToolAdapter {
    deadline: Duration,
}

impl ProcessToolAdapter {
    pub fn new(deadline: Duration) -> Self {
        Self { deadline }
    }
}

impl Default for ProcessToolAdapter {
    fn default() -> Self {
        Self::new(crate::defaults::TOOL_DEADLINE)
    }
}

#[async_trait]
impl ToolAdapter for ProcessToolAdapter {
    async fn run(&self, program: &str, args: &[String]) -> Result<ToolOutput> {
        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| AppError::tool(format!("failed to start {}: {}", program, e)))?;

        // Dropping the future on timeout drops the child, which kills it
        let output = tokio::time::timeout(self.deadline, child.wait_with_output())
            .await
            .map_err(|_| {
                AppError::timeout(format!(
                    "{} did not finish within {}s",
                    program,
                    self.deadline.as_secs()
                ))
            })?
            .map_err(|e| AppError::tool(format!("failed to read output of {}: {}", program, e)))?;

        Ok(ToolOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combined_output() {
        assert_eq!(ToolOutput::new(Some(0), "0.123", "").combined(), "0.123");
        assert_eq!(ToolOutput::new(Some(6), "", "curl: (6) Could not resolve host").combined(),
                   "curl: (6) Could not resolve host");
        assert_eq!(ToolOutput::new(Some(1), "line one", "line two").combined(), "line one\nline two");
    }

    #[test]
    fn test_exit_description() {
        assert_eq!(ToolOutput::new(Some(28), "", "").exit_description("curl"), "curl exited with status 28");
        assert!(ToolOutput::new(None, "", "").exit_description("ping").contains("signal"));
    }

    #[tokio::test]
    async fn test_missing_binary_is_tool_error() {
        let adapter = ProcessToolAdapter::default();
        let result = adapter
            .run("definitely-not-a-real-binary-5f1c", &["--version".to_string()])
            .await;
        let error = result.unwrap_err();
        assert_eq!(error.category(), "TOOL");
        assert!(error.detail().contains("failed to start"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_captures_exit_code_and_output() {
        let adapter = ProcessToolAdapter::default();
        let output = adapter
            .run("sh", &["-c".to_string(), "echo out; echo err >&2; exit 3".to_string()])
            .await
            .unwrap();
        assert_eq!(output.exit_code, Some(3));
        assert!(!output.success());
        assert_eq!(output.stdout.trim(), "out");
        assert_eq!(output.stderr.trim(), "err");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_deadline_kills_wedged_tool() {
        let adapter = ProcessToolAdapter::new(Duration::from_millis(200));
        let error = adapter
            .run("sleep", &["5".to_string()])
            .await
            .unwrap_err();
        assert_eq!(error.category(), "TIMEOUT");
        assert!(error.detail().contains("did not finish"));
    }
}
