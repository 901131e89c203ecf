//! Process-output capture for flushed session files

use std::path::Path;

use async_trait::async_trait;
use tokio::process::Command;

/// Opaque producer of captured process output for a file.
///
/// Latency is unspecified and a hung capture stalls only the output-append
/// path, never change recording.
#[async_trait]
pub trait OutputCapture: Send + Sync {
    /// Run the given file through an external interpreter and capture its
    /// output as plain text.
    async fn capture(&self, path: &Path) -> String;
}

/// Runs `<program> <file>` and captures stdout, or stderr on failure.
///
/// A nonzero exit or a spawn error is not distinguished from success at the
/// data-model level: whatever text came back is the session's output.
#[derive(Debug, Clone)]
pub struct InterpreterCapture {
    program: String,
}

impl InterpreterCapture {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Whether the configured interpreter resolves to a binary on PATH.
    pub fn is_available(&self) -> bool {
        which::which(&self.program).is_ok()
    }
}

impl Default for InterpreterCapture {
    fn default() -> Self {
        Self::new("python3")
    }
}

#[async_trait]
impl OutputCapture for InterpreterCapture {
    async fn capture(&self, path: &Path) -> String {
        match Command::new(&self.program).arg(path).output().await {
            Ok(output) => {
                if output.status.success() {
                    String::from_utf8_lossy(&output.stdout).into_owned()
                } else {
                    String::from_utf8_lossy(&output.stderr).into_owned()
                }
            }
            Err(err) => {
                tracing::warn!(
                    program = %self.program,
                    path = %path.display(),
                    error = %err,
                    "Failed to run capture process"
                );
                err.to_string()
            }
        }
    }
}

/// Rolling history of captured outputs, one entry per capture run, capped at
/// a fixed number of most recent entries.
#[derive(Debug, Clone)]
pub struct OutputHistory {
    entries: Vec<String>,
    limit: usize,
}

impl OutputHistory {
    pub fn new(limit: usize) -> Self {
        Self {
            entries: Vec::new(),
            limit,
        }
    }

    pub fn push(&mut self, output: String) {
        self.entries.push(output);
        if self.entries.len() > self.limit {
            let excess = self.entries.len() - self.limit;
            self.entries.drain(..excess);
        }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// All entries joined by newline — the shared-output tag for a batch.
    pub fn joined(&self) -> String {
        self.entries.join("\n")
    }
}

impl Default for OutputHistory {
    fn default() -> Self {
        Self::new(50)
    }
}
