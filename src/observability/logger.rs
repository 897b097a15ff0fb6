//! Markdown turn log for agent interactions.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

/// Append-only markdown logger for turn activity.
///
/// Records turn starts, tool calls, and completions with UTC timestamps.
/// Logging is best-effort from the orchestrator's point of view; a failed
/// write never aborts a turn.
#[derive(Debug)]
pub struct Logger {
    log_file: PathBuf,
}

impl Logger {
    /// Initialize the logger.
    ///
    /// # Arguments
    /// * `log_file` - Path to the log file. If None, creates a timestamped
    ///   file under the system temp directory.
    pub fn new(log_file: Option<&Path>) -> Result<Self> {
        let log_file = match log_file {
            Some(p) => p.to_path_buf(),
            None => {
                let mut dir = std::env::temp_dir();
                dir.push("kaimono-logs");
                std::fs::create_dir_all(&dir).with_context(|| {
                    format!("Failed to create log directory: {}", dir.display())
                })?;
                dir.join(format!(
                    "turns_{}_{}.md",
                    Utc::now().timestamp_millis(),
                    std::process::id()
                ))
            }
        };

        if let Some(parent) = log_file.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
        }

        let logger = Self { log_file };
        if !logger.log_file.exists() {
            logger.initialize_log_file()?;
        }
        Ok(logger)
    }

    /// Path of the file being written.
    pub fn log_file(&self) -> &Path {
        &self.log_file
    }

    fn initialize_log_file(&self) -> Result<()> {
        let mut file = File::create(&self.log_file)
            .with_context(|| format!("Failed to create log file: {}", self.log_file.display()))?;
        let now: DateTime<Utc> = Utc::now();
        writeln!(file, "# Turn Log\n")?;
        writeln!(file, "Log started: {}\n", now.to_rfc3339())?;
        writeln!(file, "---\n")?;
        Ok(())
    }

    fn append_to_log(&self, content: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_file)
            .with_context(|| format!("Failed to open log file: {}", self.log_file.display()))?;
        write!(file, "{}", content).context("Failed to write to log file")?;
        Ok(())
    }

    /// Log the start of a turn.
    pub fn log_turn_start(&self, thread_id: &str, user_input: &str) -> Result<()> {
        self.append_to_log(&format!(
            "## Turn Started - {}\n\n**Thread:** {}\n**Input:** {}\n\n",
            Utc::now().to_rfc3339(),
            thread_id,
            user_input
        ))
    }

    /// Log one tool call and whether it succeeded.
    pub fn log_tool_call(&self, tool_name: &str, call_id: &str, success: bool) -> Result<()> {
        self.append_to_log(&format!(
            "**Tool:** {} ({}) - {}\n\n",
            tool_name,
            call_id,
            if success { "ok" } else { "error" }
        ))
    }

    /// Log a completed turn with its final answer.
    pub fn log_turn_complete(&self, thread_id: &str, final_text: &str) -> Result<()> {
        self.append_to_log(&format!(
            "**Turn complete** ({}) - {}\n\n{}\n\n---\n\n",
            thread_id,
            Utc::now().to_rfc3339(),
            final_text
        ))
    }

    /// Log a turn that failed and was rolled back.
    pub fn log_turn_failed(&self, thread_id: &str, error: &str) -> Result<()> {
        self.append_to_log(&format!(
            "**Turn failed** ({}) - {}\n\nError: {}\n\n---\n\n",
            thread_id,
            Utc::now().to_rfc3339(),
            error
        ))
    }
}
