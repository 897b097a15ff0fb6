//! Turn-level error taxonomy.
//!
//! Tool and model faults that happen *inside* a turn are conversation data
//! (`ToolOutcome::Err` fed back as a `ToolResult`). Only failures that
//! prevent the turn from producing any answer at all surface here, and
//! every one of them leaves the conversation store exactly as it was
//! before the turn started.

use thiserror::Error;

use crate::memory::StoreError;
use crate::provider::ModelError;

/// Result type for orchestrator operations.
pub type AgentResult<T> = Result<T, AgentError>;

/// Errors that fail a whole turn atomically.
#[derive(Debug, Error)]
pub enum AgentError {
    /// The model kept rate-limiting until the retry budget ran out.
    #[error("model retries exhausted after {attempts} attempts: {last_error}")]
    RetryExhausted {
        /// Total attempts made.
        attempts: u32,
        /// The last transient error observed.
        last_error: String,
    },

    /// A permanent model failure; never retried.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// A turn is already in flight for this thread and the busy policy
    /// rejects concurrent requests.
    #[error("thread {thread_id} already has a turn in flight")]
    Busy {
        /// The contested thread id.
        thread_id: String,
    },

    /// The caller cancelled the turn; rolled back as if it never started.
    #[error("turn cancelled")]
    Cancelled,

    /// The per-turn wall-clock budget ran out between hops.
    #[error("turn exceeded its deadline of {budget_secs}s")]
    DeadlineExceeded {
        /// Configured budget in seconds.
        budget_secs: u64,
    },

    /// The conversation store failed to load or persist.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AgentError {
    /// Create a Busy error.
    pub fn busy(thread_id: impl Into<String>) -> Self {
        Self::Busy {
            thread_id: thread_id.into(),
        }
    }
}
