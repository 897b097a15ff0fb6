//! Error types for conversation storage.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur while loading or appending conversation state.
#[derive(Debug, Error)]
pub enum StoreError {
    /// IO error from a durable backend.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization or deserialization of stored messages failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The append would leave a `ToolResult` without its originating
    /// tool call in the stored sequence.
    #[error("invalid message sequence for thread {thread_id}: {message}")]
    InvalidSequence {
        /// Thread whose append was rejected.
        thread_id: String,
        /// Description of the violation.
        message: String,
    },

    /// Stored data could not be interpreted.
    #[error("corrupted thread data: {message}")]
    Corrupted {
        /// Description of the corruption.
        message: String,
    },
}

impl StoreError {
    /// Create an InvalidSequence error.
    pub fn invalid_sequence(thread_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidSequence {
            thread_id: thread_id.into(),
            message: message.into(),
        }
    }

    /// Create a Corrupted error.
    pub fn corrupted(message: impl Into<String>) -> Self {
        Self::Corrupted {
            message: message.into(),
        }
    }
}
