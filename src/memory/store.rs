//! Conversation store contract.

use async_trait::async_trait;

use super::errors::StoreResult;
use super::message::Message;

/// Keyed persistence for per-thread message history.
///
/// Implementations must provide atomic per-thread append semantics: an
/// `append` either lands completely or not at all, and the combined
/// sequence always satisfies the causality invariant checked by
/// [`validate_sequence`](super::message::validate_sequence). No cross-thread
/// coordination is required.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Load the full transcript for a thread.
    ///
    /// Unknown thread ids are not an error; they mean "new conversation"
    /// and return an empty sequence.
    async fn load(&self, thread_id: &str) -> StoreResult<Vec<Message>>;

    /// Atomically extend the stored transcript with `messages`.
    ///
    /// Returns [`StoreError::InvalidSequence`](super::errors::StoreError)
    /// without mutating anything if the extended sequence would strand a
    /// `ToolResult` from its tool call.
    async fn append(&self, thread_id: &str, messages: &[Message]) -> StoreResult<()>;

    /// Read-only diagnostic view of a thread.
    ///
    /// Unlike [`load`](Self::load), this distinguishes an unknown thread
    /// (`None`, the "no memory found" case) from an empty one.
    async fn snapshot(&self, thread_id: &str) -> StoreResult<Option<Vec<Message>>>;
}
