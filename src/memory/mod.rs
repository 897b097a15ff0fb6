//! Conversation memory: the typed transcript model and its stores.
//!
//! A thread is one persistent multi-turn conversation, addressed by an
//! opaque string id. The orchestrator owns mutation; stores only guarantee
//! atomic per-thread appends and the transcript causality invariant.

pub mod errors;
pub mod file_store;
pub mod in_memory;
pub mod message;
pub mod store;

pub use errors::{StoreError, StoreResult};
pub use file_store::FileConversationStore;
pub use in_memory::InMemoryConversationStore;
pub use message::{truncate_oldest, validate_sequence, Message, ToolCallRequest};
pub use store::ConversationStore;
