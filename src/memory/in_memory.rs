//! In-memory conversation store for single-process deployments.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::errors::{StoreError, StoreResult};
use super::message::{validate_sequence, Message};
use super::store::ConversationStore;

/// Process-lifetime store backed by a `HashMap` behind an async lock.
///
/// Appends take the write lock for the whole check-and-extend, which gives
/// the all-or-nothing guarantee for free; readers only contend during that
/// window.
#[derive(Debug, Default)]
pub struct InMemoryConversationStore {
    threads: RwLock<HashMap<String, Vec<Message>>>,
}

impl InMemoryConversationStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of threads with at least one stored message.
    pub async fn thread_count(&self) -> usize {
        self.threads.read().await.len()
    }

    /// Administrative eviction of a whole thread, returning its transcript.
    pub async fn evict(&self, thread_id: &str) -> Option<Vec<Message>> {
        self.threads.write().await.remove(thread_id)
    }
}

#[async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn load(&self, thread_id: &str) -> StoreResult<Vec<Message>> {
        Ok(self
            .threads
            .read()
            .await
            .get(thread_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn append(&self, thread_id: &str, messages: &[Message]) -> StoreResult<()> {
        if messages.is_empty() {
            return Ok(());
        }
        let mut threads = self.threads.write().await;
        let mut combined = threads.get(thread_id).cloned().unwrap_or_default();
        combined.extend_from_slice(messages);
        if !validate_sequence(&combined) {
            return Err(StoreError::invalid_sequence(
                thread_id,
                "append would strand a tool result from its tool call",
            ));
        }

        threads.insert(thread_id.to_string(), combined);
        Ok(())
    }

    async fn snapshot(&self, thread_id: &str) -> StoreResult<Option<Vec<Message>>> {
        Ok(self.threads.read().await.get(thread_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::message::ToolCallRequest;
    use serde_json::json;

    #[tokio::test]
    async fn test_unknown_thread_loads_empty() {
        let store = InMemoryConversationStore::new();
        assert!(store.load("nope").await.unwrap().is_empty());
        assert!(store.snapshot("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_append_and_load() {
        let store = InMemoryConversationStore::new();
        store
            .append("t1", &[Message::user("hi"), Message::assistant("hello")])
            .await
            .unwrap();

        let loaded = store.load("t1").await.unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(store.thread_count().await, 1);

        // Snapshot of a known thread is Some even if later emptied turns add nothing.
        assert_eq!(store.snapshot("t1").await.unwrap().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_append_rejects_stranded_tool_result() {
        let store = InMemoryConversationStore::new();
        let err = store
            .append(
                "t1",
                &[Message::tool_result("search", "call_1", json!([]))],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidSequence { .. }));

        // Nothing was persisted, not even an empty record.
        assert!(store.snapshot("t1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_append_validates_across_calls() {
        let store = InMemoryConversationStore::new();
        let call = ToolCallRequest {
            call_id: "c1".to_string(),
            name: "search".to_string(),
            arguments: json!({}),
        };
        store
            .append(
                "t1",
                &[Message::user("q"), Message::assistant_tool_call("", call)],
            )
            .await
            .unwrap();

        // The result answers the tool call persisted by the previous append.
        store
            .append("t1", &[Message::tool_result("search", "c1", json!([]))])
            .await
            .unwrap();
        assert_eq!(store.load("t1").await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_evict() {
        let store = InMemoryConversationStore::new();
        store.append("t1", &[Message::user("hi")]).await.unwrap();
        let evicted = store.evict("t1").await.unwrap();
        assert_eq!(evicted.len(), 1);
        assert!(store.snapshot("t1").await.unwrap().is_none());
    }
}
