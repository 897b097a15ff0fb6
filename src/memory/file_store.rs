//! Durable file-backed conversation store.
//!
//! One JSON file per thread under a base directory. Appends rewrite the
//! whole file through a write-temp-rename commit, so a crash mid-append
//! leaves either the old transcript or the new one, never a partial tail.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::errors::{StoreError, StoreResult};
use super::message::{validate_sequence, Message};
use super::store::ConversationStore;

/// Conversation store that survives process restarts.
pub struct FileConversationStore {
    base_path: PathBuf,
    // One async mutex per thread id; appends for distinct threads never
    // contend.
    append_locks: std::sync::Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl FileConversationStore {
    /// Create a store rooted at `base_path`, creating the directory if needed.
    pub fn new<P: AsRef<Path>>(base_path: P) -> StoreResult<Self> {
        let base_path = base_path.as_ref().to_path_buf();
        std::fs::create_dir_all(&base_path)?;
        Ok(Self {
            base_path,
            append_locks: std::sync::Mutex::new(HashMap::new()),
        })
    }

    /// Base directory holding the thread files.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn thread_path(&self, thread_id: &str) -> PathBuf {
        // Sanitize the id so it cannot escape the base directory.
        let sanitized: String = thread_id
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.base_path.join(format!("{}.json", sanitized))
    }

    fn append_lock(&self, thread_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.append_locks.lock().expect("append lock map poisoned");
        locks
            .entry(thread_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    async fn read_thread(&self, path: &Path) -> StoreResult<Vec<Message>> {
        match fs::read(path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Commit `messages` to `path` via a temp file and atomic rename.
    async fn write_thread(&self, path: &Path, messages: &[Message]) -> StoreResult<()> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let temp_path = self
            .base_path
            .join(format!("{}.tmp.{}", file_name, Uuid::new_v4()));

        let bytes = serde_json::to_vec_pretty(messages)?;
        fs::write(&temp_path, &bytes).await?;
        if let Err(e) = fs::rename(&temp_path, path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }
        Ok(())
    }
}

#[async_trait]
impl ConversationStore for FileConversationStore {
    async fn load(&self, thread_id: &str) -> StoreResult<Vec<Message>> {
        self.read_thread(&self.thread_path(thread_id)).await
    }

    async fn append(&self, thread_id: &str, messages: &[Message]) -> StoreResult<()> {
        if messages.is_empty() {
            return Ok(());
        }
        let lock = self.append_lock(thread_id);
        let _guard = lock.lock().await;

        let path = self.thread_path(thread_id);
        let mut combined = self.read_thread(&path).await?;
        combined.extend_from_slice(messages);
        if !validate_sequence(&combined) {
            return Err(StoreError::invalid_sequence(
                thread_id,
                "append would strand a tool result from its tool call",
            ));
        }

        self.write_thread(&path, &combined).await
    }

    async fn snapshot(&self, thread_id: &str) -> StoreResult<Option<Vec<Message>>> {
        let path = self.thread_path(thread_id);
        match fs::try_exists(&path).await {
            Ok(true) => Ok(Some(self.read_thread(&path).await?)),
            Ok(false) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
