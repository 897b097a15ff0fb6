//! Per-thread turn exclusivity.
//!
//! At most one turn may be in flight per thread id; interleaved appends
//! for the same thread would corrupt the transcript ordering. Distinct
//! thread ids never contend.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::error::AgentError;

/// What to do when a second turn arrives for a busy thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusyPolicy {
    /// Wait for the in-flight turn; the queued turn sees its committed
    /// history.
    Queue,
    /// Fail fast with [`AgentError::Busy`].
    Reject,
}

/// Lock table mapping thread ids to their turn mutex.
#[derive(Default)]
pub(crate) struct ThreadGate {
    slots: std::sync::Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl ThreadGate {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn slot(&self, thread_id: &str) -> Arc<Mutex<()>> {
        let mut slots = self.slots.lock().expect("thread gate map poisoned");
        slots
            .entry(thread_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Acquire the turn lock for `thread_id` under `policy`.
    pub(crate) async fn acquire(
        &self,
        thread_id: &str,
        policy: BusyPolicy,
    ) -> Result<OwnedMutexGuard<()>, AgentError> {
        let slot = self.slot(thread_id);
        match policy {
            BusyPolicy::Queue => Ok(slot.lock_owned().await),
            BusyPolicy::Reject => slot
                .try_lock_owned()
                .map_err(|_| AgentError::busy(thread_id)),
        }
    }
}
