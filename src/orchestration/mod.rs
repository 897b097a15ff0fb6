//! Turn orchestration: the two-node model/tool state machine.
//!
//! This is the core of the crate. It routes between "ask the model" and
//! "execute a tool", persists each completed turn atomically, retries
//! rate-limited model calls with bounded exponential backoff, and
//! serializes turns per thread id. It is deliberately not a general
//! workflow engine: the only shape it runs is the model-tool-model cycle.

pub mod exclusivity;
pub mod orchestrator;
pub mod retry;

pub use exclusivity::BusyPolicy;
pub use orchestrator::{Orchestrator, OrchestratorConfig, ToolTraceEntry, TurnOutput};
pub use retry::RetryPolicy;
