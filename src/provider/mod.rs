//! Model collaborator abstraction.
//!
//! The core never talks to a hosted model directly; it depends on the
//! [`ModelProvider`] trait and is handed an implementation at
//! construction time (no process-wide client singletons).

pub mod traits;

pub use traits::{ModelError, ModelProvider, ModelTurn};
