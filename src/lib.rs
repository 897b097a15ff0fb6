//! Kaimono - Conversational shopping agent core
//!
//! Kaimono is the orchestration core of a conversational shopping
//! assistant. It wires an LLM provider, a registry of product-search
//! tools and a persistent conversation memory into a single turn loop:
//!
//! - **`memory`** - Thread-keyed conversation store with atomic appends
//! - **`tools`** - Schema-validated tool registry and executors
//! - **`provider`** - LLM provider abstraction
//! - **`orchestration`** - The turn loop: model calls, tool hops, retry
//! - **`marketplace`** - Yahoo! Shopping and Rakuten Ichiba tools
//! - **`config`** - Configuration and environment loading
//! - **`observability`** - Markdown turn logging
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use kaimono::prelude::*;
//!
//! async fn example(provider: Arc<dyn ModelProvider>) -> AgentResult<()> {
//!     let mut registry = DefaultToolRegistry::new();
//!     registry.register(
//!         YahooSearchTool::definition(),
//!         Arc::new(YahooSearchTool::new("app-id", None, 10)),
//!     )?;
//!
//!     let store = Arc::new(InMemoryConversationStore::new());
//!     let orchestrator = Orchestrator::new(
//!         provider,
//!         Arc::new(registry),
//!         store,
//!         OrchestratorConfig::default(),
//!     );
//!
//!     let output = orchestrator.handle("thread-1", "find me wireless earbuds").await?;
//!     println!("{}", output.final_text);
//!     Ok(())
//! }
//! ```

/// Configuration management
pub mod config;

/// Crate-level error types
pub mod error;

/// Marketplace search tools
pub mod marketplace;

/// Conversation memory
pub mod memory;

/// Turn logging
pub mod observability;

/// Turn orchestration
pub mod orchestration;

/// LLM provider abstraction
pub mod provider;

/// Tool registry and definitions
pub mod tools;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{Configuration, ConfigurationLoader, EnvironmentLoader};

    pub use crate::error::{AgentError, AgentResult};

    pub use crate::marketplace::{RakutenRankingTool, RakutenSearchTool, YahooSearchTool};

    pub use crate::memory::{
        ConversationStore, FileConversationStore, InMemoryConversationStore, Message,
        StoreError, StoreResult, ToolCallRequest,
    };

    pub use crate::observability::Logger;

    pub use crate::orchestration::{
        BusyPolicy, Orchestrator, OrchestratorConfig, RetryPolicy, ToolTraceEntry, TurnOutput,
    };

    pub use crate::provider::{ModelError, ModelProvider, ModelTurn};

    pub use crate::tools::{
        DefaultToolRegistry, Product, ToolDefinition, ToolExecutor, ToolOutcome, ToolRegistry,
    };
}
