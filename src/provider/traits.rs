//! Model provider trait and its result/error types.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::memory::Message;
use crate::tools::ToolDefinition;

/// The outcome of one model invocation: exactly one of a final answer or
/// a tool request.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelTurn {
    /// The model answered the user directly; the turn can finish.
    FinalAnswer {
        /// Answer text.
        text: String,
    },
    /// The model wants a tool executed before it can answer.
    ToolRequest {
        /// Name of the requested tool.
        name: String,
        /// Parsed JSON arguments.
        arguments: Value,
        /// Provider-assigned id tying the result back to this request.
        call_id: String,
    },
}

/// Failures returned by the model collaborator.
///
/// The transient/permanent split drives the retry policy: only
/// rate-limiting is retried, everything else propagates immediately.
#[derive(Debug, Clone, Error)]
pub enum ModelError {
    /// The provider throttled the request; retryable with backoff.
    #[error("model rate limited: {message}")]
    RateLimited {
        /// Provider-reported detail.
        message: String,
    },

    /// Any non-retryable failure: bad credentials, malformed request,
    /// unparseable response.
    #[error("model request failed: {message}")]
    Failed {
        /// Provider-reported detail.
        message: String,
    },
}

impl ModelError {
    /// Create a transient rate-limit error.
    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::RateLimited {
            message: message.into(),
        }
    }

    /// Create a permanent failure.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
        }
    }

    /// True for the retryable (rate-limited) error class.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }
}

/// A hosted large-language-model the orchestrator can consult.
///
/// The collaborator is stateless across calls: the full working history
/// and the available tool schemas are supplied every time. Credential and
/// wire-format concerns live entirely behind implementations of this
/// trait.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Run one model inference over `history` with `tools` available.
    async fn generate(
        &self,
        history: &[Message],
        tools: &[ToolDefinition],
    ) -> Result<ModelTurn, ModelError>;

    /// Provider identifier for logging (e.g. "bedrock", "openai").
    fn provider_name(&self) -> &str;
}
