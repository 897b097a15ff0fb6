//! Bounded exponential backoff around model calls.
//!
//! Applies only to the transient (rate-limited) error class; validation
//! and permanent failures propagate on the first attempt. Tool calls are
//! never retried here — their failures are conversation data.

use std::time::Duration;

use crate::error::AgentError;
use crate::memory::Message;
use crate::provider::{ModelProvider, ModelTurn};
use crate::tools::ToolDefinition;

/// Immutable retry configuration for model calls.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    /// Sleep after the first failed attempt.
    pub initial_delay: Duration,
    /// Growth factor for each subsequent sleep.
    pub backoff_multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_delay: Duration::from_secs(1),
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    /// The sleep applied after failed attempt number `attempt` (1-based):
    /// `initial_delay * multiplier^(attempt - 1)`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1) as i32;
        self.initial_delay
            .mul_f64(self.backoff_multiplier.powi(exponent))
    }
}

/// Invoke the model under `policy`.
///
/// Sleeps between transient failures with `tokio::time::sleep`, so the
/// backoff never blocks turns for other threads.
pub(crate) async fn call_model_with_retry(
    provider: &dyn ModelProvider,
    policy: &RetryPolicy,
    history: &[Message],
    tools: &[ToolDefinition],
) -> Result<ModelTurn, AgentError> {
    let mut last_error = String::new();

    for attempt in 1..=policy.max_attempts {
        match provider.generate(history, tools).await {
            Ok(turn) => return Ok(turn),
            Err(e) if e.is_transient() => {
                last_error = e.to_string();
                if attempt < policy.max_attempts {
                    tokio::time::sleep(policy.delay_for(attempt)).await;
                }
            }
            Err(e) => return Err(AgentError::Model(e)),
        }
    }

    Err(AgentError::RetryExhausted {
        attempts: policy.max_attempts,
        last_error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ModelError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct FlakyProvider {
        failures: u32,
        calls: AtomicU32,
    }

    #[async_trait]
    impl ModelProvider for FlakyProvider {
        async fn generate(
            &self,
            _history: &[Message],
            _tools: &[ToolDefinition],
        ) -> Result<ModelTurn, ModelError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                Err(ModelError::rate_limited("throttled"))
            } else {
                Ok(ModelTurn::FinalAnswer {
                    text: "ok".to_string(),
                })
            }
        }

        fn provider_name(&self) -> &str {
            "flaky"
        }
    }

    struct BrokenProvider;

    #[async_trait]
    impl ModelProvider for BrokenProvider {
        async fn generate(
            &self,
            _history: &[Message],
            _tools: &[ToolDefinition],
        ) -> Result<ModelTurn, ModelError> {
            Err(ModelError::failed("bad credentials"))
        }

        fn provider_name(&self) -> &str {
            "broken"
        }
    }

    #[test]
    fn test_delay_schedule() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(1), Duration::from_secs(1));
        assert_eq!(policy.delay_for(2), Duration::from_secs(2));
        assert_eq!(policy.delay_for(3), Duration::from_secs(4));
        assert_eq!(policy.delay_for(4), Duration::from_secs(8));
    }

    #[tokio::test(start_paused = true)]
    async fn test_recovers_within_budget() {
        let provider = FlakyProvider {
            failures: 3,
            calls: AtomicU32::new(0),
        };
        let policy = RetryPolicy::default();

        let started = tokio::time::Instant::now();
        let turn = call_model_with_retry(&provider, &policy, &[], &[])
            .await
            .unwrap();
        assert_eq!(
            turn,
            ModelTurn::FinalAnswer {
                text: "ok".to_string()
            }
        );
        // Slept 1s + 2s + 4s for the three transient failures.
        assert_eq!(started.elapsed(), Duration::from_secs(7));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhaustion_after_exact_attempts() {
        let provider = FlakyProvider {
            failures: u32::MAX,
            calls: AtomicU32::new(0),
        };
        let policy = RetryPolicy {
            max_attempts: 3,
            ..RetryPolicy::default()
        };

        let err = call_model_with_retry(&provider, &policy, &[], &[])
            .await
            .unwrap_err();
        match err {
            AgentError::RetryExhausted { attempts, .. } => assert_eq!(attempts, 3),
            other => panic!("unexpected error: {}", other),
        }
        assert_eq!(provider.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_permanent_error_not_retried() {
        let err = call_model_with_retry(&BrokenProvider, &RetryPolicy::default(), &[], &[])
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::Model(_)));
    }
}
