//! The turn state machine.
//!
//! One turn walks `LOADING -> MODEL_CALL -> (TOOL_CALL -> MODEL_CALL)* ->
//! DONE`: load history, ask the model, execute requested tools and feed
//! the results back, until the model produces a final answer or the hop
//! limit forces a fail-soft stop. The whole turn persists as a single
//! atomic append; a turn that fails leaves the store untouched.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::error::{AgentError, AgentResult};
use crate::memory::{ConversationStore, Message, ToolCallRequest};
use crate::observability::Logger;
use crate::provider::{ModelProvider, ModelTurn};
use crate::tools::{ToolOutcome, ToolRegistry};

use super::exclusivity::{BusyPolicy, ThreadGate};
use super::retry::{call_model_with_retry, RetryPolicy};

/// Orchestrator tuning knobs.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Maximum tool-call hops per turn before the fail-soft stop.
    pub max_hops: u32,
    /// Backoff policy for rate-limited model calls.
    pub retry: RetryPolicy,
    /// `true`: a tool result loops back to the model. `false`: the turn
    /// ends after the first tool result and answers with its payload.
    pub loop_after_tool: bool,
    /// `true`: replay the full stored transcript into the model context.
    /// `false`: replay only prior user messages. The stored transcript is
    /// complete either way.
    pub replay_full_history: bool,
    /// Handling of a second request for a thread with a turn in flight.
    pub busy_policy: BusyPolicy,
    /// Optional wall-clock budget per turn, checked between hops.
    pub turn_timeout: Option<Duration>,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_hops: 8,
            retry: RetryPolicy::default(),
            loop_after_tool: true,
            replay_full_history: true,
            busy_policy: BusyPolicy::Queue,
            turn_timeout: None,
        }
    }
}

/// One executed tool call, in execution order.
#[derive(Debug, Clone, Serialize)]
pub struct ToolTraceEntry {
    /// Tool that was invoked.
    pub tool_name: String,
    /// Arguments the model supplied.
    pub input: Value,
    /// What came back, success or error.
    pub output: ToolOutcome,
}

/// Result of a completed turn.
#[derive(Debug, Clone, Serialize)]
pub struct TurnOutput {
    /// The answer to hand back to the user.
    pub final_text: String,
    /// Every tool call made during the turn, in execution order. Empty
    /// when the model answered without tools.
    pub tool_trace: Vec<ToolTraceEntry>,
}

/// The agent core: routes between the model and the tool registry,
/// persisting one atomic transcript delta per turn.
///
/// All collaborators are injected at construction; the orchestrator holds
/// no global state.
pub struct Orchestrator {
    provider: Arc<dyn ModelProvider>,
    tools: Arc<dyn ToolRegistry>,
    store: Arc<dyn ConversationStore>,
    config: OrchestratorConfig,
    gate: ThreadGate,
    logger: Option<Logger>,
}

impl Orchestrator {
    /// Create an orchestrator over the given collaborators.
    pub fn new(
        provider: Arc<dyn ModelProvider>,
        tools: Arc<dyn ToolRegistry>,
        store: Arc<dyn ConversationStore>,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            provider,
            tools,
            store,
            config,
            gate: ThreadGate::new(),
            logger: None,
        }
    }

    /// Attach a turn logger.
    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Run one turn for `thread_id` with a fresh (never-fired) cancel token.
    pub async fn handle(&self, thread_id: &str, user_input: &str) -> AgentResult<TurnOutput> {
        self.handle_with_cancellation(thread_id, user_input, CancellationToken::new())
            .await
    }

    /// Run one turn, honoring `cancel` at the checkpoints between hops.
    ///
    /// Cancellation never interrupts an in-flight tool call; it takes
    /// effect at the next hop boundary and rolls the turn back as if it
    /// never started.
    pub async fn handle_with_cancellation(
        &self,
        thread_id: &str,
        user_input: &str,
        cancel: CancellationToken,
    ) -> AgentResult<TurnOutput> {
        let _turn_guard = self.gate.acquire(thread_id, self.config.busy_policy).await?;
        let deadline = self.config.turn_timeout.map(|d| Instant::now() + d);

        self.log(|l| l.log_turn_start(thread_id, user_input));
        let result = self
            .run_turn(thread_id, user_input, &cancel, deadline)
            .await;
        match &result {
            Ok(output) => self.log(|l| l.log_turn_complete(thread_id, &output.final_text)),
            Err(e) => self.log(|l| l.log_turn_failed(thread_id, &e.to_string())),
        }
        result
    }

    /// Diagnostic read of a stored transcript; `None` means the thread id
    /// has no memory.
    pub async fn memory_snapshot(&self, thread_id: &str) -> AgentResult<Option<Vec<Message>>> {
        Ok(self.store.snapshot(thread_id).await?)
    }

    async fn run_turn(
        &self,
        thread_id: &str,
        user_input: &str,
        cancel: &CancellationToken,
        deadline: Option<Instant>,
    ) -> AgentResult<TurnOutput> {
        // LOADING: stored history plus the new user message, in memory only.
        let stored = self.store.load(thread_id).await?;
        let mut working: Vec<Message> = if self.config.replay_full_history {
            stored
        } else {
            stored.into_iter().filter(Message::is_user).collect()
        };
        let mut delta: Vec<Message> = Vec::new();
        push(&mut working, &mut delta, Message::user(user_input));

        let tool_specs = self.tools.definitions();
        let mut trace: Vec<ToolTraceEntry> = Vec::new();
        let mut hops = 0u32;

        let final_text = loop {
            self.checkpoint(cancel, deadline)?;

            // MODEL_CALL, wrapped in the retry policy.
            let turn = call_model_with_retry(
                self.provider.as_ref(),
                &self.config.retry,
                &working,
                &tool_specs,
            )
            .await?;

            match turn {
                ModelTurn::FinalAnswer { text } => {
                    push(&mut working, &mut delta, Message::assistant(text.clone()));
                    break text;
                }
                ModelTurn::ToolRequest {
                    name,
                    arguments,
                    call_id,
                } => {
                    let call_id = if call_id.is_empty() {
                        Uuid::new_v4().to_string()
                    } else {
                        call_id
                    };
                    push(
                        &mut working,
                        &mut delta,
                        Message::assistant_tool_call(
                            "",
                            ToolCallRequest {
                                call_id: call_id.clone(),
                                name: name.clone(),
                                arguments: arguments.clone(),
                            },
                        ),
                    );

                    // TOOL_CALL: unknown names and failures come back as
                    // Err outcomes, which are data for the model.
                    let outcome = self.tools.invoke(&name, &arguments).await;
                    self.log(|l| l.log_tool_call(&name, &call_id, !outcome.is_err()));
                    push(
                        &mut working,
                        &mut delta,
                        Message::tool_result(name.clone(), call_id, outcome.to_payload()),
                    );
                    trace.push(ToolTraceEntry {
                        tool_name: name,
                        input: arguments,
                        output: outcome,
                    });

                    hops += 1;
                    if hops >= self.config.max_hops {
                        // Fail-soft: synthesize an answer instead of erroring.
                        let text = format!(
                            "Reached the limit of {} tool calls for this turn; stopping with the results gathered so far.",
                            self.config.max_hops
                        );
                        push(&mut working, &mut delta, Message::assistant(text.clone()));
                        break text;
                    }
                    if !self.config.loop_after_tool {
                        // Single-shot mode: the tool payload is the answer.
                        let text = trace
                            .last()
                            .map(|entry| entry.output.to_payload().to_string())
                            .unwrap_or_default();
                        push(&mut working, &mut delta, Message::assistant(text.clone()));
                        break text;
                    }
                }
            }
        };

        // DONE: one atomic append of everything this turn produced.
        self.store.append(thread_id, &delta).await?;
        Ok(TurnOutput {
            final_text,
            tool_trace: trace,
        })
    }

    /// Safe checkpoint between hops: cancellation and deadline only ever
    /// fire here, never mid tool call.
    fn checkpoint(
        &self,
        cancel: &CancellationToken,
        deadline: Option<Instant>,
    ) -> AgentResult<()> {
        if cancel.is_cancelled() {
            return Err(AgentError::Cancelled);
        }
        if let (Some(deadline), Some(budget)) = (deadline, self.config.turn_timeout) {
            if Instant::now() >= deadline {
                return Err(AgentError::DeadlineExceeded {
                    budget_secs: budget.as_secs(),
                });
            }
        }
        Ok(())
    }

    fn log(&self, entry: impl FnOnce(&Logger) -> anyhow::Result<()>) {
        if let Some(logger) = &self.logger {
            if let Err(e) = entry(logger) {
                eprintln!("Warning: failed to write turn log: {}", e);
            }
        }
    }
}

fn push(working: &mut Vec<Message>, delta: &mut Vec<Message>, message: Message) {
    working.push(message.clone());
    delta.push(message);
}
