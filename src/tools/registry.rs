//! Tool registry: resolve by name, validate, invoke.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use super::definition::ToolDefinition;
use super::error::ToolError;
use super::outcome::ToolOutcome;
use super::schema::validate_args;

/// A callable external action.
///
/// Implementations make exactly one outbound call per `invoke` and never
/// retry internally; retry is the orchestrator's concern, and only for
/// model calls. Failures are returned as data, not errors.
#[async_trait]
pub trait ToolExecutor: Send + Sync {
    /// Execute the tool with already-validated arguments.
    async fn invoke(&self, args: &Value) -> ToolOutcome;
}

/// A registered tool: its definition plus the executor behind it.
#[derive(Clone)]
pub struct RegisteredTool {
    /// Schema and description advertised to the model.
    pub definition: ToolDefinition,
    /// The collaborator that performs the call.
    pub executor: Arc<dyn ToolExecutor>,
}

/// Lookup and invocation interface for the fixed tool set.
///
/// Object-safe; the orchestrator holds it as `Arc<dyn ToolRegistry>`.
#[async_trait]
pub trait ToolRegistry: Send + Sync {
    /// Get a tool's definition by name, or `None` if unknown.
    fn resolve(&self, name: &str) -> Option<&ToolDefinition>;

    /// Validate `args` against the named tool's schema, then execute it.
    ///
    /// An unknown name or a schema violation yields a `ToolOutcome::Err`
    /// without any remote call.
    async fn invoke(&self, name: &str, args: &Value) -> ToolOutcome;

    /// All registered definitions, for handing to the model each call.
    fn definitions(&self) -> Vec<ToolDefinition>;

    /// All registered tool names.
    fn names(&self) -> Vec<&str>;

    /// Number of registered tools.
    fn len(&self) -> usize;

    /// Check if no tools are registered.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// HashMap-backed registry; holds no mutable state between invocations.
#[derive(Default)]
pub struct DefaultToolRegistry {
    tools: HashMap<String, RegisteredTool>,
}

impl DefaultToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool; fails if the name is already taken.
    pub fn register(
        &mut self,
        definition: ToolDefinition,
        executor: Arc<dyn ToolExecutor>,
    ) -> Result<(), ToolError> {
        if self.tools.contains_key(&definition.name) {
            return Err(ToolError::duplicate_name(&definition.name));
        }
        self.tools.insert(
            definition.name.clone(),
            RegisteredTool {
                definition,
                executor,
            },
        );
        Ok(())
    }

    /// Register a tool, replacing any existing one with the same name.
    pub fn register_or_replace(
        &mut self,
        definition: ToolDefinition,
        executor: Arc<dyn ToolExecutor>,
    ) -> Option<RegisteredTool> {
        self.tools.insert(
            definition.name.clone(),
            RegisteredTool {
                definition,
                executor,
            },
        )
    }
}

#[async_trait]
impl ToolRegistry for DefaultToolRegistry {
    fn resolve(&self, name: &str) -> Option<&ToolDefinition> {
        self.tools.get(name).map(|t| &t.definition)
    }

    async fn invoke(&self, name: &str, args: &Value) -> ToolOutcome {
        let tool = match self.tools.get(name) {
            Some(tool) => tool,
            None => return ToolOutcome::error(format!("tool not found: {}", name)),
        };

        let problems = validate_args(&tool.definition.parameters, args);
        if !problems.is_empty() {
            return ToolOutcome::error(format!(
                "invalid arguments for {}: {}",
                name,
                problems.join("; ")
            ));
        }

        tool.executor.invoke(args).await
    }

    fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(|t| t.definition.clone()).collect()
    }

    fn names(&self) -> Vec<&str> {
        self.tools.keys().map(|s| s.as_str()).collect()
    }

    fn len(&self) -> usize {
        self.tools.len()
    }
}
