//! Tool definition type: name, description, and parameter schema.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Declarative description of a callable tool.
///
/// The parameter schema uses the JSON-Schema subset understood by
/// [`validate_args`](super::schema::validate_args): object types with
/// typed properties, `required` lists, `enum` token sets, and `minimum`
/// bounds.
///
/// # Example
///
/// ```
/// use kaimono::tools::ToolDefinition;
/// use serde_json::json;
///
/// let def = ToolDefinition::new(
///     "search",
///     "Search the marketplace by keyword",
///     json!({
///         "type": "object",
///         "properties": {
///             "keyword": { "type": "string", "description": "Search keyword" }
///         },
///         "required": ["keyword"]
///     }),
/// );
/// assert_eq!(def.to_openai_function()["function"]["name"], "search");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique registry key.
    pub name: String,

    /// Human-readable description for LLM consumption.
    pub description: String,

    /// JSON Schema for the accepted arguments.
    pub parameters: Value,
}

impl ToolDefinition {
    /// Create a new definition.
    pub fn new(name: impl Into<String>, description: impl Into<String>, parameters: Value) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }

    /// Create a definition that takes no arguments.
    pub fn new_simple(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(
            name,
            description,
            json!({
                "type": "object",
                "properties": {}
            }),
        )
    }

    /// Export the OpenAI-style function-calling schema for this tool.
    pub fn to_openai_function(&self) -> Value {
        json!({
            "type": "function",
            "function": {
                "name": self.name,
                "description": self.description,
                "parameters": self.parameters,
            }
        })
    }
}
