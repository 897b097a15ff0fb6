//! Tool registry: named, schema-validated external actions.
//!
//! Tools are pure request/response collaborators. Arguments are validated
//! against each tool's schema before any outbound call, and every failure
//! mode (validation, unknown name, remote error) is an
//! [`ToolOutcome::Err`] the model sees as data.

pub mod definition;
pub mod error;
pub mod outcome;
pub mod registry;
pub mod schema;

pub use definition::ToolDefinition;
pub use error::ToolError;
pub use outcome::{Product, ToolOutcome};
pub use registry::{DefaultToolRegistry, RegisteredTool, ToolExecutor, ToolRegistry};
pub use schema::validate_args;
