//! Error types for the tools module.

use thiserror::Error;

/// Errors surfaced by registry management operations.
///
/// Note that tool *invocation* failures are not represented here: a failed
/// invocation becomes a [`ToolOutcome::Err`](super::outcome::ToolOutcome)
/// so the model can reason about it as data.
#[derive(Debug, Error)]
pub enum ToolError {
    /// A tool with the same name is already registered.
    #[error("tool already registered: {name}")]
    DuplicateName {
        /// Name of the duplicate tool.
        name: String,
    },

    /// A tool definition is malformed (e.g. parameters are not an object schema).
    #[error("invalid tool definition for {name}: {message}")]
    InvalidDefinition {
        /// Name of the offending tool.
        name: String,
        /// Description of the problem.
        message: String,
    },
}

impl ToolError {
    /// Create a DuplicateName error.
    pub fn duplicate_name(name: impl Into<String>) -> Self {
        Self::DuplicateName { name: name.into() }
    }

    /// Create an InvalidDefinition error.
    pub fn invalid_definition(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidDefinition {
            name: name.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_name_display() {
        let err = ToolError::duplicate_name("search");
        assert!(err.to_string().contains("search"));
        assert!(err.to_string().contains("already registered"));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ToolError>();
    }
}
