//! Typed conversation transcript model.
//!
//! A thread's history is an ordered `Vec<Message>`. Insertion order is
//! meaningful: a `ToolResult` must immediately follow the `Assistant`
//! message whose tool call it answers, and stores reject appends that
//! would break that adjacency.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A tool call requested by the model inside an assistant message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallRequest {
    /// Identifier tying the eventual `ToolResult` back to this request.
    pub call_id: String,
    /// Name of the tool to invoke.
    pub name: String,
    /// Arguments as parsed JSON.
    pub arguments: Value,
}

/// One entry in a conversation transcript.
///
/// Serialized with a `role` tag so stored threads read naturally:
///
/// ```json
/// {"role": "user", "text": "find wireless earbuds under 5000 yen"}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Message {
    /// Free-text user utterance.
    User {
        /// The raw utterance.
        text: String,
    },
    /// Model output: either a plain answer or a tool request.
    Assistant {
        /// Answer text; may be empty when the message only carries tool calls.
        text: String,
        /// Tool calls requested by the model, empty for a final answer.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        tool_calls: Vec<ToolCallRequest>,
    },
    /// Outcome of a tool call, success or error, fed back to the model as data.
    ToolResult {
        /// Name of the tool that produced this result.
        tool_name: String,
        /// Matches the `call_id` of the originating `ToolCallRequest`.
        call_id: String,
        /// Structured result payload (error payloads look like `{"error": ...}`).
        payload: Value,
    },
}

impl Message {
    /// Build a user message.
    pub fn user(text: impl Into<String>) -> Self {
        Self::User { text: text.into() }
    }

    /// Build a plain assistant answer.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::Assistant {
            text: text.into(),
            tool_calls: Vec::new(),
        }
    }

    /// Build an assistant message carrying a single tool call.
    pub fn assistant_tool_call(text: impl Into<String>, call: ToolCallRequest) -> Self {
        Self::Assistant {
            text: text.into(),
            tool_calls: vec![call],
        }
    }

    /// Build a tool result message.
    pub fn tool_result(
        tool_name: impl Into<String>,
        call_id: impl Into<String>,
        payload: Value,
    ) -> Self {
        Self::ToolResult {
            tool_name: tool_name.into(),
            call_id: call_id.into(),
            payload,
        }
    }

    /// True for `User` messages.
    pub fn is_user(&self) -> bool {
        matches!(self, Self::User { .. })
    }

    /// The tool calls carried by this message, if any.
    pub fn tool_calls(&self) -> &[ToolCallRequest] {
        match self {
            Self::Assistant { tool_calls, .. } => tool_calls,
            _ => &[],
        }
    }
}

/// Check the transcript causality invariant: every `ToolResult` is
/// immediately preceded by an `Assistant` message carrying a tool call
/// with the same `call_id`.
pub fn validate_sequence(messages: &[Message]) -> bool {
    for (idx, message) in messages.iter().enumerate() {
        if let Message::ToolResult { call_id, .. } = message {
            let answered = idx
                .checked_sub(1)
                .and_then(|prev| messages.get(prev))
                .map(|prev| prev.tool_calls().iter().any(|tc| &tc.call_id == call_id))
                .unwrap_or(false);
            if !answered {
                return false;
            }
        }
    }
    true
}

/// Drop the oldest messages until at most `max_len` remain, without ever
/// stranding a `ToolResult` from its originating tool call.
///
/// This is the external truncation policy hook: the core never prunes on
/// its own, but callers that do must go through here so the sequence
/// invariant survives.
pub fn truncate_oldest(messages: &[Message], max_len: usize) -> Vec<Message> {
    if messages.len() <= max_len {
        return messages.to_vec();
    }
    let mut start = messages.len() - max_len;
    // Never start the window on a ToolResult whose Assistant parent was cut.
    while start < messages.len() && matches!(messages[start], Message::ToolResult { .. }) {
        start += 1;
    }
    messages[start..].to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tool_call(id: &str) -> ToolCallRequest {
        ToolCallRequest {
            call_id: id.to_string(),
            name: "search".to_string(),
            arguments: json!({"keyword": "earbuds"}),
        }
    }

    #[test]
    fn test_serde_roundtrip() {
        let messages = vec![
            Message::user("hello"),
            Message::assistant_tool_call("", tool_call("call_1")),
            Message::tool_result("search", "call_1", json!([{"title": "x"}])),
            Message::assistant("done"),
        ];

        let encoded = serde_json::to_string(&messages).unwrap();
        let decoded: Vec<Message> = serde_json::from_str(&encoded).unwrap();
        assert_eq!(messages, decoded);
    }

    #[test]
    fn test_plain_assistant_omits_tool_calls() {
        let encoded = serde_json::to_string(&Message::assistant("hi")).unwrap();
        assert!(!encoded.contains("tool_calls"));

        let decoded: Message = serde_json::from_str(&encoded).unwrap();
        assert!(decoded.tool_calls().is_empty());
    }

    #[test]
    fn test_validate_sequence_accepts_well_formed() {
        let messages = vec![
            Message::user("q"),
            Message::assistant_tool_call("", tool_call("a")),
            Message::tool_result("search", "a", json!([])),
            Message::assistant("final"),
        ];
        assert!(validate_sequence(&messages));
    }

    #[test]
    fn test_validate_sequence_rejects_stranded_result() {
        let messages = vec![
            Message::user("q"),
            Message::tool_result("search", "a", json!([])),
        ];
        assert!(!validate_sequence(&messages));

        let mismatched = vec![
            Message::assistant_tool_call("", tool_call("a")),
            Message::tool_result("search", "other", json!([])),
        ];
        assert!(!validate_sequence(&mismatched));
    }

    #[test]
    fn test_truncate_preserves_invariant() {
        let messages = vec![
            Message::user("q1"),
            Message::assistant_tool_call("", tool_call("a")),
            Message::tool_result("search", "a", json!([])),
            Message::assistant("answer 1"),
            Message::user("q2"),
            Message::assistant("answer 2"),
        ];

        // A naive cut at len 4 would start on the ToolResult.
        let truncated = truncate_oldest(&messages, 4);
        assert!(truncated.len() <= 4);
        assert!(validate_sequence(&truncated));
        assert_eq!(truncated.first(), Some(&Message::assistant("answer 1")));
    }

    #[test]
    fn test_truncate_noop_when_short() {
        let messages = vec![Message::user("q")];
        assert_eq!(truncate_oldest(&messages, 10), messages);
    }
}
