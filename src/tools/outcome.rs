//! Tool invocation outcomes and the product record payload.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// One product record returned by a marketplace search tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Item display name.
    pub title: String,
    /// Item (or affiliate) page URL.
    pub url: String,
    /// Medium-size item image URL.
    pub image_url: String,
    /// Price in the smallest currency unit (yen for the JP marketplaces).
    pub price: u64,
    /// Item caption/description.
    pub description: String,
}

/// Result of invoking a tool.
///
/// Both variants are valid conversation data: an `Err` outcome becomes a
/// `ToolResult` message the model can recover from (for example by trying
/// a broader search), never a Rust error that aborts the turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ToolOutcome {
    /// The tool succeeded and produced a structured payload.
    ///
    /// For product-search tools the payload is an ordered array of
    /// [`Product`] records; an empty array is a valid success, distinct
    /// from an error.
    Ok {
        /// Structured result payload.
        payload: Value,
    },
    /// The tool failed: validation, unknown name, or remote failure.
    Err {
        /// Human/model-readable description of the failure.
        message: String,
    },
}

impl ToolOutcome {
    /// Success outcome with an arbitrary payload.
    pub fn ok(payload: Value) -> Self {
        Self::Ok { payload }
    }

    /// Success outcome carrying product records.
    pub fn products(products: Vec<Product>) -> Self {
        Self::Ok {
            payload: serde_json::to_value(products).unwrap_or_else(|_| json!([])),
        }
    }

    /// Failure outcome with a message.
    pub fn error(message: impl Into<String>) -> Self {
        Self::Err {
            message: message.into(),
        }
    }

    /// True for `Err` outcomes.
    pub fn is_err(&self) -> bool {
        matches!(self, Self::Err { .. })
    }

    /// The payload stored in a `ToolResult` message: the success payload
    /// itself, or `{"error": message}` for failures.
    pub fn to_payload(&self) -> Value {
        match self {
            Self::Ok { payload } => payload.clone(),
            Self::Err { message } => json!({ "error": message }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_product() -> Product {
        Product {
            title: "Wireless Earbuds".to_string(),
            url: "https://example.test/item/1".to_string(),
            image_url: "https://example.test/img/1.jpg".to_string(),
            price: 4980,
            description: "Bluetooth 5.3, 30h battery".to_string(),
        }
    }

    #[test]
    fn test_products_payload_is_ordered_array() {
        let outcome = ToolOutcome::products(vec![sample_product()]);
        let payload = outcome.to_payload();
        assert_eq!(payload[0]["title"], "Wireless Earbuds");
        assert_eq!(payload[0]["price"], 4980);
    }

    #[test]
    fn test_empty_success_distinct_from_error() {
        let empty = ToolOutcome::products(vec![]);
        assert!(!empty.is_err());
        assert_eq!(empty.to_payload(), json!([]));

        let err = ToolOutcome::error("search failed");
        assert!(err.is_err());
        assert_eq!(err.to_payload(), json!({"error": "search failed"}));
    }

    #[test]
    fn test_serde_roundtrip() {
        let outcome = ToolOutcome::products(vec![sample_product()]);
        let encoded = serde_json::to_string(&outcome).unwrap();
        assert!(encoded.contains("\"status\":\"ok\""));
        let decoded: ToolOutcome = serde_json::from_str(&encoded).unwrap();
        assert_eq!(outcome, decoded);
    }
}
