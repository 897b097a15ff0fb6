//! Marketplace search tools.
//!
//! These are the external product-search collaborators the model can
//! call. Each one maps validated tool arguments onto a marketplace's
//! query parameters, makes exactly one outbound request per invocation
//! (no internal retry), and normalizes the response into
//! [`Product`](crate::tools::Product) records. Credentials come from
//! [`EnvironmentLoader`](crate::config::EnvironmentLoader), never from
//! inside the core.

pub mod rakuten;
pub mod yahoo;

pub use rakuten::{RakutenRankingTool, RakutenSearchTool};
pub use yahoo::YahooSearchTool;

use serde_json::Value;

/// Coerce a marketplace price field into yen; the APIs return numbers
/// but occasionally numeric strings.
pub(crate) fn coerce_price(value: &Value) -> u64 {
    match value {
        Value::Number(n) => n.as_u64().unwrap_or(0),
        Value::String(s) => s.parse().unwrap_or(0),
        _ => 0,
    }
}

pub(crate) fn str_field(value: &Value, key: &str, fallback: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or(fallback)
        .to_string()
}
