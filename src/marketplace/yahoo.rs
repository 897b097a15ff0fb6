//! Yahoo! Shopping item search tool.
//!
//! Wraps the itemSearch V3 endpoint. Argument keys are passed through
//! to the API verbatim where the names already match (`price_from`,
//! `price_to`, `sort`), so the tool schema doubles as the request
//! contract.

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use super::{coerce_price, str_field};
use crate::tools::{Product, ToolDefinition, ToolExecutor, ToolOutcome};

const ITEM_SEARCH_URL: &str = "https://shopping.yahooapis.jp/ShoppingWebService/V3/itemSearch";

/// Searches Yahoo! Shopping for in-stock items matching a keyword,
/// with optional price and sort filters.
pub struct YahooSearchTool {
    client: reqwest::Client,
    base_url: String,
    app_id: String,
    affiliate_id: Option<String>,
    results: u32,
}

impl YahooSearchTool {
    pub fn new(app_id: impl Into<String>, affiliate_id: Option<String>, results: u32) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: ITEM_SEARCH_URL.to_string(),
            app_id: app_id.into(),
            affiliate_id,
            results,
        }
    }

    /// Point the tool at a different endpoint. Used by tests.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn definition() -> ToolDefinition {
        ToolDefinition::new(
            "yahoo_product_search",
            "Search Yahoo! Shopping for products by keyword. Supports price range \
             and sort filters. Returns up to 10 in-stock products with title, url, \
             image and price in yen.",
            json!({
                "type": "object",
                "properties": {
                    "keyword": {
                        "type": "string",
                        "description": "Search keyword, e.g. a product name or category"
                    },
                    "filters": {
                        "type": "object",
                        "properties": {
                            "price_from": {
                                "type": "integer",
                                "description": "Minimum price in yen",
                                "minimum": 0
                            },
                            "price_to": {
                                "type": "integer",
                                "description": "Maximum price in yen",
                                "minimum": 0
                            },
                            "sort": {
                                "type": "string",
                                "description": "Sort order; -price is descending price, +price ascending",
                                "enum": ["-score", "+price", "-price", "-review_count"]
                            },
                            "is_discounted": {
                                "type": "boolean",
                                "description": "Restrict to discounted items"
                            }
                        }
                    }
                },
                "required": ["keyword"]
            }),
        )
    }
}

/// Flatten tool arguments into itemSearch V3 query parameters.
pub fn build_search_params(
    args: &Value,
    app_id: &str,
    affiliate_id: Option<&str>,
    results: u32,
) -> Vec<(String, String)> {
    let mut params = vec![
        ("appid".to_string(), app_id.to_string()),
        ("results".to_string(), results.to_string()),
        ("in_stock".to_string(), "true".to_string()),
    ];
    if let Some(affiliate_id) = affiliate_id {
        params.push(("affiliate_type".to_string(), "vc".to_string()));
        params.push(("affiliate_id".to_string(), affiliate_id.to_string()));
    }
    if let Some(keyword) = args.get("keyword").and_then(Value::as_str) {
        params.push(("query".to_string(), keyword.to_string()));
    }
    if let Some(filters) = args.get("filters").and_then(Value::as_object) {
        for key in ["price_from", "price_to", "sort"] {
            if let Some(value) = filters.get(key) {
                let rendered = match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                params.push((key.to_string(), rendered));
            }
        }
        if filters.get("is_discounted").and_then(Value::as_bool) == Some(true) {
            params.push(("is_discounted".to_string(), "true".to_string()));
        }
    }
    params
}

/// Normalize an itemSearch V3 response body into products.
pub fn parse_search_response(body: &Value) -> Vec<Product> {
    let hits = match body.get("hits").and_then(Value::as_array) {
        Some(hits) => hits,
        None => return Vec::new(),
    };
    hits.iter()
        .map(|hit| Product {
            title: str_field(hit, "name", ""),
            url: str_field(hit, "url", ""),
            image_url: hit
                .get("image")
                .map(|image| str_field(image, "medium", ""))
                .unwrap_or_default(),
            price: hit.get("price").map(coerce_price).unwrap_or(0),
            description: str_field(hit, "description", ""),
        })
        .collect()
}

#[async_trait]
impl ToolExecutor for YahooSearchTool {
    async fn invoke(&self, args: &Value) -> ToolOutcome {
        let params = build_search_params(
            args,
            &self.app_id,
            self.affiliate_id.as_deref(),
            self.results,
        );
        debug!(url = %self.base_url, "yahoo item search request");

        let response = match self.client.get(&self.base_url).query(&params).send().await {
            Ok(response) => response,
            Err(err) => return ToolOutcome::error(format!("yahoo request failed: {}", err)),
        };
        if !response.status().is_success() {
            return ToolOutcome::error(format!(
                "yahoo request returned status {}",
                response.status()
            ));
        }
        let body: Value = match response.json().await {
            Ok(body) => body,
            Err(err) => return ToolOutcome::error(format!("yahoo response was not json: {}", err)),
        };
        ToolOutcome::products(parse_search_response(&body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params_map(params: Vec<(String, String)>) -> std::collections::HashMap<String, String> {
        params.into_iter().collect()
    }

    #[test]
    fn test_build_search_params_basic() {
        let args = json!({"keyword": "wireless earbuds"});
        let params = params_map(build_search_params(&args, "app-123", None, 10));

        assert_eq!(params["appid"], "app-123");
        assert_eq!(params["query"], "wireless earbuds");
        assert_eq!(params["results"], "10");
        assert_eq!(params["in_stock"], "true");
        assert!(!params.contains_key("affiliate_id"));
        assert!(!params.contains_key("price_to"));
    }

    #[test]
    fn test_build_search_params_with_filters_and_affiliate() {
        let args = json!({
            "keyword": "coffee grinder",
            "filters": {
                "price_from": 1000,
                "price_to": 5000,
                "sort": "+price",
                "is_discounted": true
            }
        });
        let params = params_map(build_search_params(&args, "app-123", Some("aff-9"), 10));

        assert_eq!(params["affiliate_type"], "vc");
        assert_eq!(params["affiliate_id"], "aff-9");
        assert_eq!(params["price_from"], "1000");
        assert_eq!(params["price_to"], "5000");
        assert_eq!(params["sort"], "+price");
        assert_eq!(params["is_discounted"], "true");
    }

    #[test]
    fn test_build_search_params_discount_false_omitted() {
        let args = json!({"keyword": "mug", "filters": {"is_discounted": false}});
        let params = params_map(build_search_params(&args, "app-123", None, 10));
        assert!(!params.contains_key("is_discounted"));
    }

    #[test]
    fn test_parse_search_response() {
        let body = json!({
            "totalResultsAvailable": 2,
            "hits": [
                {
                    "name": "Earbuds A",
                    "url": "https://example.com/a",
                    "image": {"medium": "https://example.com/a.jpg"},
                    "price": 3980,
                    "description": "Bluetooth 5.3"
                },
                {
                    "name": "Earbuds B",
                    "url": "https://example.com/b",
                    "price": "4500"
                }
            ]
        });

        let products = parse_search_response(&body);
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].title, "Earbuds A");
        assert_eq!(products[0].image_url, "https://example.com/a.jpg");
        assert_eq!(products[0].price, 3980);
        assert_eq!(products[1].price, 4500);
        assert_eq!(products[1].image_url, "");
    }

    #[test]
    fn test_parse_search_response_missing_hits() {
        assert!(parse_search_response(&json!({"Error": {"Message": "bad appid"}})).is_empty());
    }
}
