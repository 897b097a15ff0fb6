//! Rakuten Ichiba search and ranking tools.
//!
//! Two tools share the parsing code here. The search tool is a single
//! IchibaItem Search call; the ranking tool first resolves the keyword
//! to a genre via search, then fetches that genre's ranking. Medium
//! item images come back at 128x128, which is too small for product
//! cards, so the URLs are rewritten to 250x250.

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use super::{coerce_price, str_field};
use crate::tools::{Product, ToolDefinition, ToolExecutor, ToolOutcome};

const ITEM_SEARCH_URL: &str =
    "https://app.rakuten.co.jp/services/api/IchibaItem/Search/20170706";
const ITEM_RANKING_URL: &str =
    "https://app.rakuten.co.jp/services/api/IchibaItem/Ranking/20170628";

/// Searches Rakuten Ichiba for items matching a keyword.
pub struct RakutenSearchTool {
    client: reqwest::Client,
    search_url: String,
    app_id: String,
    affiliate_id: Option<String>,
    results: u32,
}

/// Fetches the Rakuten Ichiba sales ranking for a keyword's genre.
pub struct RakutenRankingTool {
    client: reqwest::Client,
    search_url: String,
    ranking_url: String,
    app_id: String,
    affiliate_id: Option<String>,
}

impl RakutenSearchTool {
    pub fn new(app_id: impl Into<String>, affiliate_id: Option<String>, results: u32) -> Self {
        Self {
            client: reqwest::Client::new(),
            search_url: ITEM_SEARCH_URL.to_string(),
            app_id: app_id.into(),
            affiliate_id,
            results,
        }
    }

    /// Point the tool at a different endpoint. Used by tests.
    pub fn with_search_url(mut self, url: impl Into<String>) -> Self {
        self.search_url = url.into();
        self
    }

    pub fn definition() -> ToolDefinition {
        ToolDefinition::new(
            "rakuten_product_search",
            "Search Rakuten Ichiba for products by keyword. Supports price range, \
             free-shipping and sort filters. Returns up to 10 available products \
             with title, url, image and price in yen.",
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
                            "minPrice": {
                                "type": "integer",
                                "description": "Minimum price in yen",
                                "minimum": 0
                            },
                            "maxPrice": {
                                "type": "integer",
                                "description": "Maximum price in yen",
                                "minimum": 0
                            },
                            "postageFree": {
                                "type": "integer",
                                "description": "1 to restrict to free-shipping items",
                                "enum": [0, 1]
                            },
                            "sort": {
                                "type": "string",
                                "description": "Sort order; -itemPrice is descending price",
                                "enum": ["standard", "+itemPrice", "-itemPrice", "-reviewCount", "-reviewAverage"]
                            }
                        }
                    }
                },
                "required": ["keyword"]
            }),
        )
    }
}

impl RakutenRankingTool {
    pub fn new(app_id: impl Into<String>, affiliate_id: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            search_url: ITEM_SEARCH_URL.to_string(),
            ranking_url: ITEM_RANKING_URL.to_string(),
            app_id: app_id.into(),
            affiliate_id,
        }
    }

    /// Point the tool at different endpoints. Used by tests.
    pub fn with_urls(mut self, search_url: impl Into<String>, ranking_url: impl Into<String>) -> Self {
        self.search_url = search_url.into();
        self.ranking_url = ranking_url.into();
        self
    }

    pub fn definition() -> ToolDefinition {
        ToolDefinition::new(
            "rakuten_genre_ranking",
            "Look up the best-selling products on Rakuten Ichiba in the genre that \
             matches a keyword. Use this when the shopper asks for popular or \
             trending items rather than a specific product.",
            json!({
                "type": "object",
                "properties": {
                    "keyword": {
                        "type": "string",
                        "description": "Keyword used to pick the product genre"
                    }
                },
                "required": ["keyword"]
            }),
        )
    }
}

fn base_params(app_id: &str, affiliate_id: Option<&str>) -> Vec<(String, String)> {
    let mut params = vec![
        ("applicationId".to_string(), app_id.to_string()),
        ("format".to_string(), "json".to_string()),
    ];
    if let Some(affiliate_id) = affiliate_id {
        params.push(("affiliateId".to_string(), affiliate_id.to_string()));
    }
    params
}

/// Flatten tool arguments into IchibaItem Search query parameters.
pub fn build_search_params(
    args: &Value,
    app_id: &str,
    affiliate_id: Option<&str>,
    results: u32,
) -> Vec<(String, String)> {
    let mut params = base_params(app_id, affiliate_id);
    params.push(("hits".to_string(), results.to_string()));
    params.push(("availability".to_string(), "1".to_string()));
    if let Some(keyword) = args.get("keyword").and_then(Value::as_str) {
        params.push(("keyword".to_string(), keyword.to_string()));
    }
    if let Some(filters) = args.get("filters").and_then(Value::as_object) {
        for key in ["minPrice", "maxPrice", "postageFree", "sort"] {
            if let Some(value) = filters.get(key) {
                let rendered = match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                params.push((key.to_string(), rendered));
            }
        }
    }
    params
}

/// Upgrade a Rakuten medium image URL from the 128px thumbnail to 250px.
pub fn upgrade_image_url(url: &str) -> String {
    url.replace("_ex=128x128", "_ex=250x250")
}

/// Normalize an IchibaItem Search or Ranking response into products.
/// Both endpoints wrap each entry in an `{"Item": {...}}` envelope.
pub fn parse_items_response(body: &Value) -> Vec<Product> {
    let items = match body.get("Items").and_then(Value::as_array) {
        Some(items) => items,
        None => return Vec::new(),
    };
    items
        .iter()
        .filter_map(|entry| entry.get("Item"))
        .map(|item| {
            let url = match item.get("affiliateUrl").and_then(Value::as_str) {
                Some(affiliate) if !affiliate.is_empty() => affiliate.to_string(),
                _ => str_field(item, "itemUrl", ""),
            };
            let image_url = item
                .get("mediumImageUrls")
                .and_then(Value::as_array)
                .and_then(|urls| urls.first())
                .map(|first| str_field(first, "imageUrl", ""))
                .unwrap_or_default();
            Product {
                title: str_field(item, "itemName", ""),
                url,
                image_url: upgrade_image_url(&image_url),
                price: item.get("itemPrice").map(coerce_price).unwrap_or(0),
                description: str_field(item, "itemCaption", ""),
            }
        })
        .collect()
}

/// Pull the genre id of the first search hit, if any.
pub fn first_genre_id(body: &Value) -> Option<String> {
    let item = body
        .get("Items")
        .and_then(Value::as_array)
        .and_then(|items| items.first())
        .and_then(|entry| entry.get("Item"))?;
    match item.get("genreId") {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

async fn fetch_json(
    client: &reqwest::Client,
    url: &str,
    params: &[(String, String)],
) -> Result<Value, String> {
    debug!(%url, "rakuten request");
    let response = client
        .get(url)
        .query(params)
        .send()
        .await
        .map_err(|err| format!("rakuten request failed: {}", err))?;
    if !response.status().is_success() {
        return Err(format!("rakuten request returned status {}", response.status()));
    }
    response
        .json()
        .await
        .map_err(|err| format!("rakuten response was not json: {}", err))
}

#[async_trait]
impl ToolExecutor for RakutenSearchTool {
    async fn invoke(&self, args: &Value) -> ToolOutcome {
        let params = build_search_params(
            args,
            &self.app_id,
            self.affiliate_id.as_deref(),
            self.results,
        );
        match fetch_json(&self.client, &self.search_url, &params).await {
            Ok(body) => ToolOutcome::products(parse_items_response(&body)),
            Err(message) => ToolOutcome::error(message),
        }
    }
}

#[async_trait]
impl ToolExecutor for RakutenRankingTool {
    async fn invoke(&self, args: &Value) -> ToolOutcome {
        let keyword = match args.get("keyword").and_then(Value::as_str) {
            Some(keyword) => keyword,
            None => return ToolOutcome::error("keyword is required"),
        };

        // One search hit is enough to learn the genre.
        let mut probe = base_params(&self.app_id, self.affiliate_id.as_deref());
        probe.push(("keyword".to_string(), keyword.to_string()));
        probe.push(("hits".to_string(), "1".to_string()));
        let search_body = match fetch_json(&self.client, &self.search_url, &probe).await {
            Ok(body) => body,
            Err(message) => return ToolOutcome::error(message),
        };
        let genre_id = match first_genre_id(&search_body) {
            Some(genre_id) => genre_id,
            None => {
                return ToolOutcome::error(format!(
                    "no rakuten genre found for keyword '{}'",
                    keyword
                ))
            }
        };

        let mut ranking = base_params(&self.app_id, self.affiliate_id.as_deref());
        ranking.push(("genreId".to_string(), genre_id));
        match fetch_json(&self.client, &self.ranking_url, &ranking).await {
            Ok(body) => {
                let mut products = parse_items_response(&body);
                products.truncate(10);
                ToolOutcome::products(products)
            }
            Err(message) => ToolOutcome::error(message),
        }
    }
}
