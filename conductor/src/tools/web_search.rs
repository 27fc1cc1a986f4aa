//! Web search tool backed by the Tavily search API.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::tool_source::{ToolCallContent, ToolSourceError, ToolSpec};
use crate::tools::Tool;

pub const TOOL_WEB_SEARCH: &str = "web_search";

const TAVILY_API_URL: &str = "https://api.tavily.com";
const DEFAULT_NUM_RESULTS: u64 = 5;
const NUM_RESULTS_MAX: u64 = 20;

fn tavily_api_url() -> String {
    std::env::var("TAVILY_API_URL").unwrap_or_else(|_| TAVILY_API_URL.to_string())
}

#[derive(Deserialize)]
struct WebSearchArgs {
    query: String,
    #[serde(default)]
    num_results: Option<u64>,
}

/// `web_search`: given a query and a result count, returns ranked
/// `[{title, url, content}]` as JSON text.
pub struct WebSearchTool {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl WebSearchTool {
    /// Base URL from `TAVILY_API_URL`, falling back to the public endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: tavily_api_url(),
            client: reqwest::Client::new(),
        }
    }

    /// Tool configured from `TAVILY_API_KEY`; `None` when the key is unset or empty.
    pub fn from_env() -> Option<Self> {
        std::env::var("TAVILY_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .map(Self::new)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn search(&self, query: &str, num_results: u64) -> Result<Value, ToolSourceError> {
        let url = format!("{}/search", self.base_url.trim_end_matches('/'));
        let body = json!({
            "api_key": self.api_key,
            "query": query,
            "max_results": num_results,
        });
        tracing::debug!(url = %url, query = %query, num_results, "web search request");
        let res = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ToolSourceError::Transport(e.to_string()))?;
        let status = res.status();
        let text = res
            .text()
            .await
            .map_err(|e| ToolSourceError::Transport(e.to_string()))?;
        if !status.is_success() {
            return Err(ToolSourceError::Transport(api_error_detail(status, &text)));
        }
        serde_json::from_str(&text).map_err(|e| ToolSourceError::Transport(e.to_string()))
    }
}

/// Extracts `detail.error` from a Tavily error body, else the raw body.
fn api_error_detail(status: reqwest::StatusCode, body: &str) -> String {
    let detail = serde_json::from_str::<Value>(body).ok().and_then(|v| {
        v.pointer("/detail/error")
            .and_then(|e| e.as_str())
            .map(String::from)
    });
    match detail {
        Some(d) => format!("web search API error {}: {}", status, d),
        None => format!("web search API error {}: {}", status, body),
    }
}

/// Maps the API response to ranked `{title, url, content}` entries.
fn format_results(value: &Value) -> Value {
    let results = value
        .get("results")
        .and_then(|r| r.as_array())
        .map(|items| {
            items
                .iter()
                .filter(|r| r.is_object())
                .map(|r| {
                    json!({
                        "title": r.get("title").cloned().unwrap_or(Value::Null),
                        "url": r.get("url").cloned().unwrap_or(Value::Null),
                        "content": r.get("content").cloned().unwrap_or(Value::Null),
                    })
                })
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();
    Value::Array(results)
}

#[async_trait]
impl Tool for WebSearchTool {
    fn name(&self) -> &str {
        TOOL_WEB_SEARCH
    }

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: TOOL_WEB_SEARCH.to_string(),
            description: Some("Useful when you want to find information in the web".to_string()),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "The search query to look up"
                    },
                    "num_results": {
                        "type": "integer",
                        "description": "Number of search results to return"
                    }
                },
                "required": ["query", "num_results"]
            }),
        }
    }

    async fn call(&self, args: Value) -> Result<ToolCallContent, ToolSourceError> {
        let args: WebSearchArgs = serde_json::from_value(args)
            .map_err(|e| ToolSourceError::InvalidInput(e.to_string()))?;
        if args.query.trim().is_empty() {
            return Err(ToolSourceError::InvalidInput("query must not be empty".into()));
        }
        let n = args
            .num_results
            .unwrap_or(DEFAULT_NUM_RESULTS)
            .clamp(1, NUM_RESULTS_MAX);
        let raw = self.search(&args.query, n).await?;
        Ok(ToolCallContent {
            text: format_results(&raw).to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_results_keeps_title_url_content_only() {
        let raw = json!({
            "results": [
                {"title": "Rust", "url": "https://rust-lang.org", "content": "A language", "score": 0.9},
                "garbage",
                {"title": "Tokio", "url": "https://tokio.rs"}
            ]
        });
        let out = format_results(&raw);
        let arr = out.as_array().unwrap();
        assert_eq!(arr.len(), 2);
        assert_eq!(arr[0]["title"], "Rust");
        assert!(arr[0].get("score").is_none());
        assert!(arr[1]["content"].is_null());
        assert_eq!(format_results(&json!({})), json!([]));
    }

    #[test]
    fn api_error_detail_prefers_detail_error() {
        let s = api_error_detail(
            reqwest::StatusCode::UNAUTHORIZED,
            r#"{"detail": {"error": "Unauthorized: missing or invalid API key."}}"#,
        );
        assert!(s.contains("Unauthorized: missing or invalid API key."), "{}", s);
        let s = api_error_detail(reqwest::StatusCode::BAD_GATEWAY, "upstream down");
        assert!(s.contains("upstream down"), "{}", s);
    }

    /// **Scenario**: Missing query is rejected before any request is made.
    #[tokio::test]
    async fn invalid_args_rejected() {
        let tool = WebSearchTool::new("k").with_base_url("http://127.0.0.1:9");
        let err = tool.call(json!({"num_results": 2})).await.unwrap_err();
        assert!(matches!(err, ToolSourceError::InvalidInput(_)));
    }
}
