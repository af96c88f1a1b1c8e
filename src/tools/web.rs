//! Web search tool backed by the Tavily API.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::Tool;

const TAVILY_URL: &str = "https://api.tavily.com/search";

/// Search the web via Tavily.
pub struct TavilySearch {
    client: reqwest::Client,
    api_key: String,
    max_results: usize,
    endpoint: String,
}

impl TavilySearch {
    /// Create a search tool capped at `max_results` results per query.
    pub fn new(api_key: impl Into<String>, max_results: usize) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            max_results,
            endpoint: TAVILY_URL.to_string(),
        }
    }

    /// Override the API endpoint (used by tests against a local server).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[derive(Debug, Serialize)]
struct TavilySearchRequest {
    query: String,
    max_results: usize,
    search_depth: String,
    include_raw_content: bool,
}

#[derive(Debug, Deserialize)]
struct TavilySearchResponse {
    #[serde(default)]
    results: Vec<TavilyResult>,
}

#[derive(Debug, Deserialize)]
struct TavilyResult {
    title: String,
    url: String,
    content: String,
}

#[async_trait]
impl Tool for TavilySearch {
    fn name(&self) -> &str {
        "web_search"
    }

    fn description(&self) -> &str {
        "Search the web for information. Returns search results with titles, URLs, and content snippets. Use for finding company facts, recent news, and role requirements."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The search query"
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, args: Value) -> anyhow::Result<String> {
        let query = args["query"]
            .as_str()
            .ok_or_else(|| anyhow::anyhow!("Missing 'query' argument"))?;

        let request = TavilySearchRequest {
            query: query.to_string(),
            max_results: self.max_results,
            search_depth: "basic".to_string(),
            include_raw_content: false,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("Search error ({}): {}", status, body));
        }

        let body: TavilySearchResponse = response.json().await?;
        Ok(format_results(query, &body.results))
    }
}

fn format_results(query: &str, results: &[TavilyResult]) -> String {
    if results.is_empty() {
        return format!("No results found for: {}", query);
    }

    results
        .iter()
        .map(|r| format!("**{}**\n{}\nURL: {}", r.title, r.content, r.url))
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_results_for_the_model() {
        let results = vec![
            TavilyResult {
                title: "Acme Corp - About".to_string(),
                url: "https://acme.example/about".to_string(),
                content: "Acme Corp manufactures anvils.".to_string(),
            },
            TavilyResult {
                title: "Acme in the news".to_string(),
                url: "https://news.example/acme".to_string(),
                content: "Acme opened a new plant.".to_string(),
            },
        ];

        let formatted = format_results("Acme Corp", &results);
        assert!(formatted.contains("**Acme Corp - About**"));
        assert!(formatted.contains("URL: https://news.example/acme"));
    }

    #[test]
    fn empty_results_report_the_query() {
        let formatted = format_results("Acme Corp", &[]);
        assert_eq!(formatted, "No results found for: Acme Corp");
    }

    #[test]
    fn deserializes_tavily_response() {
        let body: TavilySearchResponse = serde_json::from_value(json!({
            "query": "Acme Corp",
            "results": [
                {
                    "title": "Acme Corp",
                    "url": "https://acme.example",
                    "content": "Anvils and more.",
                    "score": 0.97
                }
            ]
        }))
        .expect("deserialize");

        assert_eq!(body.results.len(), 1);
        assert_eq!(body.results[0].title, "Acme Corp");
    }
}
