// ABOUTME: SerperSearchTool - web and news search through the Serper API.
// ABOUTME: Formats the top results as Title/Link/Snippet blocks for the agent.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::ToolsConfig;
use crate::tool::{Tool, ToolResult};

const SEPARATOR: &str = "\n-----------------";

/// Which Serper collection to query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerperEndpoint {
    /// Organic web results (`/search`).
    Search,
    /// News articles (`/news`).
    News,
}

impl SerperEndpoint {
    fn path(self) -> &'static str {
        match self {
            Self::Search => "search",
            Self::News => "news",
        }
    }
}

/// A single search hit. Serper omits fields freely, so all are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResult {
    pub title: Option<String>,
    pub link: Option<String>,
    pub snippet: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct SerperResponse {
    #[serde(default)]
    organic: Vec<SearchResult>,
    #[serde(default)]
    news: Vec<SearchResult>,
}

/// Tool for searching the internet or news via Serper.
pub struct SerperSearchTool {
    endpoint: SerperEndpoint,
    api_key: Option<String>,
    base_url: String,
    top_results: usize,
    client: reqwest::Client,
}

impl SerperSearchTool {
    pub fn new(endpoint: SerperEndpoint, config: &ToolsConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();
        Self {
            endpoint,
            api_key: config.serper_api_key.clone(),
            base_url: config.serper_base_url.trim_end_matches('/').to_string(),
            top_results: config.search_results,
            client,
        }
    }

    /// Format the first `top` hits; hits missing a field are skipped.
    fn format_results(results: &[SearchResult], top: usize) -> String {
        results
            .iter()
            .take(top)
            .filter_map(|r| {
                let (title, link, snippet) = (r.title.as_ref()?, r.link.as_ref()?, r.snippet.as_ref()?);
                Some(format!(
                    "Title: {title}\nLink: {link}\nSnippet: {snippet}\n{SEPARATOR}"
                ))
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[async_trait]
impl Tool for SerperSearchTool {
    fn name(&self) -> &str {
        match self.endpoint {
            SerperEndpoint::Search => "search_internet",
            SerperEndpoint::News => "search_news",
        }
    }

    fn description(&self) -> &str {
        match self.endpoint {
            SerperEndpoint::Search => {
                "Useful to search the internet about a given topic and return relevant results"
            }
            SerperEndpoint::News => {
                "Useful to search news about a company, stock or any other topic and return relevant results"
            }
        }
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
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

    async fn execute(&self, params: serde_json::Value) -> Result<ToolResult, anyhow::Error> {
        #[derive(Deserialize)]
        struct Params {
            query: String,
        }
        let params: Params = serde_json::from_value(params)?;

        let Some(api_key) = self.api_key.as_deref() else {
            return Ok(ToolResult::error("Search is unavailable: SERPER_API_KEY is not set"));
        };

        let url = format!("{}/{}", self.base_url, self.endpoint.path());
        let response = match self
            .client
            .post(&url)
            .header("X-API-KEY", api_key)
            .json(&serde_json::json!({ "q": params.query }))
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => return Ok(ToolResult::error(format!("Search failed: {}", e))),
        };

        if !response.status().is_success() {
            return Ok(ToolResult::error(format!(
                "Search failed with status: {}",
                response.status()
            )));
        }

        let body: SerperResponse = match response.json().await {
            Ok(body) => body,
            Err(e) => return Ok(ToolResult::error(format!("Failed to read response: {}", e))),
        };

        let hits = match self.endpoint {
            SerperEndpoint::Search => &body.organic,
            SerperEndpoint::News => &body.news,
        };
        let output = Self::format_results(hits, self.top_results);
        if output.is_empty() {
            return Ok(ToolResult::text("No results found."));
        }
        Ok(ToolResult::text(output))
    }
}
