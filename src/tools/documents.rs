// ABOUTME: InternalDocumentsTool - retrieval over the internal document index.
// ABOUTME: POSTs the query to a retrieval service and formats each matching node.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::ToolsConfig;
use crate::tool::{Tool, ToolResult};

/// One retrieved chunk as returned by the retrieval service.
#[derive(Debug, Deserialize)]
struct RetrievedItem {
    node: RetrievedNode,
}

#[derive(Debug, Deserialize)]
struct RetrievedNode {
    #[serde(default)]
    text: String,
    #[serde(default)]
    metadata: BTreeMap<String, serde_json::Value>,
}

/// Tool for searching internal documents.
pub struct InternalDocumentsTool {
    url: String,
    client: reqwest::Client,
}

impl InternalDocumentsTool {
    pub fn new(config: &ToolsConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .unwrap_or_default();
        Self {
            url: config.documents_url.clone(),
            client,
        }
    }

    fn format_items(items: &[RetrievedItem]) -> String {
        items
            .iter()
            .map(|item| {
                let metadata = item
                    .node
                    .metadata
                    .iter()
                    .map(|(key, value)| match value {
                        serde_json::Value::String(s) => format!("{key}: {s}"),
                        other => format!("{key}: {other}"),
                    })
                    .collect::<Vec<_>>()
                    .join("\n");
                [
                    metadata.as_str(),
                    "Content:",
                    item.node.text.as_str(),
                    "\n-----------------",
                ]
                .join("\n")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[async_trait]
impl Tool for InternalDocumentsTool {
    fn name(&self) -> &str {
        "search_internal_documents"
    }

    fn description(&self) -> &str {
        "Useful to search internal documents based on a given query and return relevant results"
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "What to look for in the internal documents"
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

        let response = match self
            .client
            .post(&self.url)
            .json(&serde_json::json!({ "query": params.query }))
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => return Ok(ToolResult::error(format!("Document search failed: {}", e))),
        };

        if !response.status().is_success() {
            return Ok(ToolResult::error(format!(
                "Document search failed with status: {}",
                response.status()
            )));
        }

        let items: Vec<RetrievedItem> = match response.json().await {
            Ok(items) => items,
            Err(e) => return Ok(ToolResult::error(format!("Failed to read response: {}", e))),
        };

        if items.is_empty() {
            return Ok(ToolResult::text("No matching documents found."));
        }
        Ok(ToolResult::text(Self::format_items(&items)).with_metadata("hits", items.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_items() {
        let items: Vec<RetrievedItem> = serde_json::from_str(
            r#"[{"node": {"text": "Q3 revenue grew 12%.", "metadata": {"file_name": "q3.pdf", "page": 4}}}]"#,
        )
        .unwrap();

        let text = InternalDocumentsTool::format_items(&items);
        assert_eq!(
            text,
            "file_name: q3.pdf\npage: 4\nContent:\nQ3 revenue grew 12%.\n\n-----------------"
        );
    }

    #[test]
    fn test_node_without_metadata() {
        let items: Vec<RetrievedItem> =
            serde_json::from_str(r#"[{"node": {"text": "plain"}}]"#).unwrap();
        let text = InternalDocumentsTool::format_items(&items);
        assert!(text.starts_with("\nContent:\nplain"));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_tool_error() {
        let config = ToolsConfig {
            documents_url: "http://127.0.0.1:9/retrieve".to_string(),
            ..ToolsConfig::default()
        };
        let tool = InternalDocumentsTool::new(&config);
        let result = tool
            .execute(serde_json::json!({"query": "pricing"}))
            .await
            .unwrap();
        assert!(result.is_error);
    }
}
