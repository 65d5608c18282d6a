// ABOUTME: Slide generation - a SlideRenderer collaborator and the tool that drives it.
// ABOUTME: The default renderer writes a Marp-flavoured Markdown deck per call.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::tool::{Tool, ToolResult};

/// One slide of a deck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slide {
    #[serde(default)]
    pub header: String,
    #[serde(default)]
    pub content: String,
}

/// An ordered presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideDeck {
    pub slides: Vec<Slide>,
}

impl SlideDeck {
    /// Accept either a deck object or a JSON string containing one.
    pub fn from_value(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        match value {
            serde_json::Value::String(raw) => serde_json::from_str(&raw),
            other => serde_json::from_value(other),
        }
    }
}

/// Turns a deck into a file and returns where it was written.
#[async_trait]
pub trait SlideRenderer: Send + Sync {
    async fn render(&self, deck: &SlideDeck) -> Result<PathBuf, anyhow::Error>;
}

/// Writes `<output_dir>/<uuid>.md` with one `---`-separated section per slide.
pub struct MarkdownDeckRenderer {
    output_dir: PathBuf,
}

impl MarkdownDeckRenderer {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn to_markdown(deck: &SlideDeck) -> String {
        let mut out = String::from("---\nmarp: true\npaginate: true\n---\n");
        for (i, slide) in deck.slides.iter().enumerate() {
            if i > 0 {
                out.push_str("\n---\n");
            }
            if !slide.header.is_empty() {
                out.push_str(&format!("\n# {}\n", slide.header.trim()));
            }
            if !slide.content.is_empty() {
                out.push_str(&format!("\n{}\n", slide.content.trim()));
            }
        }
        out
    }
}

#[async_trait]
impl SlideRenderer for MarkdownDeckRenderer {
    async fn render(&self, deck: &SlideDeck) -> Result<PathBuf, anyhow::Error> {
        tokio::fs::create_dir_all(&self.output_dir).await?;
        let path = self.output_dir.join(format!("{}.md", Uuid::new_v4()));
        tokio::fs::write(&path, Self::to_markdown(deck)).await?;
        Ok(path)
    }
}

/// Tool that renders a slide deck and returns the generated file path.
///
/// The path is the agent's final answer.
pub struct GenerateSlidesTool {
    renderer: Arc<dyn SlideRenderer>,
}

impl GenerateSlidesTool {
    pub fn new(renderer: Arc<dyn SlideRenderer>) -> Self {
        Self { renderer }
    }
}

#[async_trait]
impl Tool for GenerateSlidesTool {
    fn name(&self) -> &str {
        "slide_generator"
    }

    fn description(&self) -> &str {
        "Generates a presentation file from slides given as JSON: \
         {\"slides\":[{\"header\":\"header of the slide\",\"content\":\"content of the slide\"}]}. \
         Returns the path of the generated file."
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "slides": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "header": { "type": "string" },
                            "content": { "type": "string" }
                        },
                        "required": ["header", "content"]
                    }
                }
            },
            "required": ["slides"]
        })
    }

    fn returns_direct(&self) -> bool {
        true
    }

    async fn execute(&self, params: serde_json::Value) -> Result<ToolResult, anyhow::Error> {
        // Accept {"slides": [...]}, {"slides": "<json>"} or a bare JSON string.
        let deck = match params {
            serde_json::Value::Object(mut map) => match map.remove("slides") {
                Some(serde_json::Value::Array(slides)) => {
                    SlideDeck::from_value(serde_json::json!({ "slides": slides }))
                }
                Some(inner) => SlideDeck::from_value(inner),
                None => SlideDeck::from_value(serde_json::Value::Object(map)),
            },
            other => SlideDeck::from_value(other),
        };

        let deck = match deck {
            Ok(deck) if !deck.slides.is_empty() => deck,
            Ok(_) => return Ok(ToolResult::error("No slides to generate")),
            Err(e) => return Ok(ToolResult::error(format!("Invalid slides JSON: {}", e))),
        };

        let path = self.renderer.render(&deck).await?;
        let shown = path.display().to_string();
        Ok(ToolResult::text(shown.clone())
            .with_metadata("path", shown)
            .with_metadata("slides", deck.slides.len()))
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn tool_in(dir: &TempDir) -> GenerateSlidesTool {
        GenerateSlidesTool::new(Arc::new(MarkdownDeckRenderer::new(dir.path())))
    }

    #[test]
    fn test_markdown_layout() {
        let deck = SlideDeck {
            slides: vec![
                Slide {
                    header: "Cloud native".into(),
                    content: "What it is".into(),
                },
                Slide {
                    header: "Questions".into(),
                    content: String::new(),
                },
            ],
        };
        let md = MarkdownDeckRenderer::to_markdown(&deck);
        assert!(md.starts_with("---\nmarp: true"));
        assert!(md.contains("# Cloud native\n\nWhat it is\n"));
        assert!(md.contains("\n---\n\n# Questions\n"));
    }

    #[tokio::test]
    async fn test_generate_from_object() {
        let dir = TempDir::new().unwrap();
        let tool = tool_in(&dir);
        assert!(tool.returns_direct());

        let result = tool
            .execute(serde_json::json!({
                "slides": [{"header": "Intro", "content": "Hello"}]
            }))
            .await
            .unwrap();

        assert!(!result.is_error);
        let path = PathBuf::from(&result.content);
        assert!(path.starts_with(dir.path()));
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("# Intro"));
        assert_eq!(result.metadata["slides"], 1);
    }

    #[tokio::test]
    async fn test_generate_from_json_string() {
        let dir = TempDir::new().unwrap();
        let tool = tool_in(&dir);

        let raw = r#"{"slides":[{"header":"A","content":"a"},{"header":"B","content":"b"}]}"#;
        let result = tool
            .execute(serde_json::json!({ "slides": raw }))
            .await
            .unwrap();
        assert!(!result.is_error);
        assert_eq!(result.metadata["slides"], 2);

        let result = tool.execute(serde_json::json!(raw)).await.unwrap();
        assert!(!result.is_error);
    }

    #[tokio::test]
    async fn test_invalid_and_empty_decks() {
        let dir = TempDir::new().unwrap();
        let tool = tool_in(&dir);

        let result = tool
            .execute(serde_json::json!({ "slides": "not json" }))
            .await
            .unwrap();
        assert!(result.is_error);

        let result = tool
            .execute(serde_json::json!({ "slides": [] }))
            .await
            .unwrap();
        assert!(result.is_error);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
