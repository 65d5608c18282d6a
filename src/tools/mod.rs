// ABOUTME: Built-in tools a planned crew can use.
// ABOUTME: Web and news search, internal documents, calculator and slide generation.

use std::sync::Arc;

mod calculator;
mod documents;
mod serper;
mod slides;

pub use calculator::{CalculatorTool, evaluate, format_number};
pub use documents::InternalDocumentsTool;
pub use serper::{SearchResult, SerperEndpoint, SerperSearchTool};
pub use slides::{GenerateSlidesTool, MarkdownDeckRenderer, Slide, SlideDeck, SlideRenderer};

use crate::config::ToolsConfig;
use crate::tool::{Registry, ToolKind};

/// A registry with every built-in tool registered under its kind.
pub fn standard_registry(config: &ToolsConfig) -> Registry {
    Registry::builder()
        .register(
            ToolKind::SearchInternet,
            SerperSearchTool::new(SerperEndpoint::Search, config),
        )
        .register(
            ToolKind::SearchNews,
            SerperSearchTool::new(SerperEndpoint::News, config),
        )
        .register(
            ToolKind::SearchInternalDocuments,
            InternalDocumentsTool::new(config),
        )
        .register(ToolKind::Calculate, CalculatorTool)
        .register(
            ToolKind::GenerateSlides,
            GenerateSlidesTool::new(Arc::new(MarkdownDeckRenderer::new(
                config.output_dir.clone(),
            ))),
        )
        .build()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_standard_registry_covers_every_kind() {
        let registry = standard_registry(&ToolsConfig::default());
        for kind in ToolKind::iter() {
            assert!(registry.get(kind).is_some(), "missing {}", kind);
        }
    }

    #[test]
    fn test_llm_names_are_unique_and_valid() {
        let registry = standard_registry(&ToolsConfig::default());
        let names: Vec<_> = registry.to_definitions().into_iter().map(|d| d.name).collect();
        let unique: HashSet<_> = names.iter().collect();
        assert_eq!(unique.len(), names.len());
        for name in &names {
            assert!(
                name.chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'),
                "{name}"
            );
        }
    }
}
