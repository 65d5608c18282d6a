// ABOUTME: Tests for the tool Registry - registration, resolution, definitions.
// ABOUTME: Uses a mock tool standing in for the calculator.

use super::*;
use crate::error::ToolError;

/// A simple test tool.
struct EchoTool;

#[async_trait::async_trait]
impl Tool for EchoTool {
    fn name(&self) -> &str {
        "echo"
    }

    fn description(&self) -> &str {
        "Echoes input back"
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "message": { "type": "string" }
            },
            "required": ["message"]
        })
    }

    async fn execute(&self, params: serde_json::Value) -> Result<ToolResult, anyhow::Error> {
        let message = params["message"].as_str().unwrap_or("");
        Ok(ToolResult::text(message))
    }
}

#[test]
fn test_register_and_get() {
    let registry = Registry::builder()
        .register(ToolKind::Calculate, EchoTool)
        .build();

    let tool = registry.get(ToolKind::Calculate);
    assert!(tool.is_some());
    assert_eq!(tool.unwrap().name(), "echo");
    assert!(registry.get(ToolKind::SearchNews).is_none());
}

#[test]
fn test_resolve_known_identifier() {
    let registry = Registry::builder()
        .register(ToolKind::Calculate, EchoTool)
        .build();

    let (kind, tool) = registry.resolve("CalculatorTools.calculate").unwrap();
    assert_eq!(kind, ToolKind::Calculate);
    assert_eq!(tool.name(), "echo");
}

#[test]
fn test_resolve_unknown_identifier() {
    let registry = Registry::builder()
        .register(ToolKind::Calculate, EchoTool)
        .build();

    match registry.resolve("MagicTools.read_minds") {
        Err(ToolError::Unknown(id)) => assert_eq!(id, "MagicTools.read_minds"),
        other => panic!("expected Unknown, got {:?}", other.map(|(k, _)| k)),
    }
}

#[test]
fn test_resolve_known_kind_without_implementation() {
    let registry = Registry::builder()
        .register(ToolKind::Calculate, EchoTool)
        .build();

    assert!(matches!(
        registry.resolve("SearchTools.search_internet"),
        Err(ToolError::Unknown(_))
    ));
}

#[test]
fn test_identifiers_are_sorted_by_kind() {
    let registry = Registry::builder()
        .register(ToolKind::Calculate, EchoTool)
        .register(ToolKind::SearchInternet, EchoTool)
        .build();

    assert_eq!(
        registry.identifiers(),
        vec!["SearchTools.search_internet", "CalculatorTools.calculate"]
    );
    assert_eq!(registry.count(), 2);
}

#[test]
fn test_to_definitions() {
    let registry = Registry::builder()
        .register(ToolKind::Calculate, EchoTool)
        .build();

    let defs = registry.to_definitions();
    assert_eq!(defs.len(), 1);
    assert_eq!(defs[0].name, "echo");
    assert_eq!(defs[0].description, "Echoes input back");
}

#[test]
fn test_clone_shares_tools() {
    let registry = Registry::builder()
        .register(ToolKind::Calculate, EchoTool)
        .build();
    let clone = registry.clone();

    let a = registry.get(ToolKind::Calculate).unwrap();
    let b = clone.get(ToolKind::Calculate).unwrap();
    assert!(std::sync::Arc::ptr_eq(&a, &b));
}
