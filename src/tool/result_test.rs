// ABOUTME: Tests for ToolResult - constructors, metadata, defaults.
// ABOUTME: Verifies result structure works correctly.

use super::*;

#[test]
fn test_error_result() {
    let result = ToolResult::error("Search failed with status: 403");
    assert_eq!(result.content, "Search failed with status: 403");
    assert!(result.is_error);
}

#[test]
fn test_with_metadata() {
    let result = ToolResult::text("output/deck.md")
        .with_metadata("path", "output/deck.md")
        .with_metadata("slides", 3);

    assert!(!result.is_error);
    assert_eq!(result.metadata["path"], "output/deck.md");
    assert_eq!(result.metadata["slides"], 3);
}

#[test]
fn test_default() {
    let result = ToolResult::default();
    assert_eq!(result.content, "");
    assert!(!result.is_error);
    assert!(result.metadata.is_empty());
}
