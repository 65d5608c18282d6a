// ABOUTME: Defines the Tool trait - a capability an agent can invoke.
// ABOUTME: Tools have an LLM-facing name, description, schema and async execute.

use async_trait::async_trait;

use super::ToolResult;

/// A tool that can be executed by an agent.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Function name offered to the model. Must match `[a-z0-9_-]+`.
    fn name(&self) -> &str;

    /// Human-readable description for the model.
    fn description(&self) -> &str;

    /// JSON Schema of the tool's input parameters.
    fn schema(&self) -> serde_json::Value;

    /// Whether the tool's output is the agent's final answer.
    fn returns_direct(&self) -> bool {
        false
    }

    /// Execute the tool with the given parameters.
    ///
    /// Problems the agent can react to (bad query, remote error) should be
    /// returned as [`ToolResult::error`]; `Err` is for failures of the tool itself.
    async fn execute(&self, params: serde_json::Value) -> Result<ToolResult, anyhow::Error>;
}
