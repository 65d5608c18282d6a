// ABOUTME: Defines the LlmClient trait - the seam between the pipeline and
// ABOUTME: whichever model provider plans missions and drives agents.

use async_trait::async_trait;

use super::{Request, Response};
use crate::error::LlmError;

/// Trait for LLM client implementations.
///
/// Clients are shared by every session, so implementations must not keep
/// per-conversation state.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Create a message (non-streaming).
    async fn create_message(&self, req: &Request) -> Result<Response, LlmError>;
}
