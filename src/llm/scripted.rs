// ABOUTME: ScriptedClient - an LlmClient driven by a closure instead of a model.
// ABOUTME: Lets planners, agents and whole sessions run deterministically offline.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::{LlmClient, Request, Response};
use crate::error::LlmError;

type Script = dyn Fn(&Request) -> Result<Response, LlmError> + Send + Sync;

/// An [`LlmClient`] whose replies are computed from the request.
///
/// Replies must be derived from the request contents rather than call order
/// when the client is shared by concurrent sessions.
#[derive(Clone)]
pub struct ScriptedClient {
    script: Arc<Script>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedClient {
    pub fn new<F>(script: F) -> Self
    where
        F: Fn(&Request) -> Result<Response, LlmError> + Send + Sync + 'static,
    {
        Self {
            script: Arc::new(script),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A client that always answers with the same text.
    pub fn always(text: impl Into<String>) -> Self {
        let text = text.into();
        Self::new(move |_| Ok(Response::text_reply(text.clone())))
    }

    /// Number of requests served so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmClient for ScriptedClient {
    async fn create_message(&self, req: &Request) -> Result<Response, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        // Yield so concurrent sessions interleave the way real network calls do.
        tokio::task::yield_now().await;
        (self.script)(req)
    }
}
