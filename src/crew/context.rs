// ABOUTME: ExecutionContext - per-mission state passed explicitly through the pipeline.
// ABOUTME: Carries the session id, the mission's hooks and its cancellation token.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::hook::{EventSink, Hook, HookEvent, HookRegistry, SinkHook};

/// Everything a single mission needs to know about where it runs.
///
/// Created by the session for each mission and dropped afterwards. Clones
/// share the same hooks and cancellation token.
#[derive(Clone)]
pub struct ExecutionContext {
    session_id: String,
    hooks: HookRegistry,
    cancel: CancellationToken,
}

impl ExecutionContext {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            hooks: HookRegistry::new(),
            cancel: CancellationToken::new(),
        }
    }

    /// Relay describable events to `sink`.
    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.hooks.register(SinkHook::new(sink));
        self
    }

    pub fn with_hook(mut self, hook: impl Hook + 'static) -> Self {
        self.hooks.register(hook);
        self
    }

    pub fn with_hooks(mut self, hooks: HookRegistry) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn hooks(&self) -> &HookRegistry {
        &self.hooks
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Fire an event to this mission's hooks.
    pub async fn notify(&self, event: HookEvent) {
        self.hooks.fire(&event).await;
    }
}
