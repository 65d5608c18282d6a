// ABOUTME: Event sinks - destinations for human-readable progress lines.
// ABOUTME: SinkHook adapts any sink into a Hook; MemorySink collects lines in memory.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{Hook, HookEvent};

/// Somewhere progress lines can be pushed, such as a WebSocket connection.
///
/// Emitting never fails from the caller's point of view; a sink whose
/// transport is gone drops the line.
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn emit(&self, message: String);
}

/// Forwards every describable event to a sink.
pub struct SinkHook {
    sink: Arc<dyn EventSink>,
}

impl SinkHook {
    pub fn new(sink: Arc<dyn EventSink>) -> Self {
        Self { sink }
    }
}

#[async_trait]
impl Hook for SinkHook {
    fn accepts(&self, event: &HookEvent) -> bool {
        !matches!(event, HookEvent::TaskEnd { .. })
    }

    async fn on_event(&self, event: &HookEvent) -> Result<(), anyhow::Error> {
        if let Some(line) = event.describe() {
            self.sink.emit(line).await;
        }
        Ok(())
    }
}

/// In-memory sink.
#[derive(Clone, Default)]
pub struct MemorySink {
    messages: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn messages(&self) -> Vec<String> {
        self.messages.lock().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.messages.lock().await.len()
    }
}

#[async_trait]
impl EventSink for MemorySink {
    async fn emit(&self, message: String) {
        self.messages.lock().await.push(message);
    }
}
