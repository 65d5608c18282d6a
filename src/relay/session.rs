// ABOUTME: Session - one client connection's lifetime and its mission state machine.
// ABOUTME: Runs one mission at a time, queues the rest, applies the disconnect policy.

use std::collections::VecDeque;
use std::sync::Arc;

use futures::{Stream, StreamExt};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::pipeline::{Pipeline, Stage};
use crate::config::DisconnectPolicy;
use crate::crew::ExecutionContext;
use crate::hook::EventSink;

/// Where a session currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    AwaitingMessage,
    Planning,
    Compiling,
    Executing,
    Closed,
}

impl From<Stage> for SessionState {
    fn from(stage: Stage) -> Self {
        match stage {
            Stage::Planning => SessionState::Planning,
            Stage::Compiling => SessionState::Compiling,
            Stage::Executing => SessionState::Executing,
        }
    }
}

pub struct Session {
    id: String,
    pipeline: Arc<Pipeline>,
    on_disconnect: DisconnectPolicy,
    shutdown: CancellationToken,
    state: watch::Sender<SessionState>,
}

impl Session {
    pub fn new(pipeline: Arc<Pipeline>) -> Self {
        let (state, _) = watch::channel(SessionState::AwaitingMessage);
        Self {
            id: Uuid::new_v4().to_string(),
            pipeline,
            on_disconnect: DisconnectPolicy::default(),
            shutdown: CancellationToken::new(),
            state,
        }
    }

    pub fn on_disconnect(mut self, policy: DisconnectPolicy) -> Self {
        self.on_disconnect = policy;
        self
    }

    /// Missions run under child tokens of `token`; cancelling it ends the session.
    pub fn shutdown(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> SessionState {
        *self.state.borrow()
    }

    /// Drive the session until the inbound stream ends or shutdown is requested.
    ///
    /// Each inbound item is one mission. Progress and results go to `sink`.
    pub async fn run<S>(self, mut inbound: S, sink: Arc<dyn EventSink>)
    where
        S: Stream<Item = String> + Unpin + Send,
    {
        tracing::info!(session = %self.id, "session opened");
        let mut backlog: VecDeque<String> = VecDeque::new();
        let mut open = true;

        loop {
            let mission = match backlog.pop_front() {
                Some(mission) => mission,
                None if !open => break,
                None => {
                    tokio::select! {
                        _ = self.shutdown.cancelled() => break,
                        next = inbound.next() => match next {
                            Some(text) => text,
                            None => break,
                        },
                    }
                }
            };

            if mission.trim().is_empty() {
                tracing::debug!(session = %self.id, "ignoring blank mission");
                continue;
            }

            let token = self.shutdown.child_token();
            let ctx = ExecutionContext::new(self.id.clone())
                .with_sink(sink.clone())
                .with_cancellation(token.clone());

            let state = &self.state;
            let mission_run = self.pipeline.run_with(mission.trim(), &ctx, |stage| {
                state.send_replace(stage.into());
            });
            tokio::pin!(mission_run);

            loop {
                tokio::select! {
                    result = &mut mission_run => {
                        if !open && result.is_ok() {
                            tracing::debug!(session = %self.id, "client gone, result discarded");
                        }
                        break;
                    }
                    next = inbound.next(), if open => match next {
                        Some(text) => backlog.push_back(text),
                        None => {
                            open = false;
                            tracing::debug!(session = %self.id, policy = %self.on_disconnect, "client disconnected mid-mission");
                            if self.on_disconnect == DisconnectPolicy::Cancel {
                                token.cancel();
                            }
                        }
                    },
                }
            }

            self.state.send_replace(SessionState::AwaitingMessage);
            if !open {
                break;
            }
        }

        self.state.send_replace(SessionState::Closed);
        tracing::info!(session = %self.id, dropped = backlog.len(), "session closed");
    }
}
