// ABOUTME: RelayServer - accepts WebSocket connections and runs one Session per client.
// ABOUTME: Each connection gets a bounded outbound queue drained by its own writer task.

use std::net::SocketAddr;
use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::{SinkExt, StreamExt, future};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use super::pipeline::Pipeline;
use super::session::Session;
use crate::config::{DisconnectPolicy, RelayConfig};
use crate::hook::EventSink;

/// EventSink backed by a connection's outbound queue.
pub struct ChannelSink {
    tx: mpsc::Sender<String>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::Sender<String>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl EventSink for ChannelSink {
    async fn emit(&self, message: String) {
        if self.tx.send(message).await.is_err() {
            tracing::debug!("connection closed, dropping event");
        }
    }
}

pub struct RelayServer {
    pipeline: Arc<Pipeline>,
    on_disconnect: DisconnectPolicy,
    outbound_buffer: usize,
}

impl RelayServer {
    pub fn new(pipeline: Arc<Pipeline>) -> Self {
        Self {
            pipeline,
            on_disconnect: DisconnectPolicy::default(),
            outbound_buffer: 256,
        }
    }

    pub fn from_config(pipeline: Arc<Pipeline>, config: &RelayConfig) -> Self {
        Self::new(pipeline)
            .on_disconnect(config.on_disconnect)
            .outbound_buffer(config.outbound_buffer)
    }

    pub fn on_disconnect(mut self, policy: DisconnectPolicy) -> Self {
        self.on_disconnect = policy;
        self
    }

    pub fn outbound_buffer(mut self, capacity: usize) -> Self {
        self.outbound_buffer = capacity.max(1);
        self
    }

    /// Accept connections until `shutdown` is cancelled, then wait for
    /// every session to wind down.
    pub async fn serve(&self, listener: TcpListener, shutdown: CancellationToken) -> std::io::Result<()> {
        let tracker = TaskTracker::new();
        tracing::info!(addr = %listener.local_addr()?, "relay listening");

        loop {
            let (stream, peer) = tokio::select! {
                _ = shutdown.cancelled() => break,
                accepted = listener.accept() => match accepted {
                    Ok(conn) => conn,
                    Err(e) => {
                        tracing::warn!(error = %e, "accept failed");
                        continue;
                    }
                },
            };

            let session = Session::new(self.pipeline.clone())
                .on_disconnect(self.on_disconnect)
                .shutdown(shutdown.child_token());
            tracker.spawn(handle_connection(stream, peer, session, self.outbound_buffer));
        }

        tracker.close();
        tracker.wait().await;
        tracing::info!("relay stopped");
        Ok(())
    }
}

async fn handle_connection(stream: TcpStream, peer: SocketAddr, session: Session, buffer: usize) {
    let ws = match tokio_tungstenite::accept_async(stream).await {
        Ok(ws) => ws,
        Err(e) => {
            tracing::debug!(%peer, error = %e, "websocket handshake failed");
            return;
        }
    };
    tracing::info!(%peer, session = session.id(), "client connected");

    let (mut write, read) = ws.split();
    let (tx, mut rx) = mpsc::channel::<String>(buffer);

    let writer = tokio::spawn(async move {
        while let Some(line) = rx.recv().await {
            if let Err(e) = write.send(Message::Text(line.into())).await {
                tracing::debug!(error = %e, "websocket write failed");
                return;
            }
        }
        let _ = write.close().await;
    });

    session.run(inbound_missions(read), Arc::new(ChannelSink::new(tx))).await;

    if let Err(e) = writer.await {
        tracing::debug!(%peer, error = %e, "writer task failed");
    }
    tracing::info!(%peer, "client disconnected");
}

/// Text frames as missions; ends at a close frame or transport error.
fn inbound_missions<S>(read: S) -> BoxStream<'static, String>
where
    S: futures::Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>>
        + Send
        + 'static,
{
    read.take_while(|frame| {
        let keep = match frame {
            Ok(Message::Close(_)) => false,
            Ok(_) => true,
            Err(e) => {
                tracing::debug!(error = %e, "websocket read failed");
                false
            }
        };
        future::ready(keep)
    })
    .filter_map(|frame| {
        future::ready(match frame {
            Ok(Message::Text(text)) => Some(text.as_str().to_owned()),
            _ => None,
        })
    })
    .boxed()
}
