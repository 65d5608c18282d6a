// ABOUTME: Relay module - missions in, progress and results out.
// ABOUTME: Pipeline (plan, compile, execute), per-connection Session and the WebSocket server.

mod pipeline;
mod server;
mod session;

pub use pipeline::{Pipeline, Stage};
pub use server::{ChannelSink, RelayServer};
pub use session::{Session, SessionState};
