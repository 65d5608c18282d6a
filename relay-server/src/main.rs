// ABOUTME: WebSocket relay server - plans and runs a crew for every mission a client sends.
// ABOUTME: Configuration comes from .env and the environment, overridden by flags.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use crewrelay::prelude::*;

/// Turn free-text missions into agent crews and stream their progress.
#[derive(Parser, Debug)]
#[command(name = "relay-server", version, about, long_about = None)]
struct Args {
    /// Address to listen on
    #[arg(long)]
    listen: Option<String>,

    /// Model used to plan crews
    #[arg(long)]
    planner_model: Option<String>,

    /// Model used by the agents
    #[arg(long)]
    agent_model: Option<String>,

    /// Language every task result must be written in
    #[arg(long)]
    language: Option<String>,

    /// Think-act iterations allowed per agent and task
    #[arg(long)]
    max_iterations: Option<usize>,

    /// What to do with a running mission when its client disconnects (cancel, continue)
    #[arg(long)]
    on_disconnect: Option<DisconnectPolicy>,

    /// How to treat agents sharing a name (reject, last-wins)
    #[arg(long)]
    duplicate_agents: Option<DuplicateAgentPolicy>,
}

impl Args {
    fn apply(self, config: &mut RelayConfig) {
        if let Some(v) = self.listen {
            config.listen_addr = v;
        }
        if let Some(v) = self.planner_model {
            config.planner_model = v;
        }
        if let Some(v) = self.agent_model {
            config.agent_model = v;
        }
        if let Some(v) = self.language {
            config.language = v;
        }
        if let Some(v) = self.max_iterations {
            config.max_iterations = v;
        }
        if let Some(v) = self.on_disconnect {
            config.on_disconnect = v;
        }
        if let Some(v) = self.duplicate_agents {
            config.duplicate_agents = v;
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let mut config = RelayConfig::from_env()?;
    args.apply(&mut config);

    if config.tools.serper_api_key.is_none() {
        tracing::warn!("SERPER_API_KEY is not set; web and news search will report errors");
    }

    let client: Arc<dyn LlmClient> = Arc::new(OpenAIClient::from_env()?);
    let registry = standard_registry(&config.tools);
    tracing::info!(tools = ?registry.identifiers(), "tools registered");

    let pipeline = Arc::new(Pipeline::from_config(&config, client, registry));
    let server = RelayServer::from_config(pipeline, &config);

    let listener = TcpListener::bind(&config.listen_addr)
        .await
        .with_context(|| format!("bind {}", config.listen_addr))?;

    let shutdown = CancellationToken::new();
    let on_signal = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("shutting down");
                on_signal.cancel();
            }
            Err(e) => tracing::error!(error = %e, "could not listen for ctrl-c"),
        }
    });

    server.serve(listener, shutdown).await?;
    Ok(())
}
