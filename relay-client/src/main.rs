// ABOUTME: Interactive relay client - sends missions and prints everything the relay streams back.
// ABOUTME: Reads lines with rustyline on a blocking thread while frames print as they arrive.

use anyhow::{Context, Result};
use clap::Parser;
use futures::{SinkExt, StreamExt};
use rustyline::DefaultEditor;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;

/// Send missions to a crew relay and watch the agents work.
#[derive(Parser, Debug)]
#[command(name = "relay-client", version, about, long_about = None)]
struct Args {
    /// Relay WebSocket URL
    #[arg(long, env = "CREW_RELAY_URL", default_value = "ws://127.0.0.1:6789")]
    url: String,

    /// Send a single mission, print the stream, and keep listening
    #[arg(short, long)]
    mission: Option<String>,
}

/// Read lines until EOF, quit or exit.
fn read_missions(tx: mpsc::UnboundedSender<String>) -> Result<()> {
    let mut rl = DefaultEditor::new()?;
    loop {
        let line = match rl.readline("> ") {
            Ok(line) => line,
            Err(_) => break,
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "quit" || line == "exit" {
            break;
        }

        let _ = rl.add_history_entry(line);
        if tx.send(line.to_string()).is_err() {
            break;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();
    let args = Args::parse();

    let (ws, _) = tokio_tungstenite::connect_async(&args.url)
        .await
        .with_context(|| format!("connect to {}", args.url))?;
    let (mut write, mut read) = ws.split();
    println!("Connected to {}. Type a mission, or 'quit' to exit.\n", args.url);

    let (tx, mut missions) = mpsc::unbounded_channel::<String>();
    if let Some(mission) = args.mission {
        let _ = tx.send(mission);
    }
    let input = tokio::task::spawn_blocking(move || read_missions(tx));

    loop {
        tokio::select! {
            mission = missions.recv() => match mission {
                Some(mission) => write.send(Message::Text(mission.into())).await?,
                None => break,
            },
            frame = read.next() => match frame {
                Some(Ok(Message::Text(text))) => println!("{}\n", text.as_str()),
                Some(Ok(Message::Close(_))) | None => {
                    println!("[relay closed the connection]");
                    break;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e).context("read from relay"),
            },
        }
    }

    let _ = write.close().await;
    if input.is_finished() {
        return input.await?;
    }
    // A blocked readline cannot be interrupted, and the runtime would wait for it.
    std::process::exit(0);
}
