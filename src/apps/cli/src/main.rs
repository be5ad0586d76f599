//! PaddockPal CLI
//!
//! Line-oriented chat against a PaddockPal relay.

mod logging;
mod render;

use anyhow::{Context, Result};
use clap::Parser;
use paddock_core::{ChatSession, ClientConfig, HttpRelayClient, IgnoreReason, SubmitOutcome};
use render::Renderer;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(name = "paddock-cli", version, about = "Chat with the PaddockPal F1 assistant")]
struct Args {
    /// Relay base URL (overrides PADDOCK_RELAY_URL)
    #[arg(long)]
    relay_url: Option<String>,

    /// Target model (overrides PADDOCK_MODEL)
    #[arg(long)]
    model: Option<String>,

    /// Log level written to stderr (overrides PADDOCK_LOG_LEVEL)
    #[arg(long)]
    log_level: Option<String>,
}

const NEW_CHAT_COMMAND: &str = "/new";
const QUIT_COMMAND: &str = "/quit";

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let args = Args::parse();
    logging::init_logging(args.log_level.as_deref());

    let mut config = ClientConfig::from_env();
    if let Some(relay_url) = args.relay_url {
        config.relay_url = relay_url;
    }
    if let Some(model) = args.model {
        config.model = model;
    }
    let client = HttpRelayClient::new(&config).context("Failed to create relay client")?;
    info!("Using relay {} with model {}", client.endpoint(), config.model);

    let (tx, mut rx) = mpsc::unbounded_channel();
    let session = ChatSession::new(client, tx, config.model.clone());

    println!("Type {} for a new chat, {} to exit.", NEW_CHAT_COMMAND, QUIT_COMMAND);

    // The session's initial history is already queued as the first event.
    let mut renderer = Renderer::default();
    let render_task = tokio::spawn(async move {
        let mut stdout = std::io::stdout();
        while let Some(event) = rx.recv().await {
            let output = renderer.render(&event);
            if output.is_empty() {
                continue;
            }
            if write!(stdout, "{}", output).and_then(|_| stdout.flush()).is_err() {
                break;
            }
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            QUIT_COMMAND => break,
            NEW_CHAT_COMMAND => {
                session.start_new_chat();
            }
            input => match session.submit(input).await {
                SubmitOutcome::Ignored(IgnoreReason::EmptyInput) => {}
                SubmitOutcome::Ignored(reason) => debug!("Input ignored: {:?}", reason),
                SubmitOutcome::Committed(_) | SubmitOutcome::Errored(_) => {}
            },
        }
    }

    // Dropping the session closes the event channel and ends the render task.
    drop(session);
    render_task.await.context("Render task failed")?;
    Ok(())
}
