use anyhow::Result;
use paddock_ai_adapters::{CompletionProvider, GeminiClient, GeminiConfig};
use paddock_relay_server::logging::init_logging;
use paddock_relay_server::{build_router, AppState, RelayConfig};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let dotenv_loaded = dotenvy::dotenv().is_ok();
    init_logging("info");
    if dotenv_loaded {
        info!("Loaded environment from .env");
    }

    let config = RelayConfig::from_env()?;
    let provider: Option<Arc<dyn CompletionProvider>> = match config.api_key.as_deref() {
        Some(api_key) => {
            let mut gemini = GeminiConfig::new(api_key).with_base_url(&config.gemini_base_url);
            gemini.idle_timeout = config.upstream_idle_timeout;
            Some(Arc::new(GeminiClient::new(gemini)?))
        }
        None => {
            warn!("GOOGLE_API_KEY is not set; /api/generate will answer 500 until it is configured");
            None
        }
    };

    let addr = config.bind_addr()?;
    info!(
        "Relay config: default_model={}, static_dir={}",
        config.default_model,
        config.static_dir.display()
    );
    let app = build_router(AppState::new(config, provider));

    let listener = TcpListener::bind(addr).await?;
    info!("PaddockPal relay listening on http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
