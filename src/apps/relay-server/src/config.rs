//! Relay configuration
//!
//! Read once at startup and injected into [`AppState`](crate::state::AppState).

use anyhow::{anyhow, Result};
use paddock_ai_adapters::providers::gemini::DEFAULT_GEMINI_BASE_URL;
use paddock_core_types::DEFAULT_MODEL;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub host: String,
    pub port: u16,
    /// Provider credential. Requests are refused with 500 while it is unset.
    pub api_key: Option<String>,
    pub default_model: String,
    pub gemini_base_url: String,
    pub static_dir: PathBuf,
    pub upstream_idle_timeout: Duration,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            api_key: None,
            default_model: DEFAULT_MODEL.to_string(),
            gemini_base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            static_dir: PathBuf::from("web"),
            upstream_idle_timeout: Duration::from_secs(600),
        }
    }
}

impl RelayConfig {
    /// Load from environment variables (call `dotenvy::dotenv()` first to pick up `.env`).
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let port = match env_value("PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|e| anyhow!("Invalid PORT '{}': {}", raw, e))?,
            None => defaults.port,
        };

        Ok(Self {
            host: env_value("PADDOCK_HOST").unwrap_or(defaults.host),
            port,
            api_key: env_value("GOOGLE_API_KEY"),
            default_model: env_value("PADDOCK_DEFAULT_MODEL").unwrap_or(defaults.default_model),
            gemini_base_url: env_value("GEMINI_BASE_URL").unwrap_or(defaults.gemini_base_url),
            static_dir: env_value("PADDOCK_STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),
            upstream_idle_timeout: env_value("PADDOCK_UPSTREAM_IDLE_SECS")
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.upstream_idle_timeout),
        })
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| anyhow!("Invalid bind address {}:{}: {}", self.host, self.port, e))
    }
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
