//! Client configuration
//!
//! Loaded once at startup and passed explicitly to the relay client and the
//! chat session.

use paddock_core_types::DEFAULT_MODEL;
use std::time::Duration;

pub const DEFAULT_RELAY_URL: &str = "http://127.0.0.1:8080";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the relay; `/api/generate` is appended.
    pub relay_url: String,
    /// Full target-model identifier sent with every turn.
    pub model: String,
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            relay_url: DEFAULT_RELAY_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            connect_timeout: Duration::from_secs(30),
        }
    }
}

impl ClientConfig {
    /// Read `PADDOCK_RELAY_URL`, `PADDOCK_MODEL` and `PADDOCK_TIMEOUT_SECS`,
    /// falling back to defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            relay_url: non_empty_env("PADDOCK_RELAY_URL").unwrap_or(defaults.relay_url),
            model: non_empty_env("PADDOCK_MODEL").unwrap_or(defaults.model),
            connect_timeout: non_empty_env("PADDOCK_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.connect_timeout),
        }
    }

    pub fn generate_endpoint(&self) -> String {
        format!("{}/api/generate", self.relay_url.trim_end_matches('/'))
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
