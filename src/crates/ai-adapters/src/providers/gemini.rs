//! Google Gemini streaming client

use crate::stream_handler::handle_gemini_stream;
use crate::types::gemini::extract_api_error_message;
use crate::{CompletionProvider, TextStream};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use log::{debug, error};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde_json::{json, Value};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub base_url: String,
    pub connect_timeout: Duration,
    /// Longest silence tolerated between two SSE events.
    pub idle_timeout: Duration,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn stream_url(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{}:streamGenerateContent?alt=sse",
            self.base_url.trim_end_matches('/'),
            model
        )
    }
}

pub struct GeminiClient {
    config: GeminiConfig,
    http: reqwest::Client,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("paddockpal/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| anyhow!("Failed to build HTTP client: {}", e))?;
        Ok(Self { config, http })
    }
}

#[async_trait]
impl CompletionProvider for GeminiClient {
    async fn stream_completion(&self, model: &str, prompt: &str) -> Result<TextStream> {
        let url = self.config.stream_url(model);
        debug!("Gemini request: model={}, prompt_len={}", model, prompt.len());

        let body = json!({
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }]
        });
        let response = self
            .http
            .post(&url)
            .header(API_KEY_HEADER, &self.config.api_key)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "text/event-stream")
            .json(&body)
            .send()
            .await
            .map_err(|e| anyhow!("Gemini request failed: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<Value>(&text)
                .ok()
                .and_then(|value| extract_api_error_message(&value))
                .unwrap_or(text);
            error!("Gemini API error: status={}, message={}", status, message);
            return Err(anyhow!("Gemini API error ({}): {}", status.as_u16(), message));
        }

        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(handle_gemini_stream(response, tx, self.config.idle_timeout));
        Ok(Box::pin(UnboundedReceiverStream::new(rx)))
    }
}
