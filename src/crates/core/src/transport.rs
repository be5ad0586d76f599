//! Relay client
//!
//! One outbound `POST /api/generate` per turn. The response body is handed
//! back unparsed; decoding happens in the chat session.

use crate::config::ClientConfig;
use crate::error::{ChatError, ChatResult};
use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::StreamExt;
use log::{debug, warn};
use paddock_core_types::GenerateRequest;
use reqwest::header::{ACCEPT, CONTENT_TYPE};

/// Raw body chunks of an accepted relay response.
pub type ByteStream = BoxStream<'static, Result<Vec<u8>, ChatError>>;

#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Send `request` and return the streamed body once the relay has
    /// answered with a success status.
    async fn open_stream(&self, request: &GenerateRequest) -> ChatResult<ByteStream>;
}

pub struct HttpRelayClient {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpRelayClient {
    pub fn new(config: &ClientConfig) -> ChatResult<Self> {
        if config.relay_url.trim().is_empty() {
            return Err(ChatError::Config("relay URL is empty".to_string()));
        }
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()?;
        Ok(Self {
            http,
            endpoint: config.generate_endpoint(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ChatTransport for HttpRelayClient {
    async fn open_stream(&self, request: &GenerateRequest) -> ChatResult<ByteStream> {
        debug!(
            "Relay request: endpoint={}, model={}",
            self.endpoint, request.model
        );
        let response = self
            .http
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "text/event-stream")
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!("Relay rejected request: status={}", status);
            return Err(ChatError::Transport {
                status: status.as_u16(),
            });
        }

        Ok(response
            .bytes_stream()
            .map(|chunk| chunk.map(|bytes| bytes.to_vec()).map_err(ChatError::from))
            .boxed())
    }
}
