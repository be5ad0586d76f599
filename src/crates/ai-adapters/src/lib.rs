//! Upstream LLM provider adapters
//!
//! The relay only needs "prompt in, text pieces out". [`CompletionProvider`]
//! is that seam; [`GeminiClient`] is the production implementation.

pub mod providers;
pub mod stream_handler;
pub mod types;

use anyhow::Result;
use async_trait::async_trait;
use futures::stream::BoxStream;

pub use providers::gemini::{GeminiClient, GeminiConfig};

/// Ordered text pieces produced by a provider. The stream ends after the
/// first `Err`.
pub type TextStream = BoxStream<'static, Result<String>>;

#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Start a streamed completion of `prompt` on `model`.
    ///
    /// Failures before the first byte (bad key, unknown model) are returned
    /// directly; failures after that arrive as an `Err` item.
    async fn stream_completion(&self, model: &str, prompt: &str) -> Result<TextStream>;
}
