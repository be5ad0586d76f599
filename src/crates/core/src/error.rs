//! Error taxonomy for a chat turn
//!
//! Every variant ends up as a single bot turn; nothing here is retried.

use paddock_chat_stream::StreamError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChatError {
    /// Required client configuration is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The relay answered with a non-success status before streaming began.
    #[error("API request failed with status {status}")]
    Transport { status: u16 },

    /// The request could not be sent or the body could not be read.
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    /// The relay stream carried an error frame or a malformed frame.
    #[error(transparent)]
    Stream(#[from] StreamError),
}

pub type ChatResult<T> = Result<T, ChatError>;
