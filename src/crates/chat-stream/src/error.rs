use thiserror::Error;

/// Protocol and transport failures raised while decoding a relay stream.
#[derive(Debug, Error)]
pub enum StreamError {
    /// The frame carried an explicit error payload.
    #[error("{0}")]
    Upstream(String),

    /// The frame body was not a JSON object of the expected shape.
    #[error("Invalid response format: {source}")]
    InvalidFrame {
        frame: String,
        #[source]
        source: serde_json::Error,
    },

    /// Reading the next chunk from the underlying byte stream failed.
    #[error("Stream read error: {0}")]
    Transport(String),
}
