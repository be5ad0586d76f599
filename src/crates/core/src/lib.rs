// PaddockPal Core Library - platform-agnostic chat logic
// Layers: config/error -> transport (relay client) -> chat (orchestrator)

pub mod chat;
pub mod config;
pub mod error;
pub mod transport;

pub use chat::{
    ChatEvent, ChatEventSink, ChatSession, IgnoreReason, SubmitOutcome, TurnPhase,
    EMPTY_RESPONSE_MESSAGE, ERROR_PREFIX, WELCOME_MESSAGE,
};
pub use config::ClientConfig;
pub use error::{ChatError, ChatResult};
pub use transport::{ByteStream, ChatTransport, HttpRelayClient};

pub use paddock_core_types::{GenerateRequest, Role, Turn};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
