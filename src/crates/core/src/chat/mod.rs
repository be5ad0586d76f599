//! Chat orchestration
//!
//! Drives one request/response turn at a time and publishes display state
//! through a [`ChatEventSink`].

pub mod events;
pub mod phase;
pub mod session;

pub use events::{ChatEvent, ChatEventSink};
pub use phase::TurnPhase;
pub use session::{
    ChatSession, IgnoreReason, SubmitOutcome, EMPTY_RESPONSE_MESSAGE, ERROR_PREFIX,
    WELCOME_MESSAGE,
};
