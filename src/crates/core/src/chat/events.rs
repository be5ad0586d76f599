use super::phase::TurnPhase;
use log::trace;
use paddock_core_types::Turn;
use serde::Serialize;
use tokio::sync::mpsc;

/// State changes the display layer renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum ChatEvent {
    /// A turn was appended to the history.
    TurnAppended(Turn),
    /// History was replaced wholesale (new chat).
    HistoryReset(Vec<Turn>),
    /// The input field should be emptied.
    InputCleared,
    ProcessingChanged(bool),
    /// Current content of the in-flight response; empty once the turn ends.
    Typing(String),
    PhaseChanged(TurnPhase),
}

pub trait ChatEventSink: Send + Sync {
    fn publish(&self, event: ChatEvent);
}

impl ChatEventSink for mpsc::UnboundedSender<ChatEvent> {
    fn publish(&self, event: ChatEvent) {
        if self.send(event).is_err() {
            trace!("Chat event receiver dropped");
        }
    }
}
