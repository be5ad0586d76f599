use super::events::{ChatEvent, ChatEventSink};
use super::phase::TurnPhase;
use crate::error::ChatResult;
use crate::transport::ChatTransport;
use futures::StreamExt;
use log::{debug, error, info, warn};
use paddock_chat_stream::decode_text_stream;
use paddock_core_types::{GenerateRequest, Turn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

pub const WELCOME_MESSAGE: &str =
    "Welcome to PaddockPal! I'm your F1 expert assistant. How can I help you today? 🏎️";
pub const EMPTY_RESPONSE_MESSAGE: &str = "Sorry, I could not generate a response.";
pub const ERROR_PREFIX: &str = "Error: ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Input was empty after trimming.
    EmptyInput,
    /// Another turn is still in flight.
    Busy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Ignored(IgnoreReason),
    /// The bot turn committed after a successful stream (possibly the fallback).
    Committed(Turn),
    /// The bot turn committed after a transport or protocol error.
    Errored(Turn),
}

impl SubmitOutcome {
    pub fn bot_turn(&self) -> Option<&Turn> {
        match self {
            SubmitOutcome::Committed(turn) | SubmitOutcome::Errored(turn) => Some(turn),
            SubmitOutcome::Ignored(_) => None,
        }
    }
}

struct SessionState {
    history: Vec<Turn>,
    /// Response buffer of the in-flight turn as last published.
    typing: String,
    phase: TurnPhase,
}

/// One conversation against the relay.
///
/// At most one turn is in flight; `submit` on a busy session is a no-op.
/// Locks are only held for short synchronous sections, never across `.await`.
pub struct ChatSession<T> {
    transport: T,
    sink: Box<dyn ChatEventSink>,
    model: String,
    processing: AtomicBool,
    state: Mutex<SessionState>,
}

impl<T: ChatTransport> ChatSession<T> {
    pub fn new(transport: T, sink: impl ChatEventSink + 'static, model: impl Into<String>) -> Self {
        let session = Self {
            transport,
            sink: Box::new(sink),
            model: model.into(),
            processing: AtomicBool::new(false),
            state: Mutex::new(SessionState {
                history: Vec::new(),
                typing: String::new(),
                phase: TurnPhase::Idle,
            }),
        };
        session.reset_history();
        session
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn history(&self) -> Vec<Turn> {
        self.lock_state().history.clone()
    }

    pub fn typing_text(&self) -> String {
        self.lock_state().typing.clone()
    }

    pub fn phase(&self) -> TurnPhase {
        self.lock_state().phase
    }

    pub fn is_processing(&self) -> bool {
        self.processing.load(Ordering::Acquire)
    }

    /// Drop the conversation and start over from the welcome message.
    ///
    /// Refused (returns `false`) while a turn is in flight.
    pub fn start_new_chat(&self) -> bool {
        if !self.try_claim() {
            warn!("Ignoring new chat request while a turn is in flight");
            return false;
        }
        self.reset_history();
        self.processing.store(false, Ordering::Release);
        true
    }

    /// Run one user turn to completion.
    ///
    /// Exactly one bot turn is committed for every accepted input, whatever
    /// the outcome; processing state is cleared on every exit path.
    pub async fn submit(&self, input: &str) -> SubmitOutcome {
        let text = input.trim();
        if text.is_empty() {
            return SubmitOutcome::Ignored(IgnoreReason::EmptyInput);
        }
        if !self.try_claim() {
            debug!("Ignoring submit while a turn is in flight");
            return SubmitOutcome::Ignored(IgnoreReason::Busy);
        }
        let _guard = TurnGuard { session: self };

        let user_turn = Turn::user(text);
        {
            let mut state = self.lock_state();
            state.history.push(user_turn.clone());
            state.typing.clear();
        }
        self.sink.publish(ChatEvent::TurnAppended(user_turn));
        self.sink.publish(ChatEvent::InputCleared);
        self.sink.publish(ChatEvent::ProcessingChanged(true));
        self.transition(TurnPhase::Submitting);

        let request = GenerateRequest::user_text(self.model.as_str(), text);
        match self.stream_reply(&request).await {
            Ok(buffer) => {
                let content = if buffer.is_empty() {
                    info!("Stream completed without text, committing fallback reply");
                    EMPTY_RESPONSE_MESSAGE.to_string()
                } else {
                    buffer
                };
                let turn = self.commit(Turn::bot(content), TurnPhase::Committed);
                SubmitOutcome::Committed(turn)
            }
            Err(e) => {
                error!("Chat turn failed: {}", e);
                let turn = self.commit(
                    Turn::bot(format!("{}{}", ERROR_PREFIX, e)),
                    TurnPhase::Errored,
                );
                SubmitOutcome::Errored(turn)
            }
        }
    }

    /// Claim the busy flag; `false` if a turn or reset already holds it.
    fn try_claim(&self) -> bool {
        self.processing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    async fn stream_reply(&self, request: &GenerateRequest) -> ChatResult<String> {
        let bytes = self.transport.open_stream(request).await?;
        self.transition(TurnPhase::Streaming);

        let mut deltas = std::pin::pin!(decode_text_stream(bytes));
        let mut buffer = String::new();
        while let Some(delta) = deltas.next().await {
            let delta = delta?;
            if delta.is_empty() {
                continue;
            }
            buffer.push_str(&delta);
            self.lock_state().typing.clone_from(&buffer);
            self.sink.publish(ChatEvent::Typing(buffer.clone()));
        }
        Ok(buffer)
    }

    fn commit(&self, turn: Turn, phase: TurnPhase) -> Turn {
        self.lock_state().history.push(turn.clone());
        self.sink.publish(ChatEvent::TurnAppended(turn.clone()));
        self.transition(phase);
        turn
    }

    fn transition(&self, next: TurnPhase) -> bool {
        let mut state = self.lock_state();
        if !state.phase.can_transition_to(next) {
            error!(
                "Refusing illegal turn transition: {:?} -> {:?}",
                state.phase, next
            );
            return false;
        }
        debug!("Turn phase: {:?} -> {:?}", state.phase, next);
        state.phase = next;
        drop(state);
        self.sink.publish(ChatEvent::PhaseChanged(next));
        true
    }

    fn reset_history(&self) {
        let history = vec![Turn::bot(WELCOME_MESSAGE)];
        {
            let mut state = self.lock_state();
            state.history = history.clone();
            state.typing.clear();
        }
        self.sink.publish(ChatEvent::HistoryReset(history));
    }

    fn lock_state(&self) -> MutexGuard<'_, SessionState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Returns the session to `Idle` when a turn ends, including when the
/// submitting future is dropped mid-stream.
struct TurnGuard<'a, T> {
    session: &'a ChatSession<T>,
}

impl<T> Drop for TurnGuard<'_, T> {
    fn drop(&mut self) {
        let session = self.session;
        let previous = {
            let mut state = session
                .state
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            state.typing.clear();
            std::mem::replace(&mut state.phase, TurnPhase::Idle)
        };
        if !previous.is_terminal() {
            warn!("Turn abandoned in phase {:?}", previous);
        }
        session.processing.store(false, Ordering::Release);
        session.sink.publish(ChatEvent::Typing(String::new()));
        session.sink.publish(ChatEvent::ProcessingChanged(false));
        session.sink.publish(ChatEvent::PhaseChanged(TurnPhase::Idle));
    }
}
