use serde::Serialize;

/// Lifecycle of a single turn.
///
/// `Idle -> Submitting -> Streaming -> {Committed | Errored} -> Idle`; a
/// rejected request goes straight from `Submitting` to `Errored`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TurnPhase {
    Idle,
    Submitting,
    Streaming,
    Committed,
    Errored,
}

impl TurnPhase {
    pub fn can_transition_to(self, next: TurnPhase) -> bool {
        use TurnPhase::*;
        matches!(
            (self, next),
            (Idle, Submitting)
                | (Submitting, Streaming)
                | (Submitting, Errored)
                | (Streaming, Committed)
                | (Streaming, Errored)
                | (Committed, Idle)
                | (Errored, Idle)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, TurnPhase::Committed | TurnPhase::Errored)
    }
}
