use serde::{Deserialize, Serialize};

/// Where a session sits in its lifecycle.
///
/// ```text
/// Idle -> AwaitingUtterance -> Dispatching -> Resolved ------+
///              ^                    |    \--> Unrecognized --+-> Idle
///              |                    |    \--> Clarifying
///              |                    |             |  ^
///              +--- InputRejected --+   FollowUpCaptured back
///                                            to Dispatching
/// ```
///
/// Clarifying and AwaitingUtterance also collapse to Idle on timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionPhase {
    Idle,
    AwaitingUtterance,
    Dispatching,
    Resolved,
    Clarifying,
    Unrecognized,
}

impl SessionPhase {
    /// Phases in which a new utterance can legally arrive.
    pub fn accepts_utterance(self) -> bool {
        matches!(
            self,
            SessionPhase::Idle | SessionPhase::AwaitingUtterance | SessionPhase::Clarifying
        )
    }
}

/// Events that drive phase changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionSignal {
    Listen,
    UtteranceCaptured,
    FollowUpCaptured,
    DispatchResolved,
    DispatchAmbiguous,
    DispatchUnmatched,
    InputRejected,
    OutcomeDelivered,
    IdleTimeout,
}

/// The legal phase transitions, as a pure table. Anything not listed
/// is illegal and yields `None`; callers decide whether that is a bug
/// or an event to drop.
pub struct SessionGraph;

impl SessionGraph {
    pub fn transition(current: SessionPhase, signal: SessionSignal) -> Option<SessionPhase> {
        use SessionPhase::*;
        use SessionSignal::*;
        match (current, signal) {
            (Idle, Listen) => Some(AwaitingUtterance),
            (AwaitingUtterance, UtteranceCaptured) => Some(Dispatching),
            (AwaitingUtterance, IdleTimeout) => Some(Idle),
            (Dispatching, DispatchResolved) => Some(Resolved),
            (Dispatching, DispatchAmbiguous) => Some(Clarifying),
            (Dispatching, DispatchUnmatched) => Some(Unrecognized),
            // Malformed input never reaches an outcome; the session
            // goes straight back to listening.
            (Dispatching, InputRejected) => Some(AwaitingUtterance),
            (Resolved, OutcomeDelivered) => Some(Idle),
            (Unrecognized, OutcomeDelivered) => Some(Idle),
            (Clarifying, FollowUpCaptured) => Some(Dispatching),
            (Clarifying, IdleTimeout) => Some(Idle),
            _ => None,
        }
    }
}
