use serde::{Deserialize, Serialize};

use crate::session::session::SessionId;
use crate::session::state::SessionPhase;

// Allowed: session ids, phases, outcome kinds, counts.
// Forbidden: utterance text, entity values, confidence scores.

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TelemetryEvent {
    Dispatch {
        session_id: SessionId,
        outcome: DispatchOutcomeKind,
        /// Resolved carries 1, Clarifying the ambiguous set size,
        /// Unrecognized and Rejected 0.
        candidates: usize,
    },

    ContextEviction {
        session_id: SessionId,
        count: u64,
    },

    ContextExpiry {
        session_id: SessionId,
        dropped_entries: u64,
    },

    PhaseTransition {
        session_id: SessionId,
        from: SessionPhase,
        to: SessionPhase,
    },

    SessionSummary {
        dispatches: u64,
        resolved: u64,
        clarifying: u64,
        unrecognized: u64,
        rejected: u64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DispatchOutcomeKind {
    Resolved,
    Clarifying,
    Unrecognized,
    Rejected,
}
