use tracing::{debug, warn};
use uuid::Uuid;

use super::state::{SessionGraph, SessionPhase, SessionSignal};
use crate::dispatch::{ConversationContext, DispatchError, DispatchResult, Dispatcher};
use crate::telemetry::event::{DispatchOutcomeKind, TelemetryEvent};
use crate::telemetry::recorder::TelemetryRecorder;
use crate::time::Timestamp;
use crate::utterance::{Entity, Utterance};

pub type SessionId = Uuid;

/// One user-facing conversation: a phase machine wrapped around a
/// dispatcher, its context, and a telemetry recorder.
///
/// `handle_utterance` drives the full capture-dispatch-outcome cycle,
/// so after it returns the phase is always Idle, AwaitingUtterance, or
/// Clarifying. The transient phases exist between signals, never
/// between calls.
pub struct Session {
    id: SessionId,
    phase: SessionPhase,
    dispatcher: Dispatcher,
    context: ConversationContext,
    telemetry: TelemetryRecorder,
    last_utterance_at: Option<Timestamp>,
    seen_evictions: u64,
    seen_expired: u64,
}

impl Session {
    pub fn new(dispatcher: Dispatcher) -> Self {
        let context = ConversationContext::new(dispatcher.config());
        Self {
            id: Uuid::new_v4(),
            phase: SessionPhase::Idle,
            dispatcher,
            context,
            telemetry: TelemetryRecorder::new(),
            last_utterance_at: None,
            seen_evictions: 0,
            seen_expired: 0,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn context(&self) -> &ConversationContext {
        &self.context
    }

    pub fn telemetry(&self) -> &TelemetryRecorder {
        &self.telemetry
    }

    /// Feeds one utterance through the session. A stale clarification
    /// collapses to Idle first, then the phase machine walks
    /// capture -> dispatch -> outcome and settles on the phase the
    /// outcome dictates.
    pub fn handle_utterance(
        &mut self,
        utterance: Utterance,
        entities: &[Entity],
    ) -> Result<DispatchResult, DispatchError> {
        if self.phase == SessionPhase::Clarifying {
            if let Some(last) = self.last_utterance_at {
                let idle = utterance.timestamp().since(last);
                if idle > self.dispatcher.config().context_idle_timeout_ms {
                    self.apply(SessionSignal::IdleTimeout);
                }
            }
        }
        if self.phase == SessionPhase::Idle {
            self.apply(SessionSignal::Listen);
        }
        let capture = if self.phase == SessionPhase::Clarifying {
            SessionSignal::FollowUpCaptured
        } else {
            SessionSignal::UtteranceCaptured
        };
        self.apply(capture);

        let result = self.dispatcher.dispatch(&utterance, entities, &mut self.context);
        self.last_utterance_at = Some(utterance.timestamp());

        match &result {
            Err(DispatchError::InvalidInput(_)) => {
                self.telemetry.record(TelemetryEvent::Dispatch {
                    session_id: self.id,
                    outcome: DispatchOutcomeKind::Rejected,
                    candidates: 0,
                });
                self.apply(SessionSignal::InputRejected);
            }
            Ok(DispatchResult::Resolved(_)) => {
                self.telemetry.record(TelemetryEvent::Dispatch {
                    session_id: self.id,
                    outcome: DispatchOutcomeKind::Resolved,
                    candidates: 1,
                });
                self.apply(SessionSignal::DispatchResolved);
                self.apply(SessionSignal::OutcomeDelivered);
            }
            Ok(DispatchResult::Clarifying(c)) => {
                self.telemetry.record(TelemetryEvent::Dispatch {
                    session_id: self.id,
                    outcome: DispatchOutcomeKind::Clarifying,
                    candidates: c.candidates.len(),
                });
                self.apply(SessionSignal::DispatchAmbiguous);
            }
            Ok(DispatchResult::Unrecognized) => {
                self.telemetry.record(TelemetryEvent::Dispatch {
                    session_id: self.id,
                    outcome: DispatchOutcomeKind::Unrecognized,
                    candidates: 0,
                });
                self.apply(SessionSignal::DispatchUnmatched);
                self.apply(SessionSignal::OutcomeDelivered);
            }
        }
        self.harvest_context_counters();
        result
    }

    /// Folds new context eviction/expiry counts into telemetry as
    /// deltas since the last harvest.
    fn harvest_context_counters(&mut self) {
        let evictions = self.context.evictions();
        if evictions > self.seen_evictions {
            self.telemetry.record(TelemetryEvent::ContextEviction {
                session_id: self.id,
                count: evictions - self.seen_evictions,
            });
            self.seen_evictions = evictions;
        }
        let expired = self.context.expired_entries();
        if expired > self.seen_expired {
            self.telemetry.record(TelemetryEvent::ContextExpiry {
                session_id: self.id,
                dropped_entries: expired - self.seen_expired,
            });
            self.seen_expired = expired;
        }
    }

    fn apply(&mut self, signal: SessionSignal) {
        match SessionGraph::transition(self.phase, signal) {
            Some(next) => {
                self.telemetry.record(TelemetryEvent::PhaseTransition {
                    session_id: self.id,
                    from: self.phase,
                    to: next,
                });
                debug!(from = ?self.phase, to = ?next, ?signal, "session phase change");
                self.phase = next;
            }
            None => {
                warn!(phase = ?self.phase, ?signal, "ignoring illegal session signal");
            }
        }
    }
}
