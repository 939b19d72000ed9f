use std::collections::VecDeque;

use super::event::{DispatchOutcomeKind, TelemetryEvent};
use crate::session::state::SessionPhase;

#[derive(Debug, Clone, Default)]
pub struct TelemetrySnapshot {
    pub dispatch_stats: DispatchStats,
    pub context_stats: ContextStats,
    pub phase_stats: PhaseStats,
}

#[derive(Debug, Clone, Default)]
pub struct DispatchStats {
    pub total: u64,
    pub resolved: u64,
    pub clarifying: u64,
    pub unrecognized: u64,
    pub rejected: u64,
    pub avg_clarify_candidates: f64,
}

#[derive(Debug, Clone, Default)]
pub struct ContextStats {
    pub evictions: u64,
    pub expired_entries: u64,
}

#[derive(Debug, Clone, Default)]
pub struct PhaseStats {
    pub transitions: u64,
    pub clarify_entries: u64,
    pub idle_returns: u64,
}

pub fn compute_snapshot(events: &VecDeque<TelemetryEvent>) -> TelemetrySnapshot {
    let mut snap = TelemetrySnapshot::default();

    let mut clarify_candidate_total: u64 = 0;

    for event in events {
        match event {
            TelemetryEvent::Dispatch {
                outcome,
                candidates,
                ..
            } => {
                snap.dispatch_stats.total += 1;
                match outcome {
                    DispatchOutcomeKind::Resolved => snap.dispatch_stats.resolved += 1,
                    DispatchOutcomeKind::Clarifying => {
                        snap.dispatch_stats.clarifying += 1;
                        clarify_candidate_total += *candidates as u64;
                    }
                    DispatchOutcomeKind::Unrecognized => snap.dispatch_stats.unrecognized += 1,
                    DispatchOutcomeKind::Rejected => snap.dispatch_stats.rejected += 1,
                }
            }
            TelemetryEvent::ContextEviction { count, .. } => {
                snap.context_stats.evictions += count;
            }
            TelemetryEvent::ContextExpiry { dropped_entries, .. } => {
                snap.context_stats.expired_entries += dropped_entries;
            }
            TelemetryEvent::PhaseTransition { to, .. } => {
                snap.phase_stats.transitions += 1;
                match to {
                    SessionPhase::Clarifying => snap.phase_stats.clarify_entries += 1,
                    SessionPhase::Idle => snap.phase_stats.idle_returns += 1,
                    _ => {}
                }
            }
            TelemetryEvent::SessionSummary { .. } => {}
        }
    }

    if snap.dispatch_stats.clarifying > 0 {
        snap.dispatch_stats.avg_clarify_candidates =
            clarify_candidate_total as f64 / snap.dispatch_stats.clarifying as f64;
    }

    snap
}
