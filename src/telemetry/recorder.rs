use std::collections::VecDeque;

use super::event::TelemetryEvent;
use super::metrics::{compute_snapshot, TelemetrySnapshot};

const MAX_EVENTS: usize = 10_000;

/// Bounded event buffer. Oldest events fall off first, so a long-lived
/// session keeps a rolling window rather than growing without bound.
#[derive(Debug)]
pub struct TelemetryRecorder {
    buffer: VecDeque<TelemetryEvent>,
}

impl TelemetryRecorder {
    pub fn new() -> Self {
        Self {
            buffer: VecDeque::with_capacity(MAX_EVENTS),
        }
    }

    pub fn record(&mut self, event: TelemetryEvent) {
        if self.buffer.len() >= MAX_EVENTS {
            self.buffer.pop_front();
        }
        self.buffer.push_back(event);
    }

    pub fn snapshot(&self) -> TelemetrySnapshot {
        compute_snapshot(&self.buffer)
    }

    pub fn events(&self) -> impl Iterator<Item = &TelemetryEvent> {
        self.buffer.iter()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Rolls the buffer up into one summary event, for logging when a
    /// session ends.
    pub fn summarize(&self) -> TelemetryEvent {
        let snap = self.snapshot();
        TelemetryEvent::SessionSummary {
            dispatches: snap.dispatch_stats.total,
            resolved: snap.dispatch_stats.resolved,
            clarifying: snap.dispatch_stats.clarifying,
            unrecognized: snap.dispatch_stats.unrecognized,
            rejected: snap.dispatch_stats.rejected,
        }
    }
}

impl Default for TelemetryRecorder {
    fn default() -> Self {
        Self::new()
    }
}
