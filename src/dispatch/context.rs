use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::result::IntentName;
use crate::config::DispatchConfig;
use crate::time::Timestamp;
use crate::utterance::{Entity, Utterance};

/// Entries weaker than this after decay are dropped outright.
const STRENGTH_FLOOR: f32 = 0.05;

/// One past resolution retained for recency ranking. Holds the
/// utterance it resolved from plus the schema-relevant bindings; the
/// utterance timestamp is the entry's decay origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextEntry {
    pub utterance: Utterance,
    pub intent: IntentName,
    pub bindings: Vec<Entity>,
    pub strength: f32,
}

/// An unanswered clarification, carried into the next dispatch pass
/// and consumed there exactly once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingClarification {
    pub candidates: Vec<IntentName>,
    pub asked_at: Timestamp,
}

/// Short-term conversational memory for one session.
///
/// Holds a bounded window of recent resolutions (oldest evicted first),
/// decays their strength over time, and clears wholesale after an idle
/// gap. Every mutation is driven by caller-supplied timestamps, so the
/// same inputs always leave the same state behind.
#[derive(Debug, Clone)]
pub struct ConversationContext {
    capacity: usize,
    retention_per_sec: f32,
    idle_timeout_ms: u64,
    entries: VecDeque<ContextEntry>,
    pending: Option<PendingClarification>,
    last_activity: Option<Timestamp>,
    evictions: u64,
    expired_entries: u64,
}

impl ConversationContext {
    pub fn new(config: &DispatchConfig) -> Self {
        Self {
            capacity: config.context_capacity.max(1),
            retention_per_sec: config.context_retention_per_sec,
            idle_timeout_ms: config.context_idle_timeout_ms,
            entries: VecDeque::with_capacity(config.context_capacity.max(1)),
            pending: None,
            last_activity: None,
            evictions: 0,
            expired_entries: 0,
        }
    }

    /// Brings the context up to date with the clock before a dispatch
    /// pass: applies idle expiry, then decay pruning, then marks `now`
    /// as the latest activity. Observing twice at the same instant is
    /// a no-op the second time.
    pub fn observe(&mut self, now: Timestamp) {
        if let Some(last) = self.last_activity {
            if now.since(last) > self.idle_timeout_ms && !self.is_empty_and_idle() {
                let dropped = self.entries.len() as u64;
                self.entries.clear();
                self.pending = None;
                self.expired_entries += dropped;
                debug!(dropped, "conversation context expired after idle gap");
            }
        }
        let before = self.entries.len();
        let retention = self.retention_per_sec;
        self.entries.retain_mut(|entry| {
            let age_secs = now.since(entry.utterance.timestamp()) as f32 / 1000.0;
            entry.strength = retention.powf(age_secs);
            entry.strength >= STRENGTH_FLOOR
        });
        self.expired_entries += (before - self.entries.len()) as u64;
        self.last_activity = Some(now);
    }

    fn is_empty_and_idle(&self) -> bool {
        self.entries.is_empty() && self.pending.is_none()
    }

    /// Records a resolution, evicting the oldest entry once full.
    pub fn record(&mut self, utterance: &Utterance, intent: IntentName, bindings: Vec<Entity>) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
            self.evictions += 1;
        }
        self.last_activity = Some(utterance.timestamp());
        self.entries.push_back(ContextEntry {
            utterance: utterance.clone(),
            intent,
            bindings,
            strength: 1.0,
        });
    }

    /// Recency rank of an intent: 0 for the newest entry naming it,
    /// counting backwards. `None` when it never appears.
    pub fn recency_rank(&self, intent: &str) -> Option<usize> {
        self.entries.iter().rev().position(|e| e.intent == intent)
    }

    pub fn set_pending(&mut self, candidates: Vec<IntentName>, asked_at: Timestamp) {
        self.pending = Some(PendingClarification {
            candidates,
            asked_at,
        });
    }

    /// Removes and returns the pending clarification, if any. Each
    /// dispatch pass calls this once, so a clarification influences at
    /// most the single pass that follows it.
    pub fn take_pending(&mut self) -> Option<PendingClarification> {
        self.pending.take()
    }

    pub fn pending(&self) -> Option<&PendingClarification> {
        self.pending.as_ref()
    }

    pub fn entries(&self) -> impl Iterator<Item = &ContextEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Entries pushed out by the capacity bound, lifetime total.
    pub fn evictions(&self) -> u64 {
        self.evictions
    }

    /// Entries dropped by decay pruning or idle expiry, lifetime total.
    pub fn expired_entries(&self) -> u64 {
        self.expired_entries
    }
}
