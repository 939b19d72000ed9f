use serde::{Deserialize, Serialize};

/// Tunable knobs for scoring and context upkeep.
///
/// None of these are contractual constants: per-intent thresholds live in
/// the registry, and everything here can be overridden at construction.
/// Defaults mirror the shipped assistant configuration (pattern evidence
/// carries 70% of the score, upstream speech confidence 30%, a five-entry
/// context window, one-hour idle expiry).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Weight of pattern/rule match strength in the combined confidence.
    pub pattern_weight: f32,
    /// Weight of the upstream speech-engine confidence.
    pub speech_weight: f32,
    /// Candidates at or below this floor are not candidates at all.
    pub global_floor: f32,
    /// Additive bias applied to intents carried over from a pending
    /// clarification, before clamping.
    pub clarify_bias: f32,
    /// Maximum number of (utterance, intent, entities) entries retained.
    pub context_capacity: usize,
    /// Whole-context expiry after this much idle time between dispatches.
    pub context_idle_timeout_ms: u64,
    /// Per-second retention factor for entry strength; entries decayed
    /// below the prune floor are dropped.
    pub context_retention_per_sec: f32,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            pattern_weight: 0.7,
            speech_weight: 0.3,
            global_floor: 0.35,
            clarify_bias: 0.15,
            context_capacity: 5,
            context_idle_timeout_ms: 3_600_000,
            context_retention_per_sec: 0.999,
        }
    }
}
