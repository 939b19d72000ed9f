use serde::{Deserialize, Serialize};

/// Logical session time in milliseconds.
///
/// Dispatch never reads the wall clock: callers stamp each utterance, and
/// all decay/expiry math runs on these values. Deterministic replay follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp {
    pub millis: u64,
}

impl Timestamp {
    pub fn new(millis: u64) -> Self {
        Timestamp { millis }
    }

    /// Milliseconds elapsed since `earlier`. Saturates at zero for
    /// out-of-order stamps rather than wrapping.
    pub fn since(&self, earlier: Timestamp) -> u64 {
        self.millis.saturating_sub(earlier.millis)
    }
}
