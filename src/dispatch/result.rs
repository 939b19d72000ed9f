use serde::{Deserialize, Serialize};

use crate::utterance::Entity;

pub type IntentName = String;

/// One intent together with the confidence dispatch assigned it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    pub intent: IntentName,
    pub confidence: f32,
}

/// A dispatch that settled on a single intent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub intent: IntentName,
    /// Entities the winning schema accepts, in the order supplied.
    pub bindings: Vec<Entity>,
    pub confidence: f32,
}

impl Resolution {
    pub fn binding(&self, label: &str) -> Option<&str> {
        self.bindings
            .iter()
            .find(|e| e.label == label)
            .map(|e| e.value.as_str())
    }
}

/// A dispatch that narrowed the field but could not settle it.
/// Candidates are ranked best-first and there are always at least two;
/// a single survivor would have resolved or been dropped instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clarification {
    pub candidates: Vec<ScoredCandidate>,
    pub prompt: String,
}

/// Outcome taxonomy of a dispatch pass. Malformed input is not an
/// outcome; it surfaces as an error before any scoring happens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "data", rename_all = "snake_case")]
pub enum DispatchResult {
    Resolved(Resolution),
    Clarifying(Clarification),
    Unrecognized,
}

impl DispatchResult {
    pub fn is_resolved(&self) -> bool {
        matches!(self, DispatchResult::Resolved(_))
    }

    pub fn is_clarifying(&self) -> bool {
        matches!(self, DispatchResult::Clarifying(_))
    }
}
