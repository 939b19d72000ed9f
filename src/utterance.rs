use serde::{Deserialize, Serialize};

use crate::time::Timestamp;

/// A recognized spoken (or typed) input, immutable once created.
///
/// The text is expected to arrive normalized (see [`normalize`]); the
/// confidence is whatever the upstream speech engine reported, clamped
/// into [0, 1] at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Utterance {
    text: String,
    timestamp: Timestamp,
    confidence: f32,
}

impl Utterance {
    pub fn new(text: impl Into<String>, timestamp: Timestamp, confidence: f32) -> Self {
        Self {
            text: text.into(),
            timestamp,
            confidence: confidence.clamp(0.0, 1.0),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    /// Upstream speech-engine confidence, always in [0, 1].
    pub fn confidence(&self) -> f32 {
        self.confidence
    }
}

/// Byte range into the utterance text an entity was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }
}

/// A labeled value extracted from an utterance (app name, contact name, ...).
/// Extraction order is preserved wherever entities travel in a Vec.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub label: String,
    pub value: String,
    pub span: Span,
}

impl Entity {
    pub fn new(label: impl Into<String>, value: impl Into<String>, span: Span) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            span,
        }
    }
}

/// Canonical utterance normalization: lowercase, whitespace collapsed.
/// Upstream capture is expected to apply this before building an Utterance.
pub fn normalize(raw: &str) -> String {
    raw.split_whitespace()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}
