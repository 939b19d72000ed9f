//! Instrumentation for dispatch and session behavior.
//!
//! # SAFETY INVARIANT
//! Telemetry is a read-only side-effect layer. It must **NEVER** be read
//! inside decision logic (Dispatcher, Session, or registry scoring).
//! It exists solely for observability and verification.
//!
//! # PRIVACY INVARIANT
//! Telemetry events must **NEVER** contain user content (utterance text,
//! entity values) or content-derived confidence scores. Only session
//! ids, phases, outcome kinds, and counts are allowed.

pub mod event;
pub mod metrics;
pub mod recorder;
