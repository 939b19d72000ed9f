//! Session lifecycle: the phase machine and the per-conversation
//! wrapper that drives dispatch and records telemetry.

pub mod session;
pub mod state;

pub use session::{Session, SessionId};
pub use state::{SessionGraph, SessionPhase, SessionSignal};
