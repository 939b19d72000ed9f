//! Dispatch pass: scoring, ranking, and the outcome taxonomy.
//!
//! A pass is a pure function of the utterance, the supplied entities,
//! and the conversation context it mutates. No I/O happens here; the
//! session layer owns side effects.

pub mod context;
pub mod dispatcher;
pub mod result;

pub use context::{ContextEntry, ConversationContext, PendingClarification};
pub use dispatcher::{DispatchError, Dispatcher};
pub use result::{Clarification, DispatchResult, IntentName, Resolution, ScoredCandidate};
