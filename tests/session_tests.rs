use std::sync::Arc;

use prime::config::DispatchConfig;
use prime::dispatch::{DispatchResult, Dispatcher};
use prime::registry::IntentRegistry;
use prime::session::{Session, SessionGraph, SessionPhase, SessionSignal};
use prime::telemetry::event::TelemetryEvent;
use prime::time::Timestamp;
use prime::utterance::{Entity, Span, Utterance};

fn stock_session() -> Session {
    let dispatcher = Dispatcher::new(Arc::new(IntentRegistry::builtin()), DispatchConfig::default());
    Session::new(dispatcher)
}

fn utterance(text: &str, at_ms: u64) -> Utterance {
    Utterance::new(text, Timestamp::new(at_ms), 1.0)
}

fn entity(label: &str, value: &str) -> Entity {
    Entity::new(label, value, Span::new(0, value.len()))
}

#[test]
fn test_transition_table() {
    use SessionPhase::*;
    use SessionSignal::*;

    // 1. The happy path.
    assert_eq!(SessionGraph::transition(Idle, Listen), Some(AwaitingUtterance));
    assert_eq!(
        SessionGraph::transition(AwaitingUtterance, UtteranceCaptured),
        Some(Dispatching)
    );
    assert_eq!(
        SessionGraph::transition(Dispatching, DispatchResolved),
        Some(Resolved)
    );
    assert_eq!(
        SessionGraph::transition(Resolved, OutcomeDelivered),
        Some(Idle)
    );

    // 2. The clarification loop.
    assert_eq!(
        SessionGraph::transition(Dispatching, DispatchAmbiguous),
        Some(Clarifying)
    );
    assert_eq!(
        SessionGraph::transition(Clarifying, FollowUpCaptured),
        Some(Dispatching)
    );
    assert_eq!(SessionGraph::transition(Clarifying, IdleTimeout), Some(Idle));

    // 3. Rejection goes back to listening, not to an outcome.
    assert_eq!(
        SessionGraph::transition(Dispatching, InputRejected),
        Some(AwaitingUtterance)
    );

    // 4. A few illegal edges.
    assert_eq!(SessionGraph::transition(Idle, OutcomeDelivered), None);
    assert_eq!(SessionGraph::transition(Resolved, UtteranceCaptured), None);
    assert_eq!(SessionGraph::transition(Clarifying, Listen), None);
    assert_eq!(SessionGraph::transition(Dispatching, UtteranceCaptured), None);
}

#[test]
fn test_accepts_utterance_flags() {
    assert!(SessionPhase::Idle.accepts_utterance());
    assert!(SessionPhase::AwaitingUtterance.accepts_utterance());
    assert!(SessionPhase::Clarifying.accepts_utterance());
    assert!(!SessionPhase::Dispatching.accepts_utterance());
    assert!(!SessionPhase::Resolved.accepts_utterance());
    assert!(!SessionPhase::Unrecognized.accepts_utterance());
}

#[test]
fn test_resolved_utterance_settles_back_to_idle() {
    let mut session = stock_session();
    assert_eq!(session.phase(), SessionPhase::Idle);

    let result = session
        .handle_utterance(
            utterance("open chrome", 0),
            &[entity("app_name", "chrome")],
        )
        .unwrap();

    assert!(result.is_resolved());
    assert_eq!(
        session.phase(),
        SessionPhase::Idle,
        "outcome delivery returns the session to Idle"
    );
    assert_eq!(session.context().len(), 1);
}

#[test]
fn test_clarifying_session_waits_for_followup() {
    let mut session = stock_session();

    let first = session
        .handle_utterance(utterance("john", 0), &[entity("contact_name", "john")])
        .unwrap();
    assert!(first.is_clarifying());
    assert_eq!(
        session.phase(),
        SessionPhase::Clarifying,
        "a clarifying session stays put until the follow-up"
    );

    let second = session
        .handle_utterance(
            utterance("call john", 2_000),
            &[entity("contact_name", "john")],
        )
        .unwrap();
    let DispatchResult::Resolved(resolution) = second else {
        panic!("follow-up must resolve, got {second:?}");
    };
    assert_eq!(resolution.intent, "make_call");
    assert_eq!(session.phase(), SessionPhase::Idle);
}

#[test]
fn test_invalid_input_returns_to_awaiting() {
    let mut session = stock_session();

    let err = session.handle_utterance(utterance("   ", 0), &[]);
    assert!(err.is_err());
    assert_eq!(
        session.phase(),
        SessionPhase::AwaitingUtterance,
        "rejected input means the session keeps listening"
    );

    // The session is still usable.
    let result = session
        .handle_utterance(
            utterance("open chrome", 1_000),
            &[entity("app_name", "chrome")],
        )
        .unwrap();
    assert!(result.is_resolved());
}

#[test]
fn test_stale_clarification_collapses_to_idle_first() {
    let mut session = stock_session();

    let first = session
        .handle_utterance(utterance("john", 0), &[entity("contact_name", "john")])
        .unwrap();
    assert!(first.is_clarifying());

    // Over an hour later: not a follow-up any more.
    let late = 3_600_000 + 120_000;
    let result = session
        .handle_utterance(
            utterance("open chrome", late),
            &[entity("app_name", "chrome")],
        )
        .unwrap();

    let DispatchResult::Resolved(resolution) = result else {
        panic!("fresh utterance must resolve on its own merits, got {result:?}");
    };
    assert_eq!(resolution.intent, "open_app");
    assert_eq!(session.phase(), SessionPhase::Idle);
    let collapsed = session.telemetry().events().any(|e| {
        matches!(
            e,
            TelemetryEvent::PhaseTransition {
                from: SessionPhase::Clarifying,
                to: SessionPhase::Idle,
                ..
            }
        )
    });
    assert!(collapsed, "the stale clarification must collapse via IdleTimeout");
}

#[test]
fn test_session_records_dispatch_outcomes() {
    let mut session = stock_session();

    session
        .handle_utterance(
            utterance("open chrome", 0),
            &[entity("app_name", "chrome")],
        )
        .unwrap();
    session
        .handle_utterance(utterance("zzz qqq", 1_000), &[])
        .unwrap();
    let _ = session.handle_utterance(utterance("", 2_000), &[]);

    let snap = session.telemetry().snapshot();
    assert_eq!(snap.dispatch_stats.total, 3);
    assert_eq!(snap.dispatch_stats.resolved, 1);
    assert_eq!(snap.dispatch_stats.unrecognized, 1);
    assert_eq!(snap.dispatch_stats.rejected, 1);
}
