use prime::config::DispatchConfig;
use prime::dispatch::ConversationContext;
use prime::time::Timestamp;
use prime::utterance::Utterance;

fn at(ms: u64) -> Timestamp {
    Timestamp::new(ms)
}

fn spoken(text: &str, at_ms: u64) -> Utterance {
    Utterance::new(text, at(at_ms), 1.0)
}

#[test]
fn test_capacity_bound_evicts_oldest() {
    let config = DispatchConfig::default();
    let mut context = ConversationContext::new(&config);

    for i in 0..7u64 {
        context.record(
            &spoken(&format!("do thing {i}"), i * 100),
            format!("intent_{i}"),
            Vec::new(),
        );
    }

    assert_eq!(context.len(), 5, "window never exceeds capacity");
    assert_eq!(context.evictions(), 2);
    let names: Vec<&str> = context.entries().map(|e| e.intent.as_str()).collect();
    assert_eq!(
        names,
        vec!["intent_2", "intent_3", "intent_4", "intent_5", "intent_6"],
        "the two oldest entries must be the ones evicted"
    );
}

#[test]
fn test_entries_carry_their_utterance() {
    let config = DispatchConfig::default();
    let mut context = ConversationContext::new(&config);

    context.record(&spoken("open chrome", 250), "open_app".to_string(), Vec::new());

    let entry = context.entries().next().unwrap();
    assert_eq!(
        entry.utterance.text(),
        "open chrome",
        "an entry keeps the utterance its resolution came from"
    );
    assert_eq!(entry.utterance.timestamp(), at(250));
    assert_eq!(entry.intent, "open_app");
}

#[test]
fn test_decay_prunes_weak_entries() {
    let config = DispatchConfig {
        context_retention_per_sec: 0.5,
        ..DispatchConfig::default()
    };
    let mut context = ConversationContext::new(&config);
    context.record(&spoken("first thing", 0), "stale".to_string(), Vec::new());
    context.record(&spoken("second thing", 9_000), "fresh".to_string(), Vec::new());

    // Ten seconds on: 0.5^10 is far below the prune floor, 0.5^1 is not.
    context.observe(at(10_000));

    assert_eq!(context.len(), 1);
    assert_eq!(context.expired_entries(), 1);
    let survivor = context.entries().next().unwrap();
    assert_eq!(survivor.intent, "fresh");
    assert!(
        survivor.strength < 1.0 && survivor.strength > 0.05,
        "surviving entries carry their decayed strength"
    );
}

#[test]
fn test_idle_gap_clears_context_and_pending() {
    let config = DispatchConfig::default();
    let mut context = ConversationContext::new(&config);
    context.record(&spoken("open chrome", 0), "open_app".to_string(), Vec::new());
    context.set_pending(vec!["open_app".to_string()], at(0));

    // One hour and change of silence.
    context.observe(at(config.context_idle_timeout_ms + 60_000));

    assert!(context.is_empty(), "idle expiry clears the whole window");
    assert!(
        context.pending().is_none(),
        "idle expiry also drops a stale clarification"
    );
    assert_eq!(context.expired_entries(), 1);
}

#[test]
fn test_activity_within_timeout_keeps_context() {
    let config = DispatchConfig {
        context_idle_timeout_ms: 10_000,
        context_retention_per_sec: 0.9999,
        ..DispatchConfig::default()
    };
    let mut context = ConversationContext::new(&config);
    context.record(&spoken("open chrome", 0), "open_app".to_string(), Vec::new());

    // Total elapsed time exceeds the timeout, but no single gap does.
    context.observe(at(6_000));
    context.observe(at(12_000));

    assert_eq!(
        context.len(),
        1,
        "idle expiry watches gaps between activity, not total age"
    );
}

#[test]
fn test_observe_is_idempotent_at_same_instant() {
    let config = DispatchConfig::default();
    let mut context = ConversationContext::new(&config);
    context.record(&spoken("open chrome", 1_000), "open_app".to_string(), Vec::new());

    context.observe(at(61_000));
    let first = context.entries().next().unwrap().strength;
    context.observe(at(61_000));
    let second = context.entries().next().unwrap().strength;

    assert_eq!(first, second, "strength is recomputed from origin, not compounded");
    assert_eq!(context.expired_entries(), 0);
}

#[test]
fn test_out_of_order_timestamp_is_harmless() {
    let config = DispatchConfig::default();
    let mut context = ConversationContext::new(&config);
    context.record(&spoken("open chrome", 5_000), "open_app".to_string(), Vec::new());

    // A clock that stepped backwards must not expire anything.
    context.observe(at(1_000));

    assert_eq!(context.len(), 1);
    assert_eq!(context.entries().next().unwrap().strength, 1.0);
}

#[test]
fn test_recency_rank_counts_from_newest() {
    let config = DispatchConfig::default();
    let mut context = ConversationContext::new(&config);
    context.record(&spoken("first", 100), "a".to_string(), Vec::new());
    context.record(&spoken("second", 200), "b".to_string(), Vec::new());
    context.record(&spoken("third", 300), "c".to_string(), Vec::new());

    assert_eq!(context.recency_rank("c"), Some(0));
    assert_eq!(context.recency_rank("b"), Some(1));
    assert_eq!(context.recency_rank("a"), Some(2));
    assert_eq!(context.recency_rank("nowhere"), None);
}

#[test]
fn test_pending_is_taken_once() {
    let config = DispatchConfig::default();
    let mut context = ConversationContext::new(&config);
    context.set_pending(vec!["make_call".to_string()], at(0));

    let taken = context.take_pending().unwrap();
    assert_eq!(taken.candidates, vec!["make_call".to_string()]);
    assert!(context.take_pending().is_none(), "take is consume, not peek");
}

#[test]
fn test_zero_capacity_is_clamped_to_one() {
    let config = DispatchConfig {
        context_capacity: 0,
        ..DispatchConfig::default()
    };
    let mut context = ConversationContext::new(&config);
    context.record(&spoken("first", 0), "a".to_string(), Vec::new());
    context.record(&spoken("second", 100), "b".to_string(), Vec::new());

    assert_eq!(context.capacity(), 1);
    assert_eq!(context.len(), 1);
    assert_eq!(context.entries().next().unwrap().intent, "b");
}
