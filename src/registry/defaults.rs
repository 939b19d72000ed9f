//! Stock intent set shipped with the assistant.
//!
//! Pattern rules carry most of the evidence: a single hit nearly
//! saturates rule strength, with keyword overlap and supplied entities
//! topping it up. Thresholds are deliberately uneven: side-effecting
//! intents (app launch, messaging, calls, reminders) demand more
//! confidence than informational ones.
//!
//! Registration order matters. It is the last dispatch tie-break, so
//! intents whose phrasing can embed another command (a reminder to
//! call someone) register ahead of the commands they embed.

use super::intent::{EntitySchema, IntentDefinition};
use super::rules::{MatchRule, WeightedRule};

const PATTERN_HIT: f32 = 0.9;
const KEYWORD_SHARE: f32 = 0.3;
const ENTITY_SHARE: f32 = 0.3;

fn pattern(re: &str) -> WeightedRule {
    WeightedRule::new(
        MatchRule::Regex {
            pattern: re.to_string(),
        },
        PATTERN_HIT,
    )
}

fn keywords(any: &[&str]) -> WeightedRule {
    WeightedRule::new(
        MatchRule::Keywords {
            any: any.iter().map(|k| k.to_string()).collect(),
        },
        KEYWORD_SHARE,
    )
}

fn entity(label: &str) -> WeightedRule {
    WeightedRule::new(
        MatchRule::EntityPresence {
            label: label.to_string(),
        },
        ENTITY_SHARE,
    )
}

pub fn stock_intents() -> Vec<IntentDefinition> {
    vec![
        IntentDefinition {
            name: "open_app".to_string(),
            schema: EntitySchema::required(&["app_name"]),
            threshold: 0.8,
            rules: vec![
                pattern(r"(?:open|launch|start|run)\s+(\w+)"),
                keywords(&["open", "launch", "start", "run", "app", "application"]),
                entity("app_name"),
            ],
        },
        IntentDefinition {
            name: "play_youtube".to_string(),
            schema: EntitySchema::required(&["search_term"]),
            threshold: 0.7,
            rules: vec![
                pattern(r"(?:play|search)\s+(.+?)\s+on\s+youtube"),
                pattern(r"youtube\s+(.+)"),
                keywords(&["play", "youtube", "video", "search", "watch"]),
                entity("search_term"),
            ],
        },
        IntentDefinition {
            name: "set_reminder".to_string(),
            schema: EntitySchema::required(&["task", "time"]),
            threshold: 0.8,
            rules: vec![
                pattern(r"remind\s+me\s+to\s+(.+?)\s+at\s+(.+)"),
                pattern(r"(?:set\s+)?reminder\s+(?:for\s+)?(.+?)\s+at\s+(.+)"),
                keywords(&["remind", "reminder", "alarm", "schedule", "time"]),
                entity("task"),
            ],
        },
        IntentDefinition {
            name: "send_message".to_string(),
            schema: EntitySchema::required(&["contact_name"]),
            threshold: 0.8,
            rules: vec![
                pattern(r"send\s+(?:a\s+)?message\s+to\s+(\w+)"),
                pattern(r"(?:text|message)\s+(\w+)"),
                keywords(&["send", "message", "text", "sms", "contact"]),
                entity("contact_name"),
            ],
        },
        IntentDefinition {
            name: "make_call".to_string(),
            schema: EntitySchema::required(&["contact_name"]),
            threshold: 0.8,
            rules: vec![
                pattern(r"(?:call|dial)\s+(\w+)"),
                pattern(r"phone\s+call\s+to\s+(\w+)"),
                keywords(&["call", "phone", "dial", "ring", "contact"]),
                entity("contact_name"),
            ],
        },
        IntentDefinition {
            name: "get_weather".to_string(),
            schema: EntitySchema::required(&["location"]),
            threshold: 0.7,
            rules: vec![
                pattern(r"(?:weather|temperature|forecast)\s+(?:in\s+)?(.+)"),
                pattern(r"how\s+is\s+the\s+weather\s+(?:in\s+)?(.+)"),
                keywords(&["weather", "temperature", "forecast", "climate"]),
                entity("location"),
            ],
        },
        IntentDefinition {
            name: "get_news".to_string(),
            schema: EntitySchema::required(&["topic"]),
            threshold: 0.7,
            rules: vec![
                pattern(r"(?:latest\s+)?news\s+(?:about\s+)?(.+)"),
                pattern(r"what\s+is\s+happening\s+(?:with\s+)?(.+)"),
                keywords(&["news", "latest", "update", "happening", "current"]),
                entity("topic"),
            ],
        },
        IntentDefinition {
            name: "general_chat".to_string(),
            schema: EntitySchema::optional(&["topic"]),
            threshold: 0.6,
            rules: vec![
                pattern(r"how\s+are\s+you|what\s+can\s+you\s+do|tell\s+me\s+a\s+joke|what\s+time\s+is\s+it"),
                keywords(&["how", "what", "when", "where", "why", "joke", "time"]),
            ],
        },
    ]
}
