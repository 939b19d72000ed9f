//! Entity extraction from raw utterance text.

use regex::{Regex, RegexBuilder};
use tracing::debug;

use crate::registry::rules::Matcher;
use crate::registry::IntentRegistry;
use crate::utterance::{Entity, Span, Utterance};

/// Pulls structured entities out of an utterance before dispatch.
///
/// Extraction never fails: text that matches nothing yields an empty
/// list and dispatch proceeds on rule evidence alone.
pub trait EntityExtractor {
    fn extract(&self, utterance: &Utterance) -> Vec<Entity>;
}

struct CaptureRule {
    regex: Regex,
    labels: Vec<String>,
}

/// Extractor derived from the registry's own pattern rules: each
/// capture group maps positionally onto the owning intent's schema
/// labels, required labels first, then optional.
///
/// Patterns are recompiled case-insensitively so matching runs against
/// the original text and spans index into it unchanged.
pub struct PatternExtractor {
    rules: Vec<CaptureRule>,
}

impl PatternExtractor {
    pub fn from_registry(registry: &IntentRegistry) -> Self {
        let mut rules = Vec::new();
        for intent in registry.iter() {
            let labels: Vec<String> = intent.schema().labels().map(str::to_string).collect();
            for compiled in intent.compiled() {
                let Matcher::Pattern(regex) = &compiled.matcher else {
                    continue;
                };
                if regex.captures_len() <= 1 {
                    continue;
                }
                match RegexBuilder::new(regex.as_str())
                    .case_insensitive(true)
                    .build()
                {
                    Ok(regex) => rules.push(CaptureRule {
                        regex,
                        labels: labels.clone(),
                    }),
                    // Already compiled once at registry build, so this
                    // arm is unreachable in practice.
                    Err(err) => debug!(%err, "skipping extractor pattern"),
                }
            }
        }
        Self { rules }
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }
}

impl EntityExtractor for PatternExtractor {
    fn extract(&self, utterance: &Utterance) -> Vec<Entity> {
        let text = utterance.text();
        let mut out: Vec<Entity> = Vec::new();
        for rule in &self.rules {
            let Some(caps) = rule.regex.captures(text) else {
                continue;
            };
            for (slot, label) in rule.labels.iter().enumerate() {
                let Some(m) = caps.get(slot + 1) else {
                    continue;
                };
                // First extraction wins per label.
                if out.iter().any(|e| &e.label == label) {
                    continue;
                }
                out.push(Entity::new(
                    label.clone(),
                    m.as_str().trim(),
                    Span::new(m.start(), m.end()),
                ));
            }
        }
        out
    }
}
