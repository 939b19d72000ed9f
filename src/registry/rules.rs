use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::utterance::Entity;

/// Declarative match rule, the snapshot form stored in the registry.
///
/// Evidence stacks: each rule scores in [0, 1], contributes
/// `weight * score`, and the per-intent sum is clamped to [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatchRule {
    /// Fraction of the listed keywords present as whole tokens.
    Keywords { any: Vec<String> },
    /// 1.0 when the pattern matches anywhere in the utterance text.
    Regex { pattern: String },
    /// 1.0 when an entity with this label was supplied.
    EntityPresence { label: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedRule {
    pub rule: MatchRule,
    pub weight: f32,
}

impl WeightedRule {
    pub fn new(rule: MatchRule, weight: f32) -> Self {
        Self { rule, weight }
    }
}

/// Scoreable form of a rule. Regexes compile once at registry build;
/// scoring afterwards is allocation-free.
#[derive(Debug, Clone)]
pub(crate) struct CompiledRule {
    pub(crate) matcher: Matcher,
    pub(crate) weight: f32,
}

#[derive(Debug, Clone)]
pub(crate) enum Matcher {
    Keywords(Vec<String>),
    Pattern(Regex),
    EntityPresence(String),
}

impl CompiledRule {
    pub(crate) fn compile(rule: &WeightedRule) -> Result<Self, regex::Error> {
        let matcher = match &rule.rule {
            MatchRule::Keywords { any } => {
                Matcher::Keywords(any.iter().map(|k| k.to_lowercase()).collect())
            }
            MatchRule::Regex { pattern } => Matcher::Pattern(Regex::new(pattern)?),
            MatchRule::EntityPresence { label } => Matcher::EntityPresence(label.clone()),
        };
        Ok(Self {
            matcher,
            weight: rule.weight,
        })
    }

    /// Uniform scoring interface: (text, tokens, entities) -> [0, 1].
    pub(crate) fn score(&self, text: &str, tokens: &[String], entities: &[Entity]) -> f32 {
        match &self.matcher {
            Matcher::Keywords(keywords) => {
                if keywords.is_empty() {
                    return 0.0;
                }
                let hits = keywords
                    .iter()
                    .filter(|k| tokens.iter().any(|t| t == *k))
                    .count();
                hits as f32 / keywords.len() as f32
            }
            Matcher::Pattern(re) => {
                if re.is_match(text) {
                    1.0
                } else {
                    0.0
                }
            }
            Matcher::EntityPresence(label) => {
                if entities.iter().any(|e| &e.label == label) {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }
}

/// Lowercased alphanumeric tokens of an utterance, punctuation stripped.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|w| {
            w.trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase()
        })
        .filter(|w| !w.is_empty())
        .collect()
}
