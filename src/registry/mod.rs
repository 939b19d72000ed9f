//! Intent registry: the fixed set of intents a dispatcher can route to.
//!
//! The registry is built once, validated eagerly (duplicate names, empty
//! schemas, bad thresholds, and malformed patterns are rejected up
//! front), and then shared immutably. Registration order is preserved
//! and meaningful: it is the final tie-break during dispatch, so two
//! builds from the same definitions always rank candidates identically.

pub mod defaults;
pub mod intent;
pub mod rules;

pub use intent::{EntitySchema, IntentDefinition, RegistrySnapshot};
pub use rules::{MatchRule, WeightedRule};

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use thiserror::Error;
use tracing::debug;

use self::rules::CompiledRule;
use crate::utterance::Entity;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("registry defines no intents")]
    Empty,
    #[error("intent at position {0} has an empty name")]
    UnnamedIntent(usize),
    #[error("duplicate intent name: {0}")]
    DuplicateIntent(String),
    #[error("intent {0}: schema names no entity labels")]
    EmptySchema(String),
    #[error("intent {name}: threshold {value} outside [0, 1]")]
    ThresholdOutOfRange { name: String, value: f32 },
    #[error("intent {0}: rule weight must be positive and finite")]
    BadRuleWeight(String),
    #[error("intent {name}: invalid pattern: {source}")]
    BadPattern { name: String, source: regex::Error },
    #[error("failed to read registry snapshot: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse registry snapshot: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A definition plus its compiled rules, fixed at build time.
#[derive(Debug, Clone)]
pub struct RegisteredIntent {
    def: IntentDefinition,
    compiled: Vec<CompiledRule>,
}

impl RegisteredIntent {
    pub fn name(&self) -> &str {
        &self.def.name
    }

    pub fn threshold(&self) -> f32 {
        self.def.threshold
    }

    pub fn schema(&self) -> &EntitySchema {
        &self.def.schema
    }

    pub(crate) fn compiled(&self) -> &[CompiledRule] {
        &self.compiled
    }

    /// Stacked rule evidence, clamped to [0, 1].
    pub fn rule_strength(&self, text: &str, tokens: &[String], entities: &[Entity]) -> f32 {
        let sum: f32 = self
            .compiled
            .iter()
            .map(|rule| rule.weight * rule.score(text, tokens, entities))
            .sum();
        sum.clamp(0.0, 1.0)
    }
}

/// Immutable snapshot of everything the assistant can dispatch to.
#[derive(Debug, Clone)]
pub struct IntentRegistry {
    intents: Vec<RegisteredIntent>,
    known_labels: HashSet<String>,
}

impl IntentRegistry {
    /// Validates and compiles a set of definitions. Order is kept as given.
    pub fn build(defs: Vec<IntentDefinition>) -> Result<Self, RegistryError> {
        if defs.is_empty() {
            return Err(RegistryError::Empty);
        }
        let mut seen = HashSet::new();
        let mut intents = Vec::with_capacity(defs.len());
        let mut known_labels = HashSet::new();
        for (position, def) in defs.into_iter().enumerate() {
            if def.name.trim().is_empty() {
                return Err(RegistryError::UnnamedIntent(position));
            }
            if !seen.insert(def.name.clone()) {
                return Err(RegistryError::DuplicateIntent(def.name));
            }
            if def.schema.is_empty() {
                return Err(RegistryError::EmptySchema(def.name));
            }
            if !(0.0..=1.0).contains(&def.threshold) {
                return Err(RegistryError::ThresholdOutOfRange {
                    name: def.name,
                    value: def.threshold,
                });
            }
            let mut compiled = Vec::with_capacity(def.rules.len());
            for rule in &def.rules {
                if !rule.weight.is_finite() || rule.weight <= 0.0 {
                    return Err(RegistryError::BadRuleWeight(def.name));
                }
                compiled.push(CompiledRule::compile(rule).map_err(|source| {
                    RegistryError::BadPattern {
                        name: def.name.clone(),
                        source,
                    }
                })?);
            }
            for label in def.schema.labels() {
                known_labels.insert(label.to_string());
            }
            intents.push(RegisteredIntent { def, compiled });
        }
        debug!(intents = intents.len(), "intent registry built");
        Ok(Self {
            intents,
            known_labels,
        })
    }

    /// The stock intent set. Its definitions are fixed at compile time
    /// and covered by tests, so building them cannot fail.
    pub fn builtin() -> Self {
        Self::build(defaults::stock_intents()).expect("stock intent set must validate")
    }

    pub fn from_snapshot(snapshot: RegistrySnapshot) -> Result<Self, RegistryError> {
        Self::build(snapshot.intents)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let raw = fs::read_to_string(path)?;
        let snapshot: RegistrySnapshot = serde_json::from_str(&raw)?;
        Self::from_snapshot(snapshot)
    }

    pub fn len(&self) -> usize {
        self.intents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intents.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegisteredIntent> {
        self.intents.iter()
    }

    pub fn as_slice(&self) -> &[RegisteredIntent] {
        &self.intents
    }

    pub fn get(&self, name: &str) -> Option<&RegisteredIntent> {
        self.intents.iter().find(|i| i.name() == name)
    }

    /// Registration position of an intent, the final dispatch tie-break.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.intents.iter().position(|i| i.name() == name)
    }

    /// True when some schema in the registry names this label.
    pub fn knows_label(&self, label: &str) -> bool {
        self.known_labels.contains(label)
    }
}
