use serde::{Deserialize, Serialize};

use super::rules::WeightedRule;
use crate::utterance::Entity;

/// Which entity labels must (`required`) or may (`optional`) accompany
/// an intent. Every schema names at least one label overall, so a
/// resolution always has a defined binding surface.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntitySchema {
    #[serde(default)]
    pub required: Vec<String>,
    #[serde(default)]
    pub optional: Vec<String>,
}

impl EntitySchema {
    pub fn required(labels: &[&str]) -> Self {
        Self {
            required: labels.iter().map(|l| l.to_string()).collect(),
            optional: Vec::new(),
        }
    }

    pub fn optional(labels: &[&str]) -> Self {
        Self {
            required: Vec::new(),
            optional: labels.iter().map(|l| l.to_string()).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.required.is_empty() && self.optional.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.required
            .iter()
            .chain(self.optional.iter())
            .map(String::as_str)
    }

    pub fn knows(&self, label: &str) -> bool {
        self.labels().any(|l| l == label)
    }

    /// True when every required label appears among the supplied entities.
    pub fn satisfied_by(&self, entities: &[Entity]) -> bool {
        self.required
            .iter()
            .all(|label| entities.iter().any(|e| &e.label == label))
    }
}

/// One dispatchable intent: a name, the entities it binds, the minimum
/// confidence it needs to resolve outright, and its match rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentDefinition {
    pub name: String,
    pub schema: EntitySchema,
    pub threshold: f32,
    pub rules: Vec<WeightedRule>,
}

/// Serialized registry form, loadable from a JSON file at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    pub intents: Vec<IntentDefinition>,
}
