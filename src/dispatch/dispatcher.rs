use std::cmp::Ordering;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use super::context::ConversationContext;
use super::result::{Clarification, DispatchResult, Resolution, ScoredCandidate};
use crate::config::DispatchConfig;
use crate::registry::rules::tokenize;
use crate::registry::IntentRegistry;
use crate::utterance::{Entity, Utterance};

/// A Clarifying outcome names at most this many candidates.
const MAX_CLARIFY_CANDIDATES: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// Input rejected before any scoring. The only rejection today is
    /// an utterance with no text.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
}

#[derive(Debug)]
struct Scored {
    index: usize,
    confidence: f32,
    recency: Option<usize>,
}

/// Routes utterances to intents. Cheap to clone; the registry is shared.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<IntentRegistry>,
    config: DispatchConfig,
}

impl Dispatcher {
    pub fn new(registry: Arc<IntentRegistry>, config: DispatchConfig) -> Self {
        Self { registry, config }
    }

    pub fn registry(&self) -> &IntentRegistry {
        &self.registry
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// One dispatch pass. Scores every registered intent against the
    /// utterance and supplied entities, ranks the survivors, and emits
    /// exactly one of Resolved / Clarifying / Unrecognized.
    ///
    /// The context is observed (expired, decayed) before scoring, and a
    /// pending clarification is consumed whether or not it changes the
    /// outcome. Same utterance, entities, and context state always
    /// produce the same result.
    pub fn dispatch(
        &self,
        utterance: &Utterance,
        entities: &[Entity],
        context: &mut ConversationContext,
    ) -> Result<DispatchResult, DispatchError> {
        if utterance.text().trim().is_empty() {
            return Err(DispatchError::InvalidInput("utterance text is empty"));
        }
        let now = utterance.timestamp();
        context.observe(now);
        let pending = context.take_pending();

        let known: Vec<Entity> = entities
            .iter()
            .filter(|e| {
                let keep = self.registry.knows_label(&e.label);
                if !keep {
                    warn!(label = %e.label, "dropping entity with unknown label");
                }
                keep
            })
            .cloned()
            .collect();

        let text = utterance.text().to_lowercase();
        let tokens = tokenize(&text);

        let mut candidates: Vec<Scored> = Vec::new();
        for (index, intent) in self.registry.iter().enumerate() {
            let strength = intent.rule_strength(&text, &tokens, &known);
            let mut confidence = self.config.pattern_weight * strength
                + self.config.speech_weight * utterance.confidence();
            if let Some(p) = &pending {
                if p.candidates.iter().any(|c| c == intent.name()) {
                    confidence += self.config.clarify_bias;
                }
            }
            let confidence = confidence.clamp(0.0, 1.0);
            debug!(
                intent = intent.name(),
                strength, confidence, "scored intent"
            );
            if confidence <= self.config.global_floor {
                continue;
            }
            if !intent.schema().satisfied_by(&known) {
                debug!(
                    intent = intent.name(),
                    "candidate dropped, required entities missing"
                );
                continue;
            }
            candidates.push(Scored {
                index,
                confidence,
                recency: context.recency_rank(intent.name()),
            });
        }

        candidates.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(Ordering::Equal)
                .then_with(|| {
                    let ra = a.recency.unwrap_or(usize::MAX);
                    let rb = b.recency.unwrap_or(usize::MAX);
                    ra.cmp(&rb)
                })
                .then_with(|| a.index.cmp(&b.index))
        });

        let Some(best) = candidates.first() else {
            info!("dispatch outcome: unrecognized");
            return Ok(DispatchResult::Unrecognized);
        };
        let winner = &self.registry.as_slice()[best.index];

        if best.confidence >= winner.threshold() {
            let bindings: Vec<Entity> = known
                .iter()
                .filter(|e| winner.schema().knows(&e.label))
                .cloned()
                .collect();
            context.record(utterance, winner.name().to_string(), bindings.clone());
            info!(
                intent = winner.name(),
                confidence = best.confidence,
                "dispatch outcome: resolved"
            );
            return Ok(DispatchResult::Resolved(Resolution {
                intent: winner.name().to_string(),
                bindings,
                confidence: best.confidence,
            }));
        }

        if candidates.len() < 2 {
            info!("dispatch outcome: unrecognized (lone sub-threshold candidate)");
            return Ok(DispatchResult::Unrecognized);
        }

        let top: Vec<ScoredCandidate> = candidates
            .iter()
            .take(MAX_CLARIFY_CANDIDATES)
            .map(|c| ScoredCandidate {
                intent: self.registry.as_slice()[c.index].name().to_string(),
                confidence: c.confidence,
            })
            .collect();
        let names: Vec<String> = top.iter().map(|c| c.intent.clone()).collect();
        context.set_pending(names.clone(), now);
        let prompt = clarify_prompt(&names);
        info!(candidates = names.len(), "dispatch outcome: clarifying");
        Ok(DispatchResult::Clarifying(Clarification {
            candidates: top,
            prompt,
        }))
    }
}

/// "Did you mean send message or make call?"
fn clarify_prompt(names: &[String]) -> String {
    let spoken: Vec<String> = names.iter().map(|n| n.replace('_', " ")).collect();
    format!("Did you mean {}?", spoken.join(" or "))
}
