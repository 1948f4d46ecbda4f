//! Per-run settings.
//!
//! [`RunSettings`] is passed by value into
//! [`DiscussionOrchestrator::send_message`](crate::DiscussionOrchestrator::send_message).
//! The caller may keep mutating its own copy (REPL commands like `/mode`,
//! `/turns`); an in-flight run keeps the values it started with.

use duet_domain::{DiscussionMode, DomainError, Model, Persona, TurnBudget};
use serde::{Deserialize, Serialize};

/// Settings captured at the start of one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSettings {
    pub mode: DiscussionMode,
    /// Exchange pairs for fixed-turn mode
    #[serde(with = "turn_budget_pairs")]
    pub fixed_turns: TurnBudget,
    pub logical_model: Model,
    pub creative_model: Model,
    pub suppress_extended_reasoning: bool,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            mode: DiscussionMode::default(),
            fixed_turns: TurnBudget::default(),
            logical_model: Model::default(),
            creative_model: Model::default(),
            suppress_extended_reasoning: false,
        }
    }
}

impl RunSettings {
    /// Model backing the given persona
    pub fn model_for(&self, persona: Persona) -> &Model {
        match persona {
            Persona::Logical => &self.logical_model,
            Persona::Creative => &self.creative_model,
        }
    }

    // ==================== Builder Methods ====================

    pub fn with_mode(mut self, mode: DiscussionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_fixed_turns(mut self, pairs: u8) -> Result<Self, DomainError> {
        self.fixed_turns = TurnBudget::fixed(pairs)?;
        Ok(self)
    }

    /// Use the same model for both personas
    pub fn with_model(mut self, model: Model) -> Self {
        self.logical_model = model.clone();
        self.creative_model = model;
        self
    }

    pub fn with_persona_model(mut self, persona: Persona, model: Model) -> Self {
        match persona {
            Persona::Logical => self.logical_model = model,
            Persona::Creative => self.creative_model = model,
        }
        self
    }

    pub fn with_reasoning_suppressed(mut self, suppress: bool) -> Self {
        self.suppress_extended_reasoning = suppress;
        self
    }
}

mod turn_budget_pairs {
    use duet_domain::TurnBudget;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(budget: &TurnBudget, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u8(budget.pairs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<TurnBudget, D::Error> {
        let pairs = u8::deserialize(d)?;
        TurnBudget::fixed(pairs).map_err(serde::de::Error::custom)
    }
}
