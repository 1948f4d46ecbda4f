//! The two fixed debate personas.

use serde::{Deserialize, Serialize};

/// One of the two conversational roles (Value Object)
///
/// Display names and preambles are constants; nothing about a persona
/// changes at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Persona {
    /// Cognito: rigorous, structured, opens and closes every run
    Logical,
    /// Muse: imaginative, contrarian, always replies to Cognito
    Creative,
}

impl Persona {
    pub fn display_name(&self) -> &'static str {
        match self {
            Persona::Logical => "Cognito",
            Persona::Creative => "Muse",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Persona::Logical => "logical",
            Persona::Creative => "creative",
        }
    }

    /// The other persona
    pub fn counterpart(&self) -> Persona {
        match self {
            Persona::Logical => Persona::Creative,
            Persona::Creative => Persona::Logical,
        }
    }

    /// System preamble sent with every call made as this persona
    pub fn system_preamble(&self) -> &'static str {
        match self {
            Persona::Logical => {
                r#"You are Cognito, a highly logical AI. You analyse problems rigorously, break them into clear steps, and check every claim for consistency.
You are debating with Muse, a creative AI, in order to give the user the best possible answer.
Challenge Muse's ideas when they lack support, acknowledge good points, and keep the discussion moving towards a concrete, well-reasoned result.
Be concise. Do not repeat what has already been said."#
            }
            Persona::Creative => {
                r#"You are Muse, a highly creative AI. You look for unconventional angles, analogies, and possibilities others overlook.
You are debating with Cognito, a logical AI, in order to give the user the best possible answer.
Question Cognito's assumptions, propose alternatives, and enrich the discussion, while staying relevant to the user's request.
Be concise. Do not repeat what has already been said."#
            }
        }
    }
}

impl std::fmt::Display for Persona {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
