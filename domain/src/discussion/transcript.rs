//! Linear discussion transcript

use crate::persona::Persona;
use serde::{Deserialize, Serialize};

/// Who produced a transcript entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    User,
    Persona(Persona),
    System,
}

impl Speaker {
    pub fn display_name(&self) -> &'static str {
        match self {
            Speaker::User => "User",
            Speaker::Persona(p) => p.display_name(),
            Speaker::System => "System",
        }
    }

    pub fn persona(&self) -> Option<Persona> {
        match self {
            Speaker::Persona(p) => Some(*p),
            _ => None,
        }
    }
}

impl From<Persona> for Speaker {
    fn from(persona: Persona) -> Self {
        Speaker::Persona(persona)
    }
}

impl std::fmt::Display for Speaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Why an entry was added
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnPurpose {
    /// The user's query
    Query,
    /// Cognito's opening analysis
    Opening,
    /// A reply inside the debate loop
    Reply,
    /// The synthesized answer to the user
    Final,
    /// A failure surfaced to the user
    Error,
}

impl TurnPurpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnPurpose::Query => "query",
            TurnPurpose::Opening => "opening",
            TurnPurpose::Reply => "reply",
            TurnPurpose::Final => "final",
            TurnPurpose::Error => "error",
        }
    }
}

impl std::fmt::Display for TurnPurpose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One transcript entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRecord {
    pub speaker: Speaker,
    pub purpose: TurnPurpose,
    pub text: String,
    /// Model latency for persona turns
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elapsed_ms: Option<u64>,
    /// Model identifier for persona turns
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Echo of the attachment file name on user entries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment: Option<String>,
}

impl TurnRecord {
    pub fn user(text: impl Into<String>, attachment: Option<String>) -> Self {
        Self {
            speaker: Speaker::User,
            purpose: TurnPurpose::Query,
            text: text.into(),
            elapsed_ms: None,
            model: None,
            attachment,
        }
    }

    pub fn persona(
        persona: Persona,
        purpose: TurnPurpose,
        text: impl Into<String>,
        model: impl Into<String>,
        elapsed_ms: u64,
    ) -> Self {
        Self {
            speaker: Speaker::Persona(persona),
            purpose,
            text: text.into(),
            elapsed_ms: Some(elapsed_ms),
            model: Some(model.into()),
            attachment: None,
        }
    }

    pub fn system_error(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::System,
            purpose: TurnPurpose::Error,
            text: text.into(),
            elapsed_ms: None,
            model: None,
            attachment: None,
        }
    }

    /// Whether a persona (not the user or system) produced this entry
    pub fn is_persona_turn(&self) -> bool {
        matches!(self.speaker, Speaker::Persona(_))
    }
}

/// Append-only sequence of turn records for one conversation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    records: Vec<TurnRecord>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: TurnRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[TurnRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn last(&self) -> Option<&TurnRecord> {
        self.records.last()
    }

    /// Number of entries produced by personas
    pub fn persona_turn_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_persona_turn()).count()
    }

    /// Drop every entry (conversation reset)
    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Render the discussion as prompt context, one `Speaker: text` block per entry.
    ///
    /// System entries are left out: they describe failures of earlier runs,
    /// not anything either persona said.
    pub fn render(&self) -> String {
        self.records
            .iter()
            .filter(|r| r.speaker != Speaker::System)
            .map(|r| format!("{}: {}", r.speaker.display_name(), r.text))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
