//! Model value object representing an LLM model

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Backend family a model is served by.
///
/// The gateway layer routes requests by family; the orchestrator never
/// looks at it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelFamily {
    Gemini,
    Grok,
    OpenAi,
}

impl ModelFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelFamily::Gemini => "gemini",
            ModelFamily::Grok => "grok",
            ModelFamily::OpenAi => "openai",
        }
    }
}

impl std::fmt::Display for ModelFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Available LLM models (Value Object)
///
/// Either persona can be backed by any of these. Unknown identifiers are kept
/// verbatim as [`Model::Custom`] and classified by prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Model {
    // Gemini models
    Gemini25Flash,
    Gemini25Pro,
    Gemini20Flash,
    // Grok models
    Grok4,
    Grok3Mini,
    // OpenAI models
    Gpt41,
    Gpt4oMini,
    O4Mini,
    // Custom
    Custom(String),
}

impl Model {
    /// Get the string identifier for this model
    pub fn as_str(&self) -> &str {
        match self {
            Model::Gemini25Flash => "gemini-2.5-flash",
            Model::Gemini25Pro => "gemini-2.5-pro",
            Model::Gemini20Flash => "gemini-2.0-flash",
            Model::Grok4 => "grok-4",
            Model::Grok3Mini => "grok-3-mini",
            Model::Gpt41 => "gpt-4.1",
            Model::Gpt4oMini => "gpt-4o-mini",
            Model::O4Mini => "o4-mini",
            Model::Custom(s) => s,
        }
    }

    /// All built-in models, for listings.
    pub fn known_models() -> Vec<Model> {
        vec![
            Model::Gemini25Flash,
            Model::Gemini25Pro,
            Model::Gemini20Flash,
            Model::Grok4,
            Model::Grok3Mini,
            Model::Gpt41,
            Model::Gpt4oMini,
            Model::O4Mini,
        ]
    }

    /// Backend family serving this model
    pub fn family(&self) -> ModelFamily {
        match self {
            Model::Gemini25Flash | Model::Gemini25Pro | Model::Gemini20Flash => ModelFamily::Gemini,
            Model::Grok4 | Model::Grok3Mini => ModelFamily::Grok,
            Model::Gpt41 | Model::Gpt4oMini | Model::O4Mini => ModelFamily::OpenAi,
            Model::Custom(s) => {
                let lower = s.to_ascii_lowercase();
                if lower.starts_with("gemini") || lower.starts_with("models/gemini") {
                    ModelFamily::Gemini
                } else if lower.starts_with("grok") {
                    ModelFamily::Grok
                } else {
                    ModelFamily::OpenAi
                }
            }
        }
    }

    /// Check if this is a Gemini model
    pub fn is_gemini(&self) -> bool {
        self.family() == ModelFamily::Gemini
    }

    /// Check if this is a Grok model
    pub fn is_grok(&self) -> bool {
        self.family() == ModelFamily::Grok
    }

    /// Whether the backend accepts a request to skip extended reasoning.
    ///
    /// Models outside this list either never reason or refuse to disable it,
    /// so the toggle is silently ignored for them.
    pub fn supports_reasoning_toggle(&self) -> bool {
        matches!(self, Model::Gemini25Flash | Model::Grok3Mini | Model::O4Mini)
    }
}

impl Default for Model {
    /// Returns the default model (Gemini 2.5 Flash)
    fn default() -> Self {
        Model::Gemini25Flash
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Model {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s.trim() {
            "gemini-2.5-flash" => Model::Gemini25Flash,
            "gemini-2.5-pro" => Model::Gemini25Pro,
            "gemini-2.0-flash" => Model::Gemini20Flash,
            "grok-4" => Model::Grok4,
            "grok-3-mini" => Model::Grok3Mini,
            "gpt-4.1" => Model::Gpt41,
            "gpt-4o-mini" => Model::Gpt4oMini,
            "o4-mini" => Model::O4Mini,
            other => Model::Custom(other.to_string()),
        })
    }
}

impl Serialize for Model {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Model {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.parse() {
            Ok(model) => Ok(model),
            Err(never) => match never {},
        }
    }
}
