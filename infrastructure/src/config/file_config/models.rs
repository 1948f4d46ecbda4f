//! Per-persona model configuration from TOML (`[models]` section)

use super::ConfigValidationError;
use duet_domain::Model;
use serde::{Deserialize, Serialize};

/// Per-persona model configuration from TOML
///
/// # Example
///
/// ```toml
/// [models]
/// default = "gemini-2.5-flash"   # both personas
/// logical = "gpt-4.1"            # Cognito only
/// creative = "grok-4"            # Muse only
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileModelsConfig {
    pub default: Option<String>,
    pub logical: Option<String>,
    pub creative: Option<String>,
}

impl FileModelsConfig {
    fn parse_single_model(
        field: &'static str,
        value: Option<&String>,
    ) -> Result<Option<Model>, ConfigValidationError> {
        match value {
            None => Ok(None),
            Some(s) if s.trim().is_empty() => Err(ConfigValidationError::EmptyModelName { field }),
            // Unknown names become Model::Custom
            Some(s) => Ok(s.parse().ok()),
        }
    }

    pub fn parse_default(&self) -> Result<Option<Model>, ConfigValidationError> {
        Self::parse_single_model("default", self.default.as_ref())
    }

    pub fn parse_logical(&self) -> Result<Option<Model>, ConfigValidationError> {
        Self::parse_single_model("logical", self.logical.as_ref())
    }

    pub fn parse_creative(&self) -> Result<Option<Model>, ConfigValidationError> {
        Self::parse_single_model("creative", self.creative.as_ref())
    }
}
