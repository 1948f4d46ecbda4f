//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! Values stay as strings where the domain parses them, so one bad field is
//! reported by [`FileConfig::validate`] rather than failing the whole load.

mod discussion;
mod logging;
mod models;
mod output;
mod providers;
mod repl;

pub use discussion::{FileBehaviorConfig, FileDiscussionConfig};
pub use logging::FileLoggingConfig;
pub use models::FileModelsConfig;
pub use output::{FileOutputConfig, FileOutputFormat};
pub use providers::{FileProviderConfig, FileProvidersConfig, ProviderSettings};
pub use repl::FileReplConfig;

use duet_application::RunSettings;
use duet_domain::{DiscussionMode, DomainError, Persona};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors
#[derive(Error, Debug)]
pub enum ConfigValidationError {
    #[error("behavior.timeout_seconds cannot be 0")]
    InvalidTimeout,

    #[error("models.{field}: model name cannot be empty")]
    EmptyModelName { field: &'static str },

    #[error("discussion: {0}")]
    Discussion(#[from] DomainError),
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Debate mode and turn count
    pub discussion: FileDiscussionConfig,
    /// Per-persona model selection
    pub models: FileModelsConfig,
    /// Request behaviour
    pub behavior: FileBehaviorConfig,
    /// API endpoints and credentials
    pub providers: FileProvidersConfig,
    /// Output settings
    pub output: FileOutputConfig,
    /// REPL settings
    pub repl: FileReplConfig,
    /// Diagnostic and conversation log files
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the configuration.
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        self.to_run_settings().map(|_| ())
    }

    /// Build the initial [`RunSettings`] described by this file.
    pub fn to_run_settings(&self) -> Result<RunSettings, ConfigValidationError> {
        if self.behavior.timeout_seconds == 0 {
            return Err(ConfigValidationError::InvalidTimeout);
        }

        let mode: DiscussionMode = self.discussion.mode.parse()?;
        let mut settings = RunSettings::default()
            .with_mode(mode)
            .with_fixed_turns(self.discussion.turns)?
            .with_reasoning_suppressed(self.behavior.suppress_extended_reasoning);

        if let Some(model) = self.models.parse_default()? {
            settings = settings.with_model(model);
        }
        if let Some(model) = self.models.parse_logical()? {
            settings = settings.with_persona_model(Persona::Logical, model);
        }
        if let Some(model) = self.models.parse_creative()? {
            settings = settings.with_persona_model(Persona::Creative, model);
        }

        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use duet_domain::{Model, OutputFormat};

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[discussion]
mode = "agreement"
turns = 4

[models]
default = "gpt-4.1"
creative = "grok-4"

[behavior]
suppress_extended_reasoning = true
timeout_seconds = 60

[providers.grok]
api_key_env = "MY_XAI_KEY"

[output]
format = "full"
color = false

[repl]
show_progress = false

[logging]
conversation_log = "/tmp/duet.jsonl"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.discussion.turns, 4);
        assert_eq!(config.output.format, Some(OutputFormat::Full));
        assert!(!config.output.color);
        assert!(!config.repl.show_progress);
        assert_eq!(config.providers.grok().api_key_env, "MY_XAI_KEY");
        assert_eq!(config.providers.grok().base_url, "https://api.x.ai/v1");
        assert_eq!(
            config.logging.conversation_log.as_deref(),
            Some("/tmp/duet.jsonl")
        );

        let settings = config.to_run_settings().unwrap();
        assert_eq!(settings.mode, DiscussionMode::AgreementDriven);
        assert_eq!(settings.fixed_turns.pairs(), 4);
        assert_eq!(settings.logical_model, Model::Gpt41);
        assert_eq!(settings.creative_model, Model::Grok4);
        assert!(settings.suppress_extended_reasoning);
    }

    #[test]
    fn test_default_config() {
        let config = FileConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.to_run_settings().unwrap(), RunSettings::default());
        assert!(config.output.color);
        assert!(config.repl.show_progress);
    }

    #[test]
    fn test_validate_turns_out_of_range() {
        let config: FileConfig = toml::from_str("[discussion]\nturns = 9\n").unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::Discussion(
                DomainError::InvalidTurnCount { actual: 9, .. }
            ))
        ));
    }

    #[test]
    fn test_validate_unknown_mode() {
        let config: FileConfig = toml::from_str("[discussion]\nmode = \"forever\"\n").unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::Discussion(DomainError::UnknownMode(_)))
        ));
    }

    #[test]
    fn test_validate_zero_timeout() {
        let config: FileConfig = toml::from_str("[behavior]\ntimeout_seconds = 0\n").unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::InvalidTimeout)
        ));
    }

    #[test]
    fn test_validate_empty_model_name() {
        let config: FileConfig = toml::from_str("[models]\nlogical = \"  \"\n").unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::EmptyModelName { field: "logical" })
        ));
    }
}
