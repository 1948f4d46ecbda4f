//! Provider configuration from TOML (`[providers]` section)

use serde::{Deserialize, Serialize};

/// One provider table as written in the file; every field is optional.
///
/// ```toml
/// [providers.grok]
/// api_key_env = "MY_XAI_KEY"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderConfig {
    /// Environment variable holding the API key
    pub api_key_env: Option<String>,
    /// Direct API key (not recommended, use the env var instead)
    pub api_key: Option<String>,
    pub base_url: Option<String>,
}

impl FileProviderConfig {
    fn resolve(&self, api_key_env: &str, base_url: &str) -> ProviderSettings {
        ProviderSettings {
            api_key_env: self
                .api_key_env
                .clone()
                .unwrap_or_else(|| api_key_env.to_string()),
            api_key: self.api_key.clone(),
            base_url: self
                .base_url
                .clone()
                .unwrap_or_else(|| base_url.to_string())
                .trim_end_matches('/')
                .to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProvidersConfig {
    pub gemini: FileProviderConfig,
    pub openai: FileProviderConfig,
    pub grok: FileProviderConfig,
}

impl FileProvidersConfig {
    pub fn gemini(&self) -> ProviderSettings {
        self.gemini.resolve(
            "GEMINI_API_KEY",
            "https://generativelanguage.googleapis.com/v1beta",
        )
    }

    pub fn openai(&self) -> ProviderSettings {
        self.openai
            .resolve("OPENAI_API_KEY", "https://api.openai.com/v1")
    }

    pub fn grok(&self) -> ProviderSettings {
        self.grok.resolve("XAI_API_KEY", "https://api.x.ai/v1")
    }
}

/// A provider table with defaults filled in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSettings {
    pub api_key_env: String,
    pub api_key: Option<String>,
    pub base_url: String,
}

impl ProviderSettings {
    /// Key from the config file, else from the named environment variable
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .filter(|key| !key.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_provider_table_keeps_defaults() {
        let config: FileProvidersConfig = toml::from_str(
            r#"
[grok]
api_key_env = "MY_XAI_KEY"

[openai]
base_url = "https://example.openai.azure.com/v1/"
"#,
        )
        .unwrap();

        let grok = config.grok();
        assert_eq!(grok.api_key_env, "MY_XAI_KEY");
        assert_eq!(grok.base_url, "https://api.x.ai/v1");

        let openai = config.openai();
        assert_eq!(openai.api_key_env, "OPENAI_API_KEY");
        assert_eq!(openai.base_url, "https://example.openai.azure.com/v1");

        assert_eq!(config.gemini().api_key_env, "GEMINI_API_KEY");
    }

    #[test]
    fn test_inline_key_wins() {
        let mut provider = FileProvidersConfig::default().openai();
        provider.api_key_env = "DUET_TEST_UNSET_KEY_VAR".to_string();
        assert_eq!(provider.resolve_api_key(), None);
        provider.api_key = Some("sk-test".to_string());
        assert_eq!(provider.resolve_api_key().as_deref(), Some("sk-test"));
    }
}
