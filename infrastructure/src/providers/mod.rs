//! Model provider adapters
//!
//! Each adapter implements the [`ModelGateway`](duet_application::ModelGateway)
//! port over one HTTP API. [`RoutingGateway`] picks the adapter for a request
//! by the model's family.

mod gemini;
mod http;
mod openai_compatible;
mod routing;

pub use gemini::GeminiGateway;
pub use openai_compatible::OpenAiCompatibleGateway;
pub use routing::RoutingGateway;

use crate::config::{FileConfig, ProviderSettings};
use duet_application::GatewayError;
use duet_domain::ModelFamily;
use std::sync::Arc;
use std::time::Duration;

/// Build the routing gateway with one adapter per model family.
pub fn build_gateway(config: &FileConfig) -> Result<RoutingGateway, GatewayError> {
    let timeout = Duration::from_secs(config.behavior.timeout_seconds);
    let client = http::build_client(timeout)?;
    let providers = &config.providers;

    Ok(RoutingGateway::new()
        .with_adapter(
            ModelFamily::Gemini,
            Arc::new(GeminiGateway::new(client.clone(), &providers.gemini())),
        )
        .with_adapter(
            ModelFamily::OpenAi,
            Arc::new(OpenAiCompatibleGateway::new(
                "OpenAI",
                client.clone(),
                &providers.openai(),
            )),
        )
        .with_adapter(
            ModelFamily::Grok,
            Arc::new(OpenAiCompatibleGateway::new("Grok", client, &providers.grok())),
        ))
}

/// API key for a provider, or the error the gateway reports without calling out
fn require_api_key(provider: &str, settings: &ProviderSettings) -> Result<String, GatewayError> {
    settings.resolve_api_key().ok_or_else(|| {
        GatewayError::MissingCredentials(format!(
            "{} API key not set (export {})",
            provider, settings.api_key_env
        ))
    })
}
