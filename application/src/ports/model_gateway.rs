//! Model Gateway port
//!
//! Defines the uniform call contract behind which concrete model backends live.
//! Backends never fail with `Err`: every outcome, including transport failures,
//! comes back as a [`GatewayResponse`] with `error` populated.

use async_trait::async_trait;
use duet_domain::{InlineAttachment, Model};
use std::sync::Arc;
use thiserror::Error;

/// Errors a backend can report for a single call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Invalid API credentials: {0}")]
    InvalidCredentials(String),

    #[error("Missing API credentials: {0}")]
    MissingCredentials(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Timeout")]
    Timeout,

    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl GatewayError {
    /// Whether this error means credentials are missing or rejected.
    ///
    /// The orchestrator blocks further runs on these until the flag is
    /// cleared externally.
    pub fn is_credential_error(&self) -> bool {
        matches!(
            self,
            GatewayError::InvalidCredentials(_) | GatewayError::MissingCredentials(_)
        )
    }

    /// Classify a provider error from its HTTP status and message.
    pub fn from_provider(status: Option<u16>, message: impl Into<String>) -> Self {
        let message = message.into();
        let lower = message.to_ascii_lowercase();
        let credential_hint = lower.contains("api key not valid")
            || lower.contains("invalid api key")
            || lower.contains("incorrect api key")
            || lower.contains("api_key_invalid");

        match status {
            Some(401) | Some(403) => GatewayError::InvalidCredentials(message),
            _ if credential_hint => GatewayError::InvalidCredentials(message),
            Some(404) => GatewayError::ModelNotAvailable(message),
            Some(408) | Some(504) => GatewayError::Timeout,
            _ => GatewayError::RequestFailed(message),
        }
    }
}

/// One model invocation
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub prompt: String,
    pub model: Model,
    pub system_preamble: Option<String>,
    /// Ask the backend to skip extended reasoning where the model allows it
    pub suppress_extended_reasoning: bool,
    pub attachment: Option<Arc<InlineAttachment>>,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>, model: Model) -> Self {
        Self {
            prompt: prompt.into(),
            model,
            system_preamble: None,
            suppress_extended_reasoning: false,
            attachment: None,
        }
    }

    pub fn with_system_preamble(mut self, preamble: impl Into<String>) -> Self {
        self.system_preamble = Some(preamble.into());
        self
    }

    pub fn with_reasoning_suppressed(mut self, suppress: bool) -> Self {
        self.suppress_extended_reasoning = suppress;
        self
    }

    pub fn with_attachment(mut self, attachment: Option<Arc<InlineAttachment>>) -> Self {
        self.attachment = attachment;
        self
    }
}

/// Outcome of one call. On failure `text` carries a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayResponse {
    pub text: String,
    pub elapsed_ms: u64,
    pub error: Option<GatewayError>,
}

impl GatewayResponse {
    pub fn success(text: impl Into<String>, elapsed_ms: u64) -> Self {
        Self {
            text: text.into(),
            elapsed_ms,
            error: None,
        }
    }

    pub fn failure(error: GatewayError, elapsed_ms: u64) -> Self {
        Self {
            text: error.to_string(),
            elapsed_ms,
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Gateway for model communication
///
/// This port defines how the orchestrator talks to model backends.
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait ModelGateway: Send + Sync {
    /// Generate a complete reply. Must not panic or return early on failure;
    /// report it through [`GatewayResponse::error`] instead.
    async fn generate(&self, request: &GenerationRequest) -> GatewayResponse;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_status_codes() {
        assert!(GatewayError::from_provider(Some(401), "nope").is_credential_error());
        assert!(GatewayError::from_provider(Some(403), "nope").is_credential_error());
        assert_eq!(
            GatewayError::from_provider(Some(404), "no such model"),
            GatewayError::ModelNotAvailable("no such model".to_string())
        );
        assert_eq!(
            GatewayError::from_provider(Some(504), "slow"),
            GatewayError::Timeout
        );
    }

    #[test]
    fn test_classify_credential_message_on_bad_request() {
        let error = GatewayError::from_provider(
            Some(400),
            "API key not valid. Please pass a valid API key.",
        );
        assert!(error.is_credential_error());
    }

    #[test]
    fn test_other_errors_are_not_credential_errors() {
        assert!(!GatewayError::from_provider(Some(500), "boom").is_credential_error());
        assert!(!GatewayError::Timeout.is_credential_error());
        assert!(GatewayError::MissingCredentials("GEMINI_API_KEY".into()).is_credential_error());
    }

    #[test]
    fn test_failure_response_text_is_readable() {
        let response = GatewayResponse::failure(GatewayError::Timeout, 30_000);
        assert_eq!(response.text, "Timeout");
        assert!(!response.is_success());
    }

    #[test]
    fn test_request_builder() {
        let request = GenerationRequest::new("hi", Model::Grok4)
            .with_system_preamble("be brief")
            .with_reasoning_suppressed(true);
        assert_eq!(request.system_preamble.as_deref(), Some("be brief"));
        assert!(request.suppress_extended_reasoning);
        assert!(request.attachment.is_none());
    }
}
