//! Google Gemini `generateContent` adapter.

use super::http::{send_error, status_error};
use super::require_api_key;
use crate::config::ProviderSettings;
use async_trait::async_trait;
use duet_application::{GatewayError, GatewayResponse, GenerationRequest, ModelGateway};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

const PROVIDER: &str = "Gemini";

pub struct GeminiGateway {
    client: Client,
    settings: ProviderSettings,
}

impl GeminiGateway {
    pub fn new(client: Client, settings: &ProviderSettings) -> Self {
        Self {
            client,
            settings: settings.clone(),
        }
    }

    async fn call(&self, request: &GenerationRequest) -> Result<String, GatewayError> {
        let api_key = require_api_key(PROVIDER, &self.settings)?;
        // Custom ids may carry the "models/" resource prefix already.
        let model = request.model.as_str().trim_start_matches("models/");
        let url = format!("{}/models/{}:generateContent", self.settings.base_url, model);

        debug!("POST {}", url);
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&GenerateContentRequest::from_request(request))
            .send()
            .await
            .map_err(|e| send_error(PROVIDER, e))?;

        if !response.status().is_success() {
            return Err(status_error(PROVIDER, response).await);
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(format!("{}: {}", PROVIDER, e)))?;
        body.into_text()
    }
}

#[async_trait]
impl ModelGateway for GeminiGateway {
    async fn generate(&self, request: &GenerationRequest) -> GatewayResponse {
        let started = Instant::now();
        let result = self.call(request).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;
        match result {
            Ok(text) => GatewayResponse::success(text, elapsed_ms),
            Err(error) => GatewayResponse::failure(error, elapsed_ms),
        }
    }
}

// ==================== Wire types ====================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

impl GenerateContentRequest {
    fn from_request(request: &GenerationRequest) -> Self {
        let mut parts = Vec::new();
        if let Some(attachment) = &request.attachment {
            parts.push(Part::InlineData {
                inline_data: Blob {
                    mime_type: attachment.mime_type.clone(),
                    data: attachment.base64_data.clone(),
                },
            });
        }
        parts.push(Part::Text {
            text: request.prompt.clone(),
        });

        let generation_config = (request.suppress_extended_reasoning
            && request.model.supports_reasoning_toggle())
        .then_some(GenerationConfig {
            thinking_config: ThinkingConfig { thinking_budget: 0 },
        });

        Self {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts,
            }],
            system_instruction: request.system_preamble.as_ref().map(|preamble| Content {
                role: None,
                parts: vec![Part::Text {
                    text: preamble.clone(),
                }],
            }),
            generation_config,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    #[serde(rename_all = "camelCase")]
    InlineData {
        inline_data: Blob,
    },
    Other(serde_json::Value),
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Blob {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    thinking_config: ThinkingConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ThinkingConfig {
    thinking_budget: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

impl GenerateContentResponse {
    fn into_text(self) -> Result<String, GatewayError> {
        if let Some(reason) = self.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(GatewayError::RequestFailed(format!(
                "{}: prompt blocked ({})",
                PROVIDER, reason
            )));
        }

        let Some(candidate) = self.candidates.into_iter().next() else {
            return Err(GatewayError::InvalidResponse(format!(
                "{}: no candidates in response",
                PROVIDER
            )));
        };

        let text: String = candidate
            .content
            .as_ref()
            .map(|c| c.parts.as_slice())
            .unwrap_or_default()
            .iter()
            .filter_map(|part| match part {
                Part::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect();

        // A blank reply is still a reply; the parser turns it into a placeholder.
        if text.trim().is_empty() {
            debug!(
                "{} returned no text (finish reason: {})",
                PROVIDER,
                candidate.finish_reason.as_deref().unwrap_or("unknown")
            );
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FileProvidersConfig;
    use duet_domain::{Attachment, Model};
    use serde_json::json;
    use std::sync::Arc;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn settings(base_url: &str, api_key: Option<&str>) -> ProviderSettings {
        let mut settings = FileProvidersConfig::default().gemini();
        settings.base_url = base_url.to_string();
        settings.api_key = api_key.map(str::to_string);
        settings.api_key_env = "DUET_TEST_UNSET_GEMINI_KEY".to_string();
        settings
    }

    #[test]
    fn test_request_body_shape() {
        let attachment = Attachment::new(vec![1, 2, 3], "image/png", "a.png")
            .encode()
            .unwrap();
        let request = GenerationRequest::new("Hello", Model::Gemini25Flash)
            .with_system_preamble("You are Cognito.")
            .with_reasoning_suppressed(true)
            .with_attachment(Some(Arc::new(attachment)));

        let body = serde_json::to_value(GenerateContentRequest::from_request(&request)).unwrap();
        assert_eq!(
            body,
            json!({
                "contents": [{
                    "role": "user",
                    "parts": [
                        {"inlineData": {"mimeType": "image/png", "data": "AQID"}},
                        {"text": "Hello"}
                    ]
                }],
                "systemInstruction": {"parts": [{"text": "You are Cognito."}]},
                "generationConfig": {"thinkingConfig": {"thinkingBudget": 0}}
            })
        );
    }

    #[test]
    fn test_thinking_budget_only_for_supporting_models() {
        let request =
            GenerationRequest::new("Hi", Model::Gemini25Pro).with_reasoning_suppressed(true);
        let body = serde_json::to_value(GenerateContentRequest::from_request(&request)).unwrap();
        assert!(body.get("generationConfig").is_none());
    }

    #[tokio::test]
    async fn test_generate_joins_text_parts() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-2.5-flash:generateContent"))
            .and(header("x-goog-api-key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{
                    "content": {"role": "model", "parts": [{"text": "Four"}, {"text": "."}]},
                    "finishReason": "STOP"
                }]
            })))
            .mount(&server)
            .await;

        let gateway = GeminiGateway::new(Client::new(), &settings(&server.uri(), Some("test-key")));
        let response = gateway
            .generate(&GenerationRequest::new("2+2?", Model::Gemini25Flash))
            .await;

        assert!(response.is_success());
        assert_eq!(response.text, "Four.");
    }

    #[tokio::test]
    async fn test_invalid_key_is_credential_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": {"code": 400, "message": "API key not valid. Please pass a valid API key.", "status": "INVALID_ARGUMENT"}
            })))
            .mount(&server)
            .await;

        let gateway = GeminiGateway::new(Client::new(), &settings(&server.uri(), Some("bad")));
        let response = gateway
            .generate(&GenerationRequest::new("hi", Model::Gemini25Flash))
            .await;

        assert!(matches!(
            response.error,
            Some(GatewayError::InvalidCredentials(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_key_never_calls_out() {
        let server = MockServer::start().await;
        let gateway = GeminiGateway::new(Client::new(), &settings(&server.uri(), None));
        let response = gateway
            .generate(&GenerationRequest::new("hi", Model::Gemini25Flash))
            .await;

        assert!(matches!(
            response.error,
            Some(GatewayError::MissingCredentials(_))
        ));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_blocked_prompt_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "promptFeedback": {"blockReason": "SAFETY"}
            })))
            .mount(&server)
            .await;

        let gateway = GeminiGateway::new(Client::new(), &settings(&server.uri(), Some("k")));
        let response = gateway
            .generate(&GenerationRequest::new("hi", Model::Gemini25Flash))
            .await;

        assert!(!response.is_success());
        assert!(response.text.contains("SAFETY"));
    }

    #[tokio::test]
    async fn test_candidate_without_text_is_a_successful_blank_reply() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{"content": {"role": "model", "parts": []}, "finishReason": "STOP"}]
            })))
            .mount(&server)
            .await;

        let gateway = GeminiGateway::new(Client::new(), &settings(&server.uri(), Some("k")));
        let response = gateway
            .generate(&GenerationRequest::new("hi", Model::Gemini25Flash))
            .await;

        assert!(response.is_success());
        assert_eq!(response.text, "");
    }

    #[tokio::test]
    async fn test_no_candidates_is_invalid_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"candidates": []})))
            .mount(&server)
            .await;

        let gateway = GeminiGateway::new(Client::new(), &settings(&server.uri(), Some("k")));
        let response = gateway
            .generate(&GenerationRequest::new("hi", Model::Gemini25Flash))
            .await;

        assert!(matches!(
            response.error,
            Some(GatewayError::InvalidResponse(_))
        ));
    }
}
