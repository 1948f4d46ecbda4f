//! OpenAI-style `chat/completions` adapter.
//!
//! Serves OpenAI itself and any API that copies its wire format (xAI Grok).

use super::http::{send_error, status_error};
use super::require_api_key;
use crate::config::ProviderSettings;
use async_trait::async_trait;
use duet_application::{GatewayError, GatewayResponse, GenerationRequest, ModelGateway};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::time::Instant;
use tracing::debug;

pub struct OpenAiCompatibleGateway {
    provider: &'static str,
    client: Client,
    settings: ProviderSettings,
}

impl OpenAiCompatibleGateway {
    pub fn new(provider: &'static str, client: Client, settings: &ProviderSettings) -> Self {
        Self {
            provider,
            client,
            settings: settings.clone(),
        }
    }

    async fn call(&self, request: &GenerationRequest) -> Result<String, GatewayError> {
        let api_key = require_api_key(self.provider, &self.settings)?;
        let url = format!("{}/chat/completions", self.settings.base_url);

        debug!("POST {}", url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&chat_request(request))
            .send()
            .await
            .map_err(|e| send_error(self.provider, e))?;

        if !response.status().is_success() {
            return Err(status_error(self.provider, response).await);
        }

        let body: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(format!("{}: {}", self.provider, e)))?;

        // A blank reply is still a reply; the parser turns it into a placeholder.
        body.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.unwrap_or_default())
            .ok_or_else(|| {
                GatewayError::InvalidResponse(format!("{}: no choices in response", self.provider))
            })
    }
}

#[async_trait]
impl ModelGateway for OpenAiCompatibleGateway {
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

fn chat_request(request: &GenerationRequest) -> Value {
    let mut messages = Vec::new();
    if let Some(preamble) = &request.system_preamble {
        messages.push(json!({"role": "system", "content": preamble}));
    }

    let user_content = match &request.attachment {
        None => json!(request.prompt),
        Some(attachment) => {
            let attachment_part = if attachment.mime_type.starts_with("image/") {
                json!({"type": "image_url", "image_url": {"url": attachment.data_url()}})
            } else {
                json!({
                    "type": "file",
                    "file": {"filename": attachment.filename, "file_data": attachment.data_url()}
                })
            };
            json!([{"type": "text", "text": request.prompt}, attachment_part])
        }
    };
    messages.push(json!({"role": "user", "content": user_content}));

    let mut body = json!({
        "model": request.model.as_str(),
        "messages": messages,
    });
    if request.suppress_extended_reasoning && request.model.supports_reasoning_toggle() {
        body["reasoning_effort"] = json!("low");
    }
    body
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FileProvidersConfig;
    use duet_application::{DiscussionOrchestrator, RunSettings, SendMessageInput};
    use duet_domain::{Attachment, Model, Speaker};
    use std::sync::Arc;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn gateway(base_url: &str, api_key: Option<&str>) -> OpenAiCompatibleGateway {
        let mut settings = FileProvidersConfig::default().grok();
        settings.base_url = base_url.to_string();
        settings.api_key = api_key.map(str::to_string);
        settings.api_key_env = "DUET_TEST_UNSET_XAI_KEY".to_string();
        OpenAiCompatibleGateway::new("Grok", Client::new(), &settings)
    }

    fn completion(text: &str) -> Value {
        json!({"choices": [{"index": 0, "message": {"role": "assistant", "content": text}}]})
    }

    #[test]
    fn test_chat_request_with_image() {
        let attachment = Attachment::new(vec![1, 2, 3], "image/png", "a.png")
            .encode()
            .unwrap();
        let request = GenerationRequest::new("Describe", Model::Grok3Mini)
            .with_system_preamble("You are Muse.")
            .with_reasoning_suppressed(true)
            .with_attachment(Some(Arc::new(attachment)));

        let body = chat_request(&request);
        assert_eq!(body["model"], "grok-3-mini");
        assert_eq!(body["reasoning_effort"], "low");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"][0]["text"], "Describe");
        assert_eq!(
            body["messages"][1]["content"][1]["image_url"]["url"],
            "data:image/png;base64,AQID"
        );
    }

    #[test]
    fn test_chat_request_plain_text() {
        let request = GenerationRequest::new("Hi", Model::Gpt41).with_reasoning_suppressed(true);
        let body = chat_request(&request);
        assert_eq!(body["messages"][0]["content"], "Hi");
        assert!(body.get("reasoning_effort").is_none());
    }

    #[tokio::test]
    async fn test_generate_returns_first_choice() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer xai-key"))
            .and(body_partial_json(json!({"model": "grok-4"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion("Hello!")))
            .mount(&server)
            .await;

        let response = gateway(&server.uri(), Some("xai-key"))
            .generate(&GenerationRequest::new("Hi", Model::Grok4))
            .await;

        assert!(response.is_success());
        assert_eq!(response.text, "Hello!");
    }

    #[tokio::test]
    async fn test_unauthorized_is_credential_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": {"message": "Incorrect API key provided"}
            })))
            .mount(&server)
            .await;

        let response = gateway(&server.uri(), Some("wrong"))
            .generate(&GenerationRequest::new("Hi", Model::Grok4))
            .await;

        assert!(response.error.as_ref().unwrap().is_credential_error());
        assert!(response.text.contains("Incorrect API key"));
    }

    #[tokio::test]
    async fn test_server_error_is_request_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let response = gateway(&server.uri(), Some("k"))
            .generate(&GenerationRequest::new("Hi", Model::Grok4))
            .await;

        assert!(matches!(response.error, Some(GatewayError::RequestFailed(_))));
    }

    #[tokio::test]
    async fn test_blank_content_is_a_successful_reply() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion("   ")))
            .mount(&server)
            .await;

        let response = gateway(&server.uri(), Some("k"))
            .generate(&GenerationRequest::new("Hi", Model::Grok4))
            .await;

        assert!(response.is_success());
        assert_eq!(response.text, "   ");
    }

    #[tokio::test]
    async fn test_missing_choices_is_invalid_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .mount(&server)
            .await;

        let response = gateway(&server.uri(), Some("k"))
            .generate(&GenerationRequest::new("Hi", Model::Grok4))
            .await;

        assert!(matches!(
            response.error,
            Some(GatewayError::InvalidResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_blank_replies_complete_the_discussion_with_placeholders() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion("   ")))
            .mount(&server)
            .await;

        let orchestrator = DiscussionOrchestrator::new(Arc::new(gateway(&server.uri(), Some("k"))));
        let settings = RunSettings::default()
            .with_model(Model::Grok4)
            .with_fixed_turns(1)
            .unwrap();

        let outcome = orchestrator
            .send_message(SendMessageInput::new("2+2?"), settings)
            .await
            .unwrap();

        let summary = outcome.summary().unwrap();
        assert_eq!(summary.final_answer, "(No additional text.)");
        let transcript = orchestrator.transcript();
        assert_eq!(transcript.len(), 4);
        assert!(
            transcript
                .records()
                .iter()
                .all(|r| r.speaker != Speaker::System)
        );
        assert_eq!(transcript.records()[1].text, "(No additional text.)");
    }
}
