//! Shared HTTP plumbing for the provider adapters.

use duet_application::GatewayError;
use reqwest::{Client, Response};
use serde_json::Value;
use std::time::Duration;
use tracing::warn;

pub(super) fn build_client(timeout: Duration) -> Result<Client, GatewayError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| GatewayError::ConnectionError(e.to_string()))
}

/// Map a transport failure (no HTTP status) to a gateway error.
pub(super) fn send_error(provider: &str, error: reqwest::Error) -> GatewayError {
    if error.is_timeout() {
        GatewayError::Timeout
    } else if error.is_connect() {
        GatewayError::ConnectionError(format!("{}: {}", provider, error))
    } else {
        GatewayError::RequestFailed(format!("{}: {}", provider, error))
    }
}

/// Turn a non-success response into a classified gateway error.
pub(super) async fn status_error(provider: &str, response: Response) -> GatewayError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    warn!(provider, status = %status, body = %body, "{} HTTP error", provider);

    GatewayError::from_provider(
        Some(status.as_u16()),
        format!("{} HTTP {}: {}", provider, status.as_u16(), error_message(&body)),
    )
}

/// Pull a readable message out of a provider error body.
///
/// Handles `{"error": {"message": ...}}`, `{"error": "..."}` and
/// `{"error": {"status": ...}}`; anything else is returned raw.
pub(super) fn error_message(body: &str) -> String {
    let Ok(json) = serde_json::from_str::<Value>(body) else {
        return body.trim().to_string();
    };
    let error = json.get("error");

    error
        .and_then(|e| e.get("message"))
        .and_then(Value::as_str)
        .or_else(|| error.and_then(Value::as_str))
        .or_else(|| error.and_then(|e| e.get("status")).and_then(Value::as_str))
        .map(str::to_string)
        .unwrap_or_else(|| body.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_formats() {
        assert_eq!(
            error_message(r#"{"error": {"code": 400, "message": "API key not valid. Please pass a valid API key.", "status": "INVALID_ARGUMENT"}}"#),
            "API key not valid. Please pass a valid API key."
        );
        assert_eq!(error_message(r#"{"error": "bad model"}"#), "bad model");
        assert_eq!(
            error_message(r#"{"error": {"status": "UNAVAILABLE"}}"#),
            "UNAVAILABLE"
        );
        assert_eq!(error_message("  upstream down "), "upstream down");
    }
}
