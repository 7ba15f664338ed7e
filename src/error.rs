//! Error types for the lead reply service.

use std::time::Duration;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Top-level error type for the service process.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Completion service errors.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Provider {provider} request failed: {reason}")]
    RequestFailed { provider: String, reason: String },

    #[error("Provider {provider} rate limited: {reason}{}", retry_hint(.retry_after))]
    RateLimited {
        provider: String,
        reason: String,
        retry_after: Option<Duration>,
    },

    #[error("Invalid response from {provider}: {reason}")]
    InvalidResponse { provider: String, reason: String },

    #[error("Authentication failed for provider {provider}: {reason}")]
    AuthFailed { provider: String, reason: String },
}

fn retry_hint(retry_after: &Option<Duration>) -> String {
    match retry_after {
        Some(wait) => format!(" (retry after {}s)", wait.as_secs()),
        None => String::new(),
    }
}

/// Errors surfaced by the webhook endpoint.
///
/// `Client` maps to 400 and never reaches the completion service.
/// `Upstream` maps to 500 and carries the provider failure message.
#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    #[error("{0}")]
    Client(String),

    #[error("{0}")]
    Upstream(#[from] LlmError),
}

impl WebhookError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebhookError::Client(_) => StatusCode::BAD_REQUEST,
            WebhookError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(serde_json::json!({ "detail": self.to_string() }));
        (status, body).into_response()
    }
}

/// Result type alias for the service.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_is_bad_request() {
        let err = WebhookError::Client("Missing required fields".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Missing required fields");
    }

    #[test]
    fn test_upstream_error_keeps_provider_message() {
        let err: WebhookError = LlmError::AuthFailed {
            provider: "openai".to_string(),
            reason: "Incorrect API key provided".to_string(),
        }
        .into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.to_string().contains("Incorrect API key provided"));
    }

    #[test]
    fn test_rate_limited_display_is_readable() {
        let err = LlmError::RateLimited {
            provider: "openai".to_string(),
            reason: "You exceeded your current quota".to_string(),
            retry_after: Some(Duration::from_secs(20)),
        };
        assert_eq!(
            err.to_string(),
            "Provider openai rate limited: You exceeded your current quota (retry after 20s)"
        );

        let err = LlmError::RateLimited {
            provider: "openai".to_string(),
            reason: "Rate limit reached".to_string(),
            retry_after: None,
        };
        assert_eq!(err.to_string(), "Provider openai rate limited: Rate limit reached");
    }

    #[tokio::test]
    async fn test_into_response_has_detail_body() {
        let response = WebhookError::Client("bad".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["detail"], "bad");
    }
}
