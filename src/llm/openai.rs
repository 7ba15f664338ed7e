//! OpenAI-compatible chat completions client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::RETRY_AFTER;
use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::costs;
use super::provider::{ChatMessage, CompletionRequest, CompletionResponse, FinishReason, LlmProvider};
use crate::error::LlmError;

const PROVIDER: &str = "openai";

/// Talks to `{base_url}/chat/completions` with bearer auth.
pub struct OpenAiProvider {
    client: reqwest::Client,
    api_key: SecretString,
    model: String,
    endpoint: String,
}

impl OpenAiProvider {
    pub fn new(
        api_key: SecretString,
        model: impl Into<String>,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::RequestFailed {
                provider: PROVIDER.to_string(),
                reason: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            api_key,
            model: model.into(),
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
        })
    }
}

#[derive(Serialize)]
struct ChatCompletionBody<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Deserialize)]
struct ChatCompletionReply {
    id: Option<String>,
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize, Default)]
struct Usage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Extract the first choice's text from a chat completions body.
fn parse_completion(body: &[u8]) -> Result<CompletionResponse, LlmError> {
    let reply: ChatCompletionReply =
        serde_json::from_slice(body).map_err(|e| LlmError::InvalidResponse {
            provider: PROVIDER.to_string(),
            reason: format!("Malformed completion body: {}", e),
        })?;

    let choice = reply
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| LlmError::InvalidResponse {
            provider: PROVIDER.to_string(),
            reason: "Response contained no choices".to_string(),
        })?;

    let content = choice
        .message
        .content
        .ok_or_else(|| LlmError::InvalidResponse {
            provider: PROVIDER.to_string(),
            reason: "First choice has no message content".to_string(),
        })?;

    let usage = reply.usage.unwrap_or_default();

    Ok(CompletionResponse {
        content,
        input_tokens: usage.prompt_tokens,
        output_tokens: usage.completion_tokens,
        finish_reason: FinishReason::from_api(choice.finish_reason.as_deref()),
        response_id: reply.id,
    })
}

/// Human-readable message for a non-2xx response.
fn error_message(body: &str) -> String {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) => parsed.error.message,
        Err(_) if body.trim().is_empty() => "empty response body".to_string(),
        Err(_) => body.trim().to_string(),
    }
}

fn status_error(status: StatusCode, retry_after: Option<Duration>, body: &str) -> LlmError {
    let message = error_message(body);
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => LlmError::AuthFailed {
            provider: PROVIDER.to_string(),
            reason: message,
        },
        StatusCode::TOO_MANY_REQUESTS => LlmError::RateLimited {
            provider: PROVIDER.to_string(),
            reason: message,
            retry_after,
        },
        _ => LlmError::RequestFailed {
            provider: PROVIDER.to_string(),
            reason: format!("HTTP {}: {}", status.as_u16(), message),
        },
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn model_name(&self) -> &str {
        &self.model
    }

    fn cost_per_token(&self) -> (Decimal, Decimal) {
        costs::model_cost(&self.model)
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let body = ChatCompletionBody {
            model: &self.model,
            messages: &request.messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        debug!(
            model = %self.model,
            messages = request.messages.len(),
            "Sending chat completion request"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::RequestFailed {
                provider: PROVIDER.to_string(),
                reason: if e.is_timeout() {
                    format!("Request timed out: {}", e)
                } else {
                    format!("Failed to contact completion service: {}", e)
                },
            })?;

        let status = response.status();
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(Duration::from_secs);

        let bytes = response
            .bytes()
            .await
            .map_err(|e| LlmError::RequestFailed {
                provider: PROVIDER.to_string(),
                reason: format!("Failed to read response: {}", e),
            })?;

        if !status.is_success() {
            return Err(status_error(
                status,
                retry_after,
                &String::from_utf8_lossy(&bytes),
            ));
        }

        parse_completion(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WebhookError;

    #[test]
    fn test_parse_first_choice() {
        let body = br#"{
            "id": "chatcmpl-123",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "Thanks for reaching out!"}, "finish_reason": "stop"},
                {"index": 1, "message": {"role": "assistant", "content": "ignored"}, "finish_reason": "stop"}
            ],
            "usage": {"prompt_tokens": 42, "completion_tokens": 7, "total_tokens": 49}
        }"#;
        let parsed = parse_completion(body).unwrap();
        assert_eq!(parsed.content, "Thanks for reaching out!");
        assert_eq!(parsed.input_tokens, 42);
        assert_eq!(parsed.output_tokens, 7);
        assert_eq!(parsed.finish_reason, FinishReason::Stop);
        assert_eq!(parsed.response_id.as_deref(), Some("chatcmpl-123"));
    }

    #[test]
    fn test_parse_without_usage() {
        let body = br#"{"choices": [{"message": {"content": "hi"}, "finish_reason": "length"}]}"#;
        let parsed = parse_completion(body).unwrap();
        assert_eq!(parsed.input_tokens, 0);
        assert_eq!(parsed.finish_reason, FinishReason::Length);
    }

    #[test]
    fn test_parse_empty_choices_is_invalid() {
        let err = parse_completion(br#"{"choices": []}"#).unwrap_err();
        assert!(matches!(err, LlmError::InvalidResponse { .. }));
    }

    #[test]
    fn test_parse_null_content_is_invalid() {
        let body = br#"{"choices": [{"message": {"content": null}, "finish_reason": "stop"}]}"#;
        assert!(matches!(
            parse_completion(body).unwrap_err(),
            LlmError::InvalidResponse { .. }
        ));
    }

    #[test]
    fn test_parse_garbage_is_invalid() {
        assert!(matches!(
            parse_completion(b"<html>bad gateway</html>").unwrap_err(),
            LlmError::InvalidResponse { .. }
        ));
    }

    #[test]
    fn test_status_error_mapping() {
        let body = r#"{"error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}}"#;
        match status_error(StatusCode::UNAUTHORIZED, None, body) {
            LlmError::AuthFailed { reason, .. } => assert_eq!(reason, "Incorrect API key provided"),
            other => panic!("expected AuthFailed, got {:?}", other),
        }

        match status_error(StatusCode::TOO_MANY_REQUESTS, Some(Duration::from_secs(3)), "") {
            LlmError::RateLimited { retry_after, .. } => {
                assert_eq!(retry_after, Some(Duration::from_secs(3)))
            }
            other => panic!("expected RateLimited, got {:?}", other),
        }

        let quota = r#"{"error": {"message": "You exceeded your current quota, please check your plan and billing details.", "type": "insufficient_quota"}}"#;
        let err = WebhookError::from(status_error(StatusCode::TOO_MANY_REQUESTS, None, quota));
        let detail = err.to_string();
        assert!(detail.contains("exceeded your current quota"), "detail: {detail}");
        assert!(!detail.contains("None"), "detail: {detail}");

        match status_error(StatusCode::BAD_GATEWAY, None, "upstream down") {
            LlmError::RequestFailed { reason, .. } => assert_eq!(reason, "HTTP 502: upstream down"),
            other => panic!("expected RequestFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_endpoint_strips_trailing_slash() {
        let provider = OpenAiProvider::new(
            SecretString::from("sk-test"),
            "gpt-4",
            "http://localhost:1234/v1/",
            Duration::from_secs(1),
        )
        .unwrap();
        assert_eq!(provider.endpoint, "http://localhost:1234/v1/chat/completions");
        assert_eq!(provider.model_name(), "gpt-4");
    }
}
