//! Webhook payload and response types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::WebhookError;

/// Inbound email event posted by the automation platform.
///
/// Fields are optional here so that a missing key and an empty string are
/// both reported the same way by [`WebhookRequest::validate`]. Unknown keys
/// in the payload are ignored.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct WebhookRequest {
    #[serde(default)]
    pub email_body: Option<String>,
    #[serde(default)]
    pub sender_email: Option<String>,
    #[serde(default)]
    pub domain: Option<String>,
}

/// A request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRequest {
    pub email_body: String,
    pub sender_email: String,
    pub domain: Option<String>,
}

impl WebhookRequest {
    pub fn new(email_body: impl Into<String>, sender_email: impl Into<String>) -> Self {
        Self {
            email_body: Some(email_body.into()),
            sender_email: Some(sender_email.into()),
            domain: None,
        }
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Parse a raw request body. Only a JSON object is accepted; serde would
    /// otherwise fill the struct positionally from an array.
    pub fn from_slice(body: &[u8]) -> Result<Self, WebhookError> {
        let object: Map<String, Value> = serde_json::from_slice(body).map_err(|e| {
            WebhookError::Client(format!("Payload must be a JSON object: {}", e))
        })?;
        serde_json::from_value(Value::Object(object))
            .map_err(|e| WebhookError::Client(format!("Invalid JSON payload: {}", e)))
    }

    /// Require non-empty `email_body` and `sender_email`.
    pub fn validate(self) -> Result<ValidatedRequest, WebhookError> {
        match (self.email_body, self.sender_email) {
            (Some(email_body), Some(sender_email))
                if !email_body.is_empty() && !sender_email.is_empty() =>
            {
                Ok(ValidatedRequest {
                    email_body,
                    sender_email,
                    domain: self.domain,
                })
            }
            _ => Err(WebhookError::Client("Missing required fields".to_string())),
        }
    }
}

/// Outcome marker in a successful response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplyStatus {
    Success,
}

/// Generated reply returned to the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookResponse {
    pub status: ReplyStatus,
    pub reply: String,
    pub sender: String,
    pub domain: String,
}
