//! Reply generation: validate, pick a persona, call the completion service.

use std::sync::Arc;

use tracing::{error, info};

use super::domain::Domain;
use super::model::{ReplyStatus, ValidatedRequest, WebhookRequest, WebhookResponse};
use crate::error::WebhookError;
use crate::llm::{ChatMessage, CompletionRequest, LlmProvider};

/// Generation parameters sent with every completion request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReplySettings {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for ReplySettings {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 500,
        }
    }
}

/// Stateless reply generator shared by all requests.
pub struct ReplyGenerator {
    llm: Arc<dyn LlmProvider>,
    settings: ReplySettings,
}

impl ReplyGenerator {
    pub fn new(llm: Arc<dyn LlmProvider>, settings: ReplySettings) -> Self {
        Self { llm, settings }
    }

    /// Build the two-message conversation for a lead's email.
    pub fn build_request(&self, domain: Domain, request: &ValidatedRequest) -> CompletionRequest {
        CompletionRequest::new(vec![
            ChatMessage::system(domain.persona_prompt()),
            ChatMessage::user(format!(
                "Email from {}:\n\n{}",
                request.sender_email, request.email_body
            )),
        ])
        .with_temperature(self.settings.temperature)
        .with_max_tokens(self.settings.max_tokens)
    }

    /// Generate a reply for one webhook event.
    ///
    /// Validation failures return before the completion service is called.
    pub async fn handle(&self, request: WebhookRequest) -> Result<WebhookResponse, WebhookError> {
        let request = request.validate()?;
        let domain = Domain::resolve(request.domain.as_deref());

        let completion = self.build_request(domain, &request);
        let response = self.llm.complete(completion).await.map_err(|e| {
            error!(
                sender = %request.sender_email,
                domain = %domain,
                error = %e,
                "Completion call failed"
            );
            WebhookError::Upstream(e)
        })?;

        info!(
            sender = %request.sender_email,
            domain = %domain,
            model = self.llm.model_name(),
            input_tokens = response.input_tokens,
            output_tokens = response.output_tokens,
            cost_usd = %self.llm.estimate_cost(&response),
            "Generated reply"
        );

        Ok(WebhookResponse {
            status: ReplyStatus::Success,
            reply: response.content,
            sender: request.sender_email,
            domain: domain.as_str().to_string(),
        })
    }
}
