//! HTTP endpoints: `POST /webhook` and `GET /health`.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::{info, warn};
use uuid::Uuid;

use super::handler::ReplyGenerator;
use super::model::{WebhookRequest, WebhookResponse};
use crate::error::WebhookError;

/// Shared state for webhook routes.
#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<ReplyGenerator>,
}

/// Build the webhook router.
pub fn webhook_routes(state: AppState) -> Router {
    Router::new()
        .route("/webhook", post(receive_webhook))
        .route("/health", get(health))
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy" }))
}

/// POST /webhook
///
/// The body is read as raw bytes so senders that omit
/// `Content-Type: application/json` are still accepted.
async fn receive_webhook(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<WebhookResponse>, WebhookError> {
    let request_id = Uuid::new_v4();
    info!(
        request_id = %request_id,
        payload = %String::from_utf8_lossy(&body),
        "Received webhook data"
    );

    let result = match WebhookRequest::from_slice(&body) {
        Ok(request) => state.generator.handle(request).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(response) => {
            info!(request_id = %request_id, "Webhook processed");
            Ok(Json(response))
        }
        Err(e @ WebhookError::Client(_)) => {
            warn!(request_id = %request_id, error = %e, "Rejected webhook payload");
            Err(e)
        }
        Err(e) => Err(e),
    }
}
