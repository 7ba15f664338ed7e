//! Webhook handling: payload types, persona selection, reply generation
//! and the axum routes that expose them.

pub mod domain;
pub mod handler;
pub mod model;
pub mod routes;

pub use domain::Domain;
pub use handler::{ReplyGenerator, ReplySettings};
pub use model::{ReplyStatus, ValidatedRequest, WebhookRequest, WebhookResponse};
pub use routes::{AppState, webhook_routes};
