//! Lead Reply: drafts SDR replies to inbound lead emails.

pub mod config;
pub mod error;
pub mod llm;
pub mod server;
pub mod webhook;
