//! Outbound delivery channels.
//!
//! Only webhooks are supported: one JSON POST per notification, no retry.

pub mod webhook;

pub use webhook::{webhook_host, Embed, WebhookDelivery, WebhookError, WebhookPayload, WebhookTransport};
