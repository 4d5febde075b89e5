//! Single-attempt webhook delivery.
//!
//! [`WebhookDelivery`] POSTs a JSON-encoded [`WebhookPayload`] to a user's
//! webhook URL. A failed attempt is reported to the caller and never
//! retried.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// HTTP request timeout for a single delivery attempt.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

// ---------------------------------------------------------------------------
// Payload
// ---------------------------------------------------------------------------

/// Chat-webhook message body (`{"content": ..., "embeds": [...]}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookPayload {
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub embeds: Vec<Embed>,
}

/// Rich attachment rendered below the message content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Embed {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub color: u32,
}

fn is_zero(value: &u32) -> bool {
    *value == 0
}

impl WebhookPayload {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            embeds: Vec::new(),
        }
    }

    pub fn add_embed(
        mut self,
        title: impl Into<String>,
        description: impl Into<String>,
        color: u32,
    ) -> Self {
        self.embeds.push(Embed {
            title: title.into(),
            description: description.into(),
            color,
        });
        self
    }
}

/// Host part of a webhook URL, safe to log.
///
/// Chat webhook URLs carry their secret token in the path, so logs only
/// ever see the authority.
pub fn webhook_host(url: &str) -> &str {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
    // Drop any userinfo.
    authority.rsplit('@').next().unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for webhook delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    /// The HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    Client(reqwest::Error),

    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The remote server returned a non-2xx status code.
    #[error("Webhook returned HTTP {0}")]
    HttpStatus(u16),
}

// ---------------------------------------------------------------------------
// Transport
// ---------------------------------------------------------------------------

/// "Send this JSON payload to this URL" capability used by the dispatcher.
#[async_trait]
pub trait WebhookTransport: Send + Sync {
    async fn post_json(&self, url: &str, payload: &WebhookPayload) -> Result<(), WebhookError>;
}

// ---------------------------------------------------------------------------
// WebhookDelivery
// ---------------------------------------------------------------------------

/// Delivers payloads to webhook endpoints over `reqwest`.
pub struct WebhookDelivery {
    client: reqwest::Client,
}

impl WebhookDelivery {
    /// Create a delivery service whose requests time out after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, WebhookError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(WebhookError::Client)?;
        Ok(Self { client })
    }

    /// Create a delivery service with [`DEFAULT_REQUEST_TIMEOUT`].
    pub fn with_default_timeout() -> Result<Self, WebhookError> {
        Self::new(DEFAULT_REQUEST_TIMEOUT)
    }
}

#[async_trait]
impl WebhookTransport for WebhookDelivery {
    /// Execute a single POST request and check the response status.
    async fn post_json(&self, url: &str, payload: &WebhookPayload) -> Result<(), WebhookError> {
        let response = self
            .client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .json(payload)
            .send()
            .await
            .map_err(|e| WebhookError::Request(e.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(WebhookError::HttpStatus(status.as_u16()));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
