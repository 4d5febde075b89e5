//! Per-user notification preferences and their validation.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::notification::NotificationCategory;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum length of a webhook URL in bytes.
pub const MAX_WEBHOOK_URL_LENGTH: usize = 2048;

// ---------------------------------------------------------------------------
// UserNotificationConfig
// ---------------------------------------------------------------------------

/// A recipient's webhook target and the categories they opted into.
///
/// An empty `webhook_url` means "not configured". A config with every flag
/// off is inert but still a valid, cacheable answer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserNotificationConfig {
    #[serde(default)]
    pub webhook_url: String,
    #[serde(default)]
    pub inbox_notifications: bool,
    #[serde(default)]
    pub all_new_questions: bool,
    #[serde(default)]
    pub new_questions_for_following_tags: bool,
}

impl UserNotificationConfig {
    pub fn new(webhook_url: impl Into<String>) -> Self {
        Self {
            webhook_url: webhook_url.into(),
            ..Default::default()
        }
    }

    pub fn with_inbox(mut self, enabled: bool) -> Self {
        self.inbox_notifications = enabled;
        self
    }

    pub fn with_all_new_questions(mut self, enabled: bool) -> Self {
        self.all_new_questions = enabled;
        self
    }

    pub fn with_followed_tags(mut self, enabled: bool) -> Self {
        self.new_questions_for_following_tags = enabled;
        self
    }

    /// The flag governing `category`.
    pub fn allows(&self, category: NotificationCategory) -> bool {
        match category {
            NotificationCategory::AllNewQuestions => self.all_new_questions,
            NotificationCategory::FollowedTagQuestions => self.new_questions_for_following_tags,
            NotificationCategory::Inbox => self.inbox_notifications,
        }
    }

    pub fn has_webhook(&self) -> bool {
        !self.webhook_url.is_empty()
    }

    /// True when no category is enabled, so nothing will ever be delivered.
    pub fn is_inert(&self) -> bool {
        !self.inbox_notifications && !self.all_new_questions && !self.new_questions_for_following_tags
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a webhook URL submitted by a user.
///
/// Empty is allowed (clears the target). Otherwise the URL must use
/// `http` or `https`, have a non-empty host, and fit the length limit.
pub fn validate_webhook_url(url: &str) -> Result<(), CoreError> {
    if url.is_empty() {
        return Ok(());
    }
    if url.len() > MAX_WEBHOOK_URL_LENGTH {
        return Err(CoreError::Validation(format!(
            "Webhook URL exceeds maximum length of {MAX_WEBHOOK_URL_LENGTH} characters"
        )));
    }
    if url.chars().any(char::is_whitespace) {
        return Err(CoreError::Validation(
            "Webhook URL must not contain whitespace".to_string(),
        ));
    }

    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .ok_or_else(|| {
            CoreError::Validation("Webhook URL must start with http:// or https://".to_string())
        })?;

    let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
    if host.is_empty() {
        return Err(CoreError::Validation(
            "Webhook URL must include a host".to_string(),
        ));
    }
    Ok(())
}

/// Validate a full config before it is persisted.
pub fn validate_user_config(config: &UserNotificationConfig) -> Result<(), CoreError> {
    validate_webhook_url(&config.webhook_url)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_inert_and_unconfigured() {
        let config = UserNotificationConfig::default();
        assert!(config.is_inert());
        assert!(!config.has_webhook());
    }

    #[test]
    fn allows_maps_each_category_to_its_flag() {
        let config = UserNotificationConfig::new("https://hook")
            .with_all_new_questions(true);
        assert!(config.allows(NotificationCategory::AllNewQuestions));
        assert!(!config.allows(NotificationCategory::FollowedTagQuestions));
        assert!(!config.allows(NotificationCategory::Inbox));

        let config = UserNotificationConfig::new("https://hook").with_followed_tags(true);
        assert!(config.allows(NotificationCategory::FollowedTagQuestions));

        let config = UserNotificationConfig::new("https://hook").with_inbox(true);
        assert!(config.allows(NotificationCategory::Inbox));
        assert!(!config.is_inert());
    }

    #[test]
    fn deserializes_partial_json_with_defaults() {
        let config: UserNotificationConfig =
            serde_json::from_str(r#"{"webhook_url":"https://hook","all_new_questions":true}"#)
                .unwrap();
        assert_eq!(config.webhook_url, "https://hook");
        assert!(config.all_new_questions);
        assert!(!config.inbox_notifications);
    }

    #[test]
    fn empty_webhook_url_is_valid() {
        assert!(validate_webhook_url("").is_ok());
    }

    #[test]
    fn https_and_http_urls_are_valid() {
        assert!(validate_webhook_url("https://discord.com/api/webhooks/1/abc").is_ok());
        assert!(validate_webhook_url("http://localhost:8080/hook").is_ok());
    }

    #[test]
    fn non_http_scheme_rejects() {
        assert!(validate_webhook_url("ftp://example.com/hook").is_err());
        assert!(validate_webhook_url("discord.com/api/webhooks").is_err());
    }

    #[test]
    fn missing_host_rejects() {
        assert!(validate_webhook_url("https://").is_err());
        assert!(validate_webhook_url("https:///path").is_err());
    }

    #[test]
    fn whitespace_rejects() {
        assert!(validate_webhook_url("https://example.com/a b").is_err());
    }

    #[test]
    fn too_long_url_rejects() {
        let long = format!("https://example.com/{}", "a".repeat(MAX_WEBHOOK_URL_LENGTH));
        assert!(validate_webhook_url(&long).is_err());
    }
}
