//! Fixed-format English markdown renderer.

use qa_relay_core::event::NotificationEvent;

use super::{action_phrase, display_tags, profile_url, MessageRenderer, DEFAULT_PROFILE_URL_BASE};

/// Renders `[name](profile) <action> [title](url)`, with a `(tags: ...)`
/// suffix on new-question events that carry tags.
#[derive(Debug, Clone)]
pub struct FixedFormatRenderer {
    profile_url_base: String,
}

impl FixedFormatRenderer {
    pub fn new(profile_url_base: impl Into<String>) -> Self {
        Self {
            profile_url_base: profile_url_base.into(),
        }
    }
}

impl Default for FixedFormatRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_PROFILE_URL_BASE)
    }
}

impl MessageRenderer for FixedFormatRenderer {
    fn render(&self, event: &NotificationEvent) -> String {
        let Some(notification_type) = event.notification_type.known() else {
            return String::new();
        };

        let name = &event.trigger_user_display_name;
        let mut message = format!(
            "[{name}]({}) {} [{}]({})",
            profile_url(&self.profile_url_base, name),
            action_phrase(notification_type),
            event.question_title,
            event.question_url,
        );

        let tags = display_tags(event);
        if !tags.is_empty() {
            message.push_str(&format!(" (tags: {tags})"));
        }
        message
    }
}
