//! The inbound notification event emitted by the host application.

use serde::{Deserialize, Serialize};

use crate::notification::EventType;

/// A single notification addressed to one recipient.
///
/// Constructed via [`NotificationEvent::new`] and enriched with the builder
/// methods. Every string field defaults to empty when absent on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationEvent {
    /// What happened, e.g. `"new_question"`.
    #[serde(rename = "type")]
    pub notification_type: EventType,

    /// The user who should receive the notification.
    #[serde(default)]
    pub receiver_user_id: String,

    /// The receiver's interface language, e.g. `"en_US"`.
    #[serde(default)]
    pub receiver_lang: String,

    /// Display name of the user whose action triggered the event.
    #[serde(default)]
    pub trigger_user_display_name: String,

    #[serde(default)]
    pub question_title: String,

    #[serde(default)]
    pub question_url: String,

    /// Comma-separated tag names, e.g. `"rust,tokio"`. May be empty.
    #[serde(default)]
    pub question_tags: String,
}

impl NotificationEvent {
    /// Create an event with only the type and recipient set.
    pub fn new(notification_type: impl Into<EventType>, receiver_user_id: impl Into<String>) -> Self {
        Self {
            notification_type: notification_type.into(),
            receiver_user_id: receiver_user_id.into(),
            receiver_lang: String::new(),
            trigger_user_display_name: String::new(),
            question_title: String::new(),
            question_url: String::new(),
            question_tags: String::new(),
        }
    }

    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.receiver_lang = lang.into();
        self
    }

    pub fn with_trigger_user(mut self, display_name: impl Into<String>) -> Self {
        self.trigger_user_display_name = display_name.into();
        self
    }

    /// Attach the question the event refers to.
    pub fn with_question(mut self, title: impl Into<String>, url: impl Into<String>) -> Self {
        self.question_title = title.into();
        self.question_url = url.into();
        self
    }

    pub fn with_tags(mut self, tags: impl Into<String>) -> Self {
        self.question_tags = tags.into();
        self
    }

    /// The tag list re-joined with `", "` for display.
    ///
    /// Tags are split on `,` and joined back without trimming, so
    /// `"go,rust"` becomes `"go, rust"` and an empty list stays empty.
    pub fn formatted_tags(&self) -> String {
        format_tags(&self.question_tags)
    }
}

/// Re-join a comma-separated tag list with a comma and a space.
pub fn format_tags(tags: &str) -> String {
    tags.split(',').collect::<Vec<_>>().join(", ")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
