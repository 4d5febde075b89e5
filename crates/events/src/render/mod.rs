//! Turning a notification event into the text posted to a webhook.
//!
//! Two interchangeable strategies implement [`MessageRenderer`]:
//!
//! - [`FixedFormatRenderer`]: fixed English markdown with an action phrase
//!   per notification type.
//! - [`TemplatedRenderer`]: per-language templates looked up through a
//!   [`Translator`].
//!
//! The deployment picks one via [`RenderStrategy`]. Either way an empty
//! result means "do not deliver".

pub mod fixed;
pub mod templated;
pub mod translator;

use qa_relay_core::error::CoreError;
use qa_relay_core::event::NotificationEvent;
use qa_relay_core::notification::NotificationType;
use serde::{Deserialize, Serialize};

pub use fixed::FixedFormatRenderer;
pub use templated::TemplatedRenderer;
pub use translator::{StaticTranslator, TemplateData, Translator};

/// Default base for user profile links.
pub const DEFAULT_PROFILE_URL_BASE: &str = "https://answer.apps.hexmos.com/users";

/// Renders an event to message text. An empty string suppresses delivery.
pub trait MessageRenderer: Send + Sync {
    fn render(&self, event: &NotificationEvent) -> String;
}

// ---------------------------------------------------------------------------
// RenderStrategy
// ---------------------------------------------------------------------------

/// Which renderer a deployment uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderStrategy {
    #[default]
    Fixed,
    Templated,
}

impl RenderStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fixed => "fixed",
            Self::Templated => "templated",
        }
    }

    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s {
            "fixed" => Ok(Self::Fixed),
            "templated" => Ok(Self::Templated),
            _ => Err(CoreError::Validation(format!(
                "Invalid render strategy: '{s}'. Must be one of: fixed, templated"
            ))),
        }
    }
}

impl std::fmt::Display for RenderStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// The English verb phrase describing what the triggering user did.
pub fn action_phrase(notification_type: NotificationType) -> &'static str {
    match notification_type {
        NotificationType::UpdateQuestion => "updated the question",
        NotificationType::AnswerTheQuestion => "answered your question",
        NotificationType::UpdateAnswer => "updated your answer",
        NotificationType::AcceptAnswer => "accepted your answer",
        NotificationType::CommentQuestion => "commented on your question",
        NotificationType::CommentAnswer => "commented on your answer",
        NotificationType::ReplyToYou => "replied to your comment",
        NotificationType::MentionYou => "mentioned you in a comment",
        NotificationType::InvitedYouToAnswer => "invited you to answer",
        NotificationType::NewQuestion | NotificationType::NewQuestionFollowedTag => {
            "asked a new question"
        }
    }
}

/// Build a profile link by path-escaping `display_name` under `base`.
pub fn profile_url(base: &str, display_name: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        escape_path_segment(display_name)
    )
}

/// Percent-encode one path segment.
///
/// Sub-delimiters that are legal inside a segment (`: @ & = + $`) stay
/// literal; `/ ; , ?` and everything outside the unreserved set are escaped.
pub fn escape_path_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    let mut buf = [0u8; 4];
    for ch in segment.chars() {
        match ch {
            ':' | '@' | '&' | '=' | '+' | '$' => out.push(ch),
            _ => out.push_str(&urlencoding::encode(ch.encode_utf8(&mut buf))),
        }
    }
    out
}

/// Tags to show for an event: reformatted for new-question types, empty
/// for everything else.
pub(crate) fn display_tags(event: &NotificationEvent) -> String {
    match event.notification_type.known() {
        Some(t) if t.is_new_question() => event.formatted_tags(),
        _ => String::new(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
