//! Notification type catalogue and the category table that gates delivery.
//!
//! The host emits events tagged with one of a fixed set of
//! [`NotificationType`]s. Each type belongs to exactly one
//! [`NotificationCategory`], and each category is governed by one boolean
//! flag on the recipient's
//! [`UserNotificationConfig`](crate::user_config::UserNotificationConfig).

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// NotificationType
// ---------------------------------------------------------------------------

/// Every notification type the host application can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    UpdateQuestion,
    AnswerTheQuestion,
    UpdateAnswer,
    AcceptAnswer,
    CommentQuestion,
    CommentAnswer,
    ReplyToYou,
    MentionYou,
    InvitedYouToAnswer,
    NewQuestion,
    NewQuestionFollowedTag,
}

/// All known notification types, in host declaration order.
pub const ALL_NOTIFICATION_TYPES: [NotificationType; 11] = [
    NotificationType::UpdateQuestion,
    NotificationType::AnswerTheQuestion,
    NotificationType::UpdateAnswer,
    NotificationType::AcceptAnswer,
    NotificationType::CommentQuestion,
    NotificationType::CommentAnswer,
    NotificationType::ReplyToYou,
    NotificationType::MentionYou,
    NotificationType::InvitedYouToAnswer,
    NotificationType::NewQuestion,
    NotificationType::NewQuestionFollowedTag,
];

impl NotificationType {
    /// Return the wire-format string for this variant.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UpdateQuestion => "update_question",
            Self::AnswerTheQuestion => "answer_the_question",
            Self::UpdateAnswer => "update_answer",
            Self::AcceptAnswer => "accept_answer",
            Self::CommentQuestion => "comment_question",
            Self::CommentAnswer => "comment_answer",
            Self::ReplyToYou => "reply_to_you",
            Self::MentionYou => "mention_you",
            Self::InvitedYouToAnswer => "invited_you_to_answer",
            Self::NewQuestion => "new_question",
            Self::NewQuestionFollowedTag => "new_question_followed_tag",
        }
    }

    /// Parse from a wire-format string.
    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        ALL_NOTIFICATION_TYPES
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| CoreError::Validation(format!("Unknown notification type: '{s}'")))
    }

    /// The category whose user flag governs delivery of this type.
    ///
    /// This is the only place the type-to-category mapping is defined.
    pub fn category(&self) -> NotificationCategory {
        match self {
            Self::NewQuestion => NotificationCategory::AllNewQuestions,
            Self::NewQuestionFollowedTag => NotificationCategory::FollowedTagQuestions,
            Self::UpdateQuestion
            | Self::AnswerTheQuestion
            | Self::UpdateAnswer
            | Self::AcceptAnswer
            | Self::CommentQuestion
            | Self::CommentAnswer
            | Self::ReplyToYou
            | Self::MentionYou
            | Self::InvitedYouToAnswer => NotificationCategory::Inbox,
        }
    }

    /// Whether this is one of the two new-question types whose tag list is
    /// shown in the rendered message.
    pub fn is_new_question(&self) -> bool {
        matches!(self, Self::NewQuestion | Self::NewQuestionFollowedTag)
    }
}

impl std::fmt::Display for NotificationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// NotificationCategory
// ---------------------------------------------------------------------------

/// Delivery category, each gated by its own per-user flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationCategory {
    /// Every new question on the site (broadcast).
    AllNewQuestions,
    /// New questions carrying a tag the user follows.
    FollowedTagQuestions,
    /// Everything addressed to the user's inbox (catch-all).
    Inbox,
}

impl NotificationCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AllNewQuestions => "all_new_questions",
            Self::FollowedTagQuestions => "followed_tag_questions",
            Self::Inbox => "inbox",
        }
    }
}

impl std::fmt::Display for NotificationCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// EventType
// ---------------------------------------------------------------------------

/// The `type` tag carried by an inbound event.
///
/// Hosts may be newer than this adapter and send types it does not know.
/// Those are kept verbatim rather than rejected: they classify as
/// [`NotificationCategory::Inbox`] and render to nothing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventType {
    Known(NotificationType),
    Unrecognized(String),
}

impl EventType {
    /// The known type, if any.
    pub fn known(&self) -> Option<NotificationType> {
        match self {
            Self::Known(t) => Some(*t),
            Self::Unrecognized(_) => None,
        }
    }

    /// Category used for gating; unrecognized types fall into the inbox.
    pub fn category(&self) -> NotificationCategory {
        match self {
            Self::Known(t) => t.category(),
            Self::Unrecognized(_) => NotificationCategory::Inbox,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Known(t) => t.as_str(),
            Self::Unrecognized(s) => s,
        }
    }
}

impl From<NotificationType> for EventType {
    fn from(t: NotificationType) -> Self {
        Self::Known(t)
    }
}

impl From<String> for EventType {
    fn from(s: String) -> Self {
        match NotificationType::from_str(&s) {
            Ok(t) => Self::Known(t),
            Err(_) => Self::Unrecognized(s),
        }
    }
}

impl From<&str> for EventType {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

impl From<EventType> for String {
    fn from(t: EventType) -> Self {
        match t {
            EventType::Known(t) => t.as_str().to_string(),
            EventType::Unrecognized(s) => s,
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
