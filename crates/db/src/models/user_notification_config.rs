//! User notification config entity model.

use qa_relay_core::types::Timestamp;
use qa_relay_core::user_config::UserNotificationConfig;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `user_notification_configs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserNotificationConfigRow {
    pub user_id: String,
    pub webhook_url: String,
    pub inbox_notifications: bool,
    pub all_new_questions: bool,
    pub new_questions_for_following_tags: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<UserNotificationConfigRow> for UserNotificationConfig {
    fn from(row: UserNotificationConfigRow) -> Self {
        Self {
            webhook_url: row.webhook_url,
            inbox_notifications: row.inbox_notifications,
            all_new_questions: row.all_new_questions,
            new_questions_for_following_tags: row.new_questions_for_following_tags,
        }
    }
}
