//! Repository for the `user_notification_configs` table.

use qa_relay_core::user_config::UserNotificationConfig;
use sqlx::PgPool;

use crate::models::user_notification_config::UserNotificationConfigRow;

/// Column list for `user_notification_configs` queries.
const COLUMNS: &str = "user_id, webhook_url, inbox_notifications, all_new_questions, \
    new_questions_for_following_tags, created_at, updated_at";

/// Provides CRUD operations for per-user notification settings.
pub struct UserNotificationConfigRepo;

impl UserNotificationConfigRepo {
    /// Find the settings row for a user, if one exists.
    pub async fn find_by_user_id(
        pool: &PgPool,
        user_id: &str,
    ) -> Result<Option<UserNotificationConfigRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM user_notification_configs WHERE user_id = $1");
        sqlx::query_as::<_, UserNotificationConfigRow>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Insert or replace a user's settings.
    ///
    /// Uses `INSERT ... ON CONFLICT (user_id) DO UPDATE` so the whole config
    /// is written in a single round-trip.
    pub async fn upsert(
        pool: &PgPool,
        user_id: &str,
        config: &UserNotificationConfig,
    ) -> Result<UserNotificationConfigRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_notification_configs \
                (user_id, webhook_url, inbox_notifications, all_new_questions, \
                 new_questions_for_following_tags) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (user_id) DO UPDATE SET \
                webhook_url = EXCLUDED.webhook_url, \
                inbox_notifications = EXCLUDED.inbox_notifications, \
                all_new_questions = EXCLUDED.all_new_questions, \
                new_questions_for_following_tags = EXCLUDED.new_questions_for_following_tags, \
                updated_at = NOW() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserNotificationConfigRow>(&query)
            .bind(user_id)
            .bind(&config.webhook_url)
            .bind(config.inbox_notifications)
            .bind(config.all_new_questions)
            .bind(config.new_questions_for_following_tags)
            .fetch_one(pool)
            .await
    }

    /// Delete a user's settings. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, user_id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM user_notification_configs WHERE user_id = $1")
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List every user who opted into broadcast new-question notifications.
    pub async fn list_all_new_question_subscribers(
        pool: &PgPool,
    ) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT user_id FROM user_notification_configs \
             WHERE all_new_questions = true \
             ORDER BY user_id",
        )
        .fetch_all(pool)
        .await
    }
}
