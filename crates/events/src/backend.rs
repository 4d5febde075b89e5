//! Settings backends that persist per-user notification configs.
//!
//! [`UserConfigBackend`] is the seam between the engine and whatever storage
//! the host provides. Two implementations ship with the crate:
//!
//! - [`PgUserConfigBackend`]: PostgreSQL via [`UserNotificationConfigRepo`].
//! - [`MemoryUserConfigBackend`]: a process-local map, for hosts without a
//!   database and for tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use qa_relay_core::user_config::UserNotificationConfig;
use qa_relay_db::repositories::UserNotificationConfigRepo;
use qa_relay_db::DbPool;
use tokio::sync::RwLock;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for settings backend failures.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The database query failed.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The backend could not be reached or refused the request.
    #[error("Backend unavailable: {0}")]
    Unavailable(String),
}

// ---------------------------------------------------------------------------
// UserConfigBackend
// ---------------------------------------------------------------------------

/// Persistent storage for per-user notification configs.
#[async_trait]
pub trait UserConfigBackend: Send + Sync {
    /// Load a user's config. `Ok(None)` means the user never saved one.
    async fn load_user_config(
        &self,
        user_id: &str,
    ) -> Result<Option<UserNotificationConfig>, BackendError>;

    /// Persist a user's config, returning what was stored.
    async fn save_user_config(
        &self,
        user_id: &str,
        config: &UserNotificationConfig,
    ) -> Result<UserNotificationConfig, BackendError>;

    /// Every user with `all_new_questions` enabled, sorted by id.
    async fn list_all_new_question_subscribers(&self) -> Result<Vec<String>, BackendError>;
}

// ---------------------------------------------------------------------------
// PgUserConfigBackend
// ---------------------------------------------------------------------------

/// Backend over the `user_notification_configs` table.
pub struct PgUserConfigBackend {
    pool: DbPool,
}

impl PgUserConfigBackend {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserConfigBackend for PgUserConfigBackend {
    async fn load_user_config(
        &self,
        user_id: &str,
    ) -> Result<Option<UserNotificationConfig>, BackendError> {
        let row = UserNotificationConfigRepo::find_by_user_id(&self.pool, user_id).await?;
        Ok(row.map(Into::into))
    }

    async fn save_user_config(
        &self,
        user_id: &str,
        config: &UserNotificationConfig,
    ) -> Result<UserNotificationConfig, BackendError> {
        let row = UserNotificationConfigRepo::upsert(&self.pool, user_id, config).await?;
        Ok(row.into())
    }

    async fn list_all_new_question_subscribers(&self) -> Result<Vec<String>, BackendError> {
        Ok(UserNotificationConfigRepo::list_all_new_question_subscribers(&self.pool).await?)
    }
}

// ---------------------------------------------------------------------------
// MemoryUserConfigBackend
// ---------------------------------------------------------------------------

/// In-memory backend.
///
/// Counts loads so callers can observe how often the cache in front of it
/// actually misses.
#[derive(Default)]
pub struct MemoryUserConfigBackend {
    configs: RwLock<HashMap<String, UserNotificationConfig>>,
    loads: AtomicUsize,
}

impl MemoryUserConfigBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the backend with an initial set of configs.
    pub fn with_configs<I, K>(configs: I) -> Self
    where
        I: IntoIterator<Item = (K, UserNotificationConfig)>,
        K: Into<String>,
    {
        let map = configs.into_iter().map(|(k, v)| (k.into(), v)).collect();
        Self {
            configs: RwLock::new(map),
            loads: AtomicUsize::new(0),
        }
    }

    /// Number of `load_user_config` calls served so far.
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UserConfigBackend for MemoryUserConfigBackend {
    async fn load_user_config(
        &self,
        user_id: &str,
    ) -> Result<Option<UserNotificationConfig>, BackendError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        Ok(self.configs.read().await.get(user_id).cloned())
    }

    async fn save_user_config(
        &self,
        user_id: &str,
        config: &UserNotificationConfig,
    ) -> Result<UserNotificationConfig, BackendError> {
        self.configs
            .write()
            .await
            .insert(user_id.to_string(), config.clone());
        Ok(config.clone())
    }

    async fn list_all_new_question_subscribers(&self) -> Result<Vec<String>, BackendError> {
        let mut ids: Vec<String> = self
            .configs
            .read()
            .await
            .iter()
            .filter(|(_, c)| c.all_new_questions)
            .map(|(id, _)| id.clone())
            .collect();
        ids.sort();
        Ok(ids)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_backend_load_missing_returns_none() {
        let backend = MemoryUserConfigBackend::new();
        assert!(backend.load_user_config("u1").await.unwrap().is_none());
        assert_eq!(backend.load_count(), 1);
    }

    #[tokio::test]
    async fn memory_backend_save_then_load() {
        let backend = MemoryUserConfigBackend::new();
        let config = UserNotificationConfig::new("https://hook").with_inbox(true);

        let saved = backend.save_user_config("u1", &config).await.unwrap();
        assert_eq!(saved, config);
        assert_eq!(backend.load_user_config("u1").await.unwrap(), Some(config));
    }

    #[tokio::test]
    async fn memory_backend_lists_subscribers_sorted() {
        let on = UserNotificationConfig::new("https://hook").with_all_new_questions(true);
        let backend = MemoryUserConfigBackend::with_configs([
            ("zed", on.clone()),
            ("amy", on),
            ("bob", UserNotificationConfig::new("https://hook")),
        ]);

        let ids = backend.list_all_new_question_subscribers().await.unwrap();
        assert_eq!(ids, vec!["amy".to_string(), "zed".to_string()]);
    }

    #[test]
    fn backend_error_display() {
        let err = BackendError::Unavailable("connection refused".into());
        assert_eq!(err.to_string(), "Backend unavailable: connection refused");
    }
}
