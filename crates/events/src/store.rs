//! Read-through cache of per-user notification configs.
//!
//! [`UserConfigStore`] sits in front of a [`UserConfigBackend`]. A lookup
//! miss loads from the backend and remembers the answer, including "this
//! user has no config". Entries never expire on their own; they are
//! replaced when the backend reports a change via [`UserConfigStore::update`].

use std::collections::HashMap;
use std::sync::Arc;

use qa_relay_core::user_config::UserNotificationConfig;
use tokio::sync::RwLock;

use crate::backend::{BackendError, UserConfigBackend};

/// A backend lookup failed for one user.
#[derive(Debug, thiserror::Error)]
#[error("Failed to load notification config for user {user_id}: {source}")]
pub struct ConfigFetchError {
    pub user_id: String,
    #[source]
    pub source: BackendError,
}

/// Thread-safe read-through cache over a settings backend.
///
/// Designed to be wrapped in `Arc` and shared between the dispatcher and
/// whatever code writes user settings.
pub struct UserConfigStore {
    backend: Arc<dyn UserConfigBackend>,
    cache: RwLock<HashMap<String, Option<UserNotificationConfig>>>,
}

impl UserConfigStore {
    pub fn new(backend: Arc<dyn UserConfigBackend>) -> Self {
        Self {
            backend,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// The backend this store reads through to.
    pub fn backend(&self) -> &Arc<dyn UserConfigBackend> {
        &self.backend
    }

    /// Return a user's config, loading it from the backend on a miss.
    ///
    /// `Ok(None)` is cached too, so a user without settings costs one backend
    /// call per process lifetime. A failed load leaves the cache untouched.
    ///
    /// The lock is not held across the backend call. Two tasks missing on
    /// the same user may both load; the first to finish fills the entry and
    /// the other returns it.
    pub async fn get(
        &self,
        user_id: &str,
    ) -> Result<Option<UserNotificationConfig>, ConfigFetchError> {
        if let Some(entry) = self.cache.read().await.get(user_id) {
            tracing::debug!(user_id, "User config cache hit");
            return Ok(entry.clone());
        }

        tracing::debug!(user_id, "User config cache miss, loading from backend");
        let loaded = self
            .backend
            .load_user_config(user_id)
            .await
            .map_err(|source| ConfigFetchError {
                user_id: user_id.to_string(),
                source,
            })?;

        // An `update` that landed while the load was in flight is newer
        // than what the backend returned; keep it.
        let cached = self
            .cache
            .write()
            .await
            .entry(user_id.to_string())
            .or_insert(loaded)
            .clone();
        Ok(cached)
    }

    /// Replace the cached entry after the backend reported a change.
    pub async fn update(&self, user_id: &str, config: Option<UserNotificationConfig>) {
        tracing::debug!(user_id, present = config.is_some(), "User config cache updated");
        self.cache.write().await.insert(user_id.to_string(), config);
    }

    /// Drop a single entry so the next lookup reloads it.
    pub async fn invalidate(&self, user_id: &str) {
        self.cache.write().await.remove(user_id);
    }

    /// Users resident in the cache with `all_new_questions` enabled.
    ///
    /// Only users that have been looked up (or updated) at least once are
    /// visible here; this does not query the backend.
    pub async fn list_all_new_question_subscribers(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .cache
            .read()
            .await
            .iter()
            .filter_map(|(id, entry)| match entry {
                Some(config) if config.all_new_questions => Some(id.clone()),
                _ => None,
            })
            .collect();
        ids.sort();
        ids
    }

    /// Number of cached entries, including cached "no config" answers.
    pub async fn cached_len(&self) -> usize {
        self.cache.read().await.len()
    }

    pub async fn is_cached(&self, user_id: &str) -> bool {
        self.cache.read().await.contains_key(user_id)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
