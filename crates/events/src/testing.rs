//! Test doubles shared by the unit tests in this crate.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use qa_relay_core::user_config::UserNotificationConfig;
use tokio::sync::Notify;

use crate::backend::{BackendError, UserConfigBackend};
use crate::delivery::{WebhookError, WebhookPayload, WebhookTransport};

/// Backend whose every call fails.
pub struct FailingBackend;

#[async_trait]
impl UserConfigBackend for FailingBackend {
    async fn load_user_config(
        &self,
        _user_id: &str,
    ) -> Result<Option<UserNotificationConfig>, BackendError> {
        Err(BackendError::Unavailable("connection refused".into()))
    }

    async fn save_user_config(
        &self,
        _user_id: &str,
        _config: &UserNotificationConfig,
    ) -> Result<UserNotificationConfig, BackendError> {
        Err(BackendError::Unavailable("connection refused".into()))
    }

    async fn list_all_new_question_subscribers(&self) -> Result<Vec<String>, BackendError> {
        Err(BackendError::Unavailable("connection refused".into()))
    }
}

/// Backend whose loads block until [`GatedBackend::release`] is called.
pub struct GatedBackend {
    config: UserNotificationConfig,
    loading: Notify,
    gate: Notify,
}

impl GatedBackend {
    pub fn new(config: UserNotificationConfig) -> Self {
        Self {
            config,
            loading: Notify::new(),
            gate: Notify::new(),
        }
    }

    /// Resolves once a load has started and is waiting on the gate.
    pub async fn wait_until_loading(&self) {
        self.loading.notified().await;
    }

    pub fn release(&self) {
        self.gate.notify_one();
    }
}

#[async_trait]
impl UserConfigBackend for GatedBackend {
    async fn load_user_config(
        &self,
        _user_id: &str,
    ) -> Result<Option<UserNotificationConfig>, BackendError> {
        self.loading.notify_one();
        self.gate.notified().await;
        Ok(Some(self.config.clone()))
    }

    async fn save_user_config(
        &self,
        _user_id: &str,
        config: &UserNotificationConfig,
    ) -> Result<UserNotificationConfig, BackendError> {
        Ok(config.clone())
    }

    async fn list_all_new_question_subscribers(&self) -> Result<Vec<String>, BackendError> {
        Ok(Vec::new())
    }
}

/// Transport that records every POST instead of sending it.
#[derive(Default)]
pub struct RecordingTransport {
    posts: Mutex<Vec<(String, WebhookPayload)>>,
    fail: AtomicBool,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// A transport that records the attempt and then answers HTTP 500.
    pub fn failing() -> Self {
        let transport = Self::default();
        transport.fail.store(true, Ordering::SeqCst);
        transport
    }

    pub fn posts(&self) -> Vec<(String, WebhookPayload)> {
        self.posts.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.posts.lock().unwrap().len()
    }
}

#[async_trait]
impl WebhookTransport for RecordingTransport {
    async fn post_json(&self, url: &str, payload: &WebhookPayload) -> Result<(), WebhookError> {
        self.posts
            .lock()
            .unwrap()
            .push((url.to_string(), payload.clone()));
        if self.fail.load(Ordering::SeqCst) {
            return Err(WebhookError::HttpStatus(500));
        }
        Ok(())
    }
}
