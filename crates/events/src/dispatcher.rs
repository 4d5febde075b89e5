//! Per-event delivery pipeline.
//!
//! [`Dispatcher::notify`] is the entry point the host calls for every
//! emitted notification event. It looks up the receiver's settings through
//! the [`UserConfigStore`], classifies the event, renders it and makes one
//! webhook POST. Every failure is logged and contained to that one call.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use qa_relay_core::error::CoreError;
use qa_relay_core::event::NotificationEvent;
use qa_relay_core::notification::NotificationCategory;
use serde::{Deserialize, Serialize};

use crate::classifier;
use crate::delivery::{webhook_host, WebhookPayload, WebhookTransport};
use crate::render::MessageRenderer;
use crate::store::UserConfigStore;

// ---------------------------------------------------------------------------
// SubscriberLookup
// ---------------------------------------------------------------------------

/// Where [`Dispatcher::list_new_question_subscribers`] gets its answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriberLookup {
    /// Only users currently resident in the cache.
    #[default]
    Cache,
    /// Full scan through the settings backend.
    Backend,
}

impl SubscriberLookup {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cache => "cache",
            Self::Backend => "backend",
        }
    }

    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s {
            "cache" => Ok(Self::Cache),
            "backend" => Ok(Self::Backend),
            _ => Err(CoreError::Validation(format!(
                "Invalid subscriber lookup: '{s}'. Must be one of: cache, backend"
            ))),
        }
    }
}

impl std::fmt::Display for SubscriberLookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// DispatchOutcome
// ---------------------------------------------------------------------------

/// How a single `notify` call ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Delivery is switched off globally.
    Disabled,
    /// The receiver's settings could not be loaded.
    FetchFailed,
    /// The receiver never saved any settings.
    NotConfigured,
    /// The receiver opted out of this event's category.
    CategoryDisabled(NotificationCategory),
    /// The receiver opted in but left the webhook URL empty.
    MissingWebhook,
    /// Rendering produced no text.
    Suppressed,
    Delivered,
    DeliveryFailed,
}

impl DispatchOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered)
    }
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

/// Routes notification events to per-user webhooks.
///
/// Cheap to share behind an `Arc`; `notify` may run concurrently from any
/// number of tasks.
pub struct Dispatcher {
    enabled: AtomicBool,
    store: Arc<UserConfigStore>,
    renderer: Arc<dyn MessageRenderer>,
    transport: Arc<dyn WebhookTransport>,
    subscriber_lookup: SubscriberLookup,
}

impl Dispatcher {
    pub fn new(
        store: Arc<UserConfigStore>,
        renderer: Arc<dyn MessageRenderer>,
        transport: Arc<dyn WebhookTransport>,
    ) -> Self {
        Self {
            enabled: AtomicBool::new(true),
            store,
            renderer,
            transport,
            subscriber_lookup: SubscriberLookup::default(),
        }
    }

    pub fn with_enabled(self, enabled: bool) -> Self {
        self.enabled.store(enabled, Ordering::SeqCst);
        self
    }

    pub fn with_subscriber_lookup(mut self, lookup: SubscriberLookup) -> Self {
        self.subscriber_lookup = lookup;
        self
    }

    /// Turn delivery on or off for every user at once.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
        tracing::info!(enabled, "Notification delivery toggled");
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    pub fn store(&self) -> &Arc<UserConfigStore> {
        &self.store
    }

    pub fn subscriber_lookup(&self) -> SubscriberLookup {
        self.subscriber_lookup
    }

    /// Handle one emitted event. Never fails and never panics.
    pub async fn notify(&self, event: &NotificationEvent) {
        let outcome = self.dispatch(event).await;
        tracing::debug!(
            user_id = %event.receiver_user_id,
            event_type = %event.notification_type,
            ?outcome,
            "Notification handled"
        );
    }

    /// Run the pipeline for one event and report where it stopped.
    pub async fn dispatch(&self, event: &NotificationEvent) -> DispatchOutcome {
        let user_id = event.receiver_user_id.as_str();
        let event_type = &event.notification_type;
        tracing::debug!(user_id, %event_type, "Notification received");

        if !self.is_enabled() {
            return DispatchOutcome::Disabled;
        }

        let config = match self.store.get(user_id).await {
            Ok(Some(config)) => config,
            Ok(None) => {
                tracing::debug!(user_id, "No notification config for user");
                return DispatchOutcome::NotConfigured;
            }
            Err(e) => {
                tracing::error!(user_id, error = %e, "Failed to load notification config");
                return DispatchOutcome::FetchFailed;
            }
        };
        tracing::debug!(
            user_id,
            inbox = config.inbox_notifications,
            all_new_questions = config.all_new_questions,
            followed_tags = config.new_questions_for_following_tags,
            "Notification config loaded"
        );

        let enabled = classifier::is_enabled(&config, event_type);
        tracing::debug!(user_id, %event_type, enabled, "Notification classified");
        if !enabled {
            return DispatchOutcome::CategoryDisabled(event_type.category());
        }

        if !config.has_webhook() {
            tracing::error!(user_id, %event_type, "Notification enabled but webhook URL is empty");
            return DispatchOutcome::MissingWebhook;
        }

        let message = self.renderer.render(event);
        tracing::debug!(user_id, %event_type, message = %message, "Notification rendered");
        if message.is_empty() {
            return DispatchOutcome::Suppressed;
        }

        let payload = WebhookPayload::new(message);
        let host = webhook_host(&config.webhook_url);
        tracing::debug!(user_id, host, "Sending webhook");
        match self.transport.post_json(&config.webhook_url, &payload).await {
            Ok(()) => {
                tracing::debug!(user_id, host, "Webhook delivered");
                DispatchOutcome::Delivered
            }
            Err(e) => {
                tracing::error!(
                    user_id,
                    host,
                    error = %e,
                    "Webhook delivery failed"
                );
                DispatchOutcome::DeliveryFailed
            }
        }
    }

    /// Users with `all_new_questions` enabled, sorted by id.
    pub async fn list_new_question_subscribers(&self) -> Vec<String> {
        match self.subscriber_lookup {
            SubscriberLookup::Cache => self.store.list_all_new_question_subscribers().await,
            SubscriberLookup::Backend => {
                match self.store.backend().list_all_new_question_subscribers().await {
                    Ok(ids) => ids,
                    Err(e) => {
                        tracing::error!(
                            error = %e,
                            "Failed to list subscribers from backend, using cached view"
                        );
                        self.store.list_all_new_question_subscribers().await
                    }
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use qa_relay_core::notification::NotificationType;
    use qa_relay_core::user_config::UserNotificationConfig;

    use crate::backend::MemoryUserConfigBackend;
    use crate::render::FixedFormatRenderer;
    use crate::testing::{FailingBackend, RecordingTransport};

    fn dispatcher_with(
        backend: Arc<dyn crate::backend::UserConfigBackend>,
        transport: Arc<RecordingTransport>,
    ) -> Dispatcher {
        Dispatcher::new(
            Arc::new(UserConfigStore::new(backend)),
            Arc::new(FixedFormatRenderer::new("https://x/users")),
            transport,
        )
    }

    fn new_question_event(receiver: &str) -> NotificationEvent {
        NotificationEvent::new(NotificationType::NewQuestion, receiver)
            .with_lang("en_US")
            .with_trigger_user("alice")
            .with_question("How?", "https://x/q/1")
            .with_tags("a,b")
    }

    fn backend_with(user_id: &str, config: UserNotificationConfig) -> Arc<MemoryUserConfigBackend> {
        Arc::new(MemoryUserConfigBackend::with_configs([(user_id, config)]))
    }

    #[tokio::test]
    async fn subscribed_user_gets_exactly_one_post() {
        let transport = Arc::new(RecordingTransport::new());
        let dispatcher = dispatcher_with(
            backend_with("u1", UserNotificationConfig::new("https://hook").with_all_new_questions(true)),
            transport.clone(),
        );

        dispatcher.notify(&new_question_event("u1")).await;

        let posts = transport.posts();
        assert_eq!(posts.len(), 1);
        let (url, payload) = &posts[0];
        assert_eq!(url, "https://hook");
        assert!(payload.content.contains("alice"));
        assert!(payload.content.contains("How?"));
        assert!(payload.content.contains("https://x/q/1"));
        assert!(payload.content.contains("a, b"));
        assert!(payload.embeds.is_empty());
    }

    #[tokio::test]
    async fn category_off_sends_nothing() {
        let transport = Arc::new(RecordingTransport::new());
        let dispatcher = dispatcher_with(
            backend_with("u1", UserNotificationConfig::new("https://hook").with_inbox(true)),
            transport.clone(),
        );

        let outcome = dispatcher.dispatch(&new_question_event("u1")).await;

        assert_eq!(
            outcome,
            DispatchOutcome::CategoryDisabled(NotificationCategory::AllNewQuestions)
        );
        assert_eq!(transport.count(), 0);
    }

    #[tokio::test]
    async fn fetch_error_sends_nothing_and_does_not_panic() {
        let transport = Arc::new(RecordingTransport::new());
        let dispatcher = dispatcher_with(Arc::new(FailingBackend), transport.clone());

        dispatcher.notify(&new_question_event("u1")).await;
        let outcome = dispatcher.dispatch(&new_question_event("u1")).await;

        assert_eq!(outcome, DispatchOutcome::FetchFailed);
        assert_eq!(transport.count(), 0);
        assert_eq!(dispatcher.store().cached_len().await, 0);
    }

    #[tokio::test]
    async fn user_without_config_is_not_configured() {
        let transport = Arc::new(RecordingTransport::new());
        let dispatcher = dispatcher_with(Arc::new(MemoryUserConfigBackend::new()), transport.clone());

        let outcome = dispatcher.dispatch(&new_question_event("ghost")).await;

        assert_eq!(outcome, DispatchOutcome::NotConfigured);
        assert_eq!(transport.count(), 0);
    }

    #[tokio::test]
    async fn empty_webhook_url_sends_nothing() {
        let transport = Arc::new(RecordingTransport::new());
        let dispatcher = dispatcher_with(
            backend_with("u1", UserNotificationConfig::new("").with_all_new_questions(true)),
            transport.clone(),
        );

        let outcome = dispatcher.dispatch(&new_question_event("u1")).await;

        assert_eq!(outcome, DispatchOutcome::MissingWebhook);
        assert_eq!(transport.count(), 0);
    }

    #[tokio::test]
    async fn unrecognized_type_is_suppressed() {
        let transport = Arc::new(RecordingTransport::new());
        let dispatcher = dispatcher_with(
            backend_with("u1", UserNotificationConfig::new("https://hook").with_inbox(true)),
            transport.clone(),
        );

        let event = NotificationEvent::new("badge_awarded", "u1").with_trigger_user("alice");
        let outcome = dispatcher.dispatch(&event).await;

        assert_eq!(outcome, DispatchOutcome::Suppressed);
        assert_eq!(transport.count(), 0);
    }

    #[tokio::test]
    async fn disabled_dispatcher_skips_lookup() {
        let transport = Arc::new(RecordingTransport::new());
        let dispatcher = dispatcher_with(
            backend_with("u1", UserNotificationConfig::new("https://hook").with_all_new_questions(true)),
            transport.clone(),
        )
        .with_enabled(false);

        assert_eq!(
            dispatcher.dispatch(&new_question_event("u1")).await,
            DispatchOutcome::Disabled
        );
        assert_eq!(transport.count(), 0);
        assert_eq!(dispatcher.store().cached_len().await, 0);

        dispatcher.set_enabled(true);
        assert!(dispatcher.is_enabled());
        assert!(dispatcher.dispatch(&new_question_event("u1")).await.is_delivered());
    }

    #[tokio::test]
    async fn transport_failure_is_reported_without_retry() {
        let transport = Arc::new(RecordingTransport::failing());
        let dispatcher = dispatcher_with(
            backend_with("u1", UserNotificationConfig::new("https://hook").with_all_new_questions(true)),
            transport.clone(),
        );

        let outcome = dispatcher.dispatch(&new_question_event("u1")).await;

        assert_matches!(outcome, DispatchOutcome::DeliveryFailed);
        assert_eq!(transport.count(), 1);
    }

    #[tokio::test]
    async fn inbox_event_uses_inbox_flag() {
        let transport = Arc::new(RecordingTransport::new());
        let dispatcher = dispatcher_with(
            backend_with("u1", UserNotificationConfig::new("https://hook").with_inbox(true)),
            transport.clone(),
        );

        let event = NotificationEvent::new(NotificationType::CommentAnswer, "u1")
            .with_trigger_user("bob")
            .with_question("Why?", "https://x/q/2");
        dispatcher.notify(&event).await;

        let posts = transport.posts();
        assert_eq!(posts.len(), 1);
        assert_eq!(
            posts[0].1.content,
            "[bob](https://x/users/bob) commented on your answer [Why?](https://x/q/2)"
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_notifies_post_once_per_user() {
        const N: usize = 64;
        let config = UserNotificationConfig::new("https://hook").with_all_new_questions(true);
        let backend = Arc::new(MemoryUserConfigBackend::with_configs(
            (0..N).map(|i| (format!("user-{i}"), config.clone())),
        ));
        let transport = Arc::new(RecordingTransport::new());
        let dispatcher = Arc::new(dispatcher_with(backend, transport.clone()));

        let handles: Vec<_> = (0..N)
            .map(|i| {
                let dispatcher = Arc::clone(&dispatcher);
                tokio::spawn(async move {
                    dispatcher
                        .notify(&new_question_event(&format!("user-{i}")))
                        .await;
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(transport.count(), N);
        assert_eq!(dispatcher.store().cached_len().await, N);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_notifies_for_same_user_are_safe() {
        let transport = Arc::new(RecordingTransport::new());
        let dispatcher = Arc::new(dispatcher_with(
            backend_with("u1", UserNotificationConfig::new("https://hook").with_all_new_questions(true)),
            transport.clone(),
        ));

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let dispatcher = Arc::clone(&dispatcher);
                tokio::spawn(async move { dispatcher.notify(&new_question_event("u1")).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(transport.count(), 16);
        assert_eq!(dispatcher.store().cached_len().await, 1);
    }

    #[tokio::test]
    async fn cache_lookup_lists_only_seen_subscribers() {
        let on = UserNotificationConfig::new("https://hook").with_all_new_questions(true);
        let backend = Arc::new(MemoryUserConfigBackend::with_configs([
            ("bob", on.clone()),
            ("amy", on),
        ]));
        let dispatcher = dispatcher_with(backend, Arc::new(RecordingTransport::new()));

        assert!(dispatcher.list_new_question_subscribers().await.is_empty());
        dispatcher.store().get("bob").await.unwrap();
        assert_eq!(dispatcher.list_new_question_subscribers().await, vec!["bob".to_string()]);
    }

    #[tokio::test]
    async fn backend_lookup_lists_every_subscriber() {
        let on = UserNotificationConfig::new("https://hook").with_all_new_questions(true);
        let backend = Arc::new(MemoryUserConfigBackend::with_configs([
            ("bob", on.clone()),
            ("amy", on),
        ]));
        let dispatcher = dispatcher_with(backend, Arc::new(RecordingTransport::new()))
            .with_subscriber_lookup(SubscriberLookup::Backend);

        assert_eq!(
            dispatcher.list_new_question_subscribers().await,
            vec!["amy".to_string(), "bob".to_string()]
        );
    }

    #[tokio::test]
    async fn backend_lookup_falls_back_to_cache_on_error() {
        let dispatcher = dispatcher_with(Arc::new(FailingBackend), Arc::new(RecordingTransport::new()))
            .with_subscriber_lookup(SubscriberLookup::Backend);
        dispatcher
            .store()
            .update(
                "cached",
                Some(UserNotificationConfig::new("https://hook").with_all_new_questions(true)),
            )
            .await;

        assert_eq!(
            dispatcher.list_new_question_subscribers().await,
            vec!["cached".to_string()]
        );
    }

    #[test]
    fn subscriber_lookup_parses() {
        assert_eq!(SubscriberLookup::from_str("cache").unwrap(), SubscriberLookup::Cache);
        assert_eq!(SubscriberLookup::from_str("backend").unwrap(), SubscriberLookup::Backend);
        assert!(SubscriberLookup::from_str("both").is_err());
    }
}
