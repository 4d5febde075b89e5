use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use qa_relay_api::config::{NotifierConfig, ServerConfig};
use qa_relay_api::notifier::build_dispatcher;
use qa_relay_api::router::build_app_router;
use qa_relay_api::state::AppState;
use qa_relay_core::user_config::UserNotificationConfig;
use qa_relay_events::{
    Dispatcher, MemoryUserConfigBackend, WebhookError, WebhookPayload, WebhookTransport,
};
use tower::ServiceExt;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        notifier: NotifierConfig {
            profile_url_base: "https://x/users".to_string(),
            ..NotifierConfig::default()
        },
    }
}

/// Transport that records POSTs instead of sending them.
#[derive(Default)]
pub struct RecordingTransport {
    posts: Mutex<Vec<(String, WebhookPayload)>>,
}

impl RecordingTransport {
    pub fn posts(&self) -> Vec<(String, WebhookPayload)> {
        self.posts.lock().unwrap().clone()
    }
}

#[async_trait]
impl WebhookTransport for RecordingTransport {
    async fn post_json(&self, url: &str, payload: &WebhookPayload) -> Result<(), WebhookError> {
        self.posts
            .lock()
            .unwrap()
            .push((url.to_string(), payload.clone()));
        Ok(())
    }
}

pub struct TestApp {
    pub router: Router,
    pub backend: Arc<MemoryUserConfigBackend>,
    pub transport: Arc<RecordingTransport>,
    pub dispatcher: Arc<Dispatcher>,
}

/// Build the full application router over an in-memory backend seeded
/// with `configs`, using the same middleware stack as production.
pub fn build_test_app(configs: Vec<(&'static str, UserNotificationConfig)>) -> TestApp {
    let config = test_config();
    let backend = Arc::new(MemoryUserConfigBackend::with_configs(configs));
    let transport = Arc::new(RecordingTransport::default());
    let dispatcher = Arc::new(build_dispatcher(
        &config.notifier,
        backend.clone(),
        transport.clone(),
    ));

    let router = build_app_router(AppState::new(config, Arc::clone(&dispatcher)));
    TestApp {
        router,
        backend,
        transport,
        dispatcher,
    }
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn send_json(
    app: Router,
    method: Method,
    uri: &str,
    body: serde_json::Value,
) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send_json(app, Method::POST, uri, body).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send_json(app, Method::PUT, uri, body).await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
