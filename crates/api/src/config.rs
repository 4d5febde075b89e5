use qa_relay_events::render::translator::DEFAULT_LANGUAGE;
use qa_relay_events::render::DEFAULT_PROFILE_URL_BASE;
use qa_relay_events::{RenderStrategy, SubscriberLookup};

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    pub notifier: NotifierConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    ///
    /// Notifier settings are read by [`NotifierConfig::from_env`].
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            notifier: NotifierConfig::from_env(),
        }
    }
}

/// Settings for the notification pipeline.
#[derive(Debug, Clone)]
pub struct NotifierConfig {
    /// Global delivery switch at startup (default: `true`).
    pub enabled: bool,
    pub render_strategy: RenderStrategy,
    /// Base for trigger-user profile links.
    pub profile_url_base: String,
    /// Fallback language for templated rendering.
    pub default_language: String,
    /// Per-request webhook timeout in seconds (default: `10`).
    pub webhook_timeout_secs: u64,
    pub subscriber_lookup: SubscriberLookup,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            render_strategy: RenderStrategy::default(),
            profile_url_base: DEFAULT_PROFILE_URL_BASE.to_string(),
            default_language: DEFAULT_LANGUAGE.to_string(),
            webhook_timeout_secs: 10,
            subscriber_lookup: SubscriberLookup::default(),
        }
    }
}

impl NotifierConfig {
    /// | Env Var                 | Default                                  |
    /// |-------------------------|------------------------------------------|
    /// | `NOTIFICATIONS_ENABLED` | `true`                                   |
    /// | `RENDER_STRATEGY`       | `fixed`                                  |
    /// | `PROFILE_URL_BASE`      | `https://answer.apps.hexmos.com/users`   |
    /// | `DEFAULT_LANGUAGE`      | `en_US`                                  |
    /// | `WEBHOOK_TIMEOUT_SECS`  | `10`                                     |
    /// | `SUBSCRIBER_LOOKUP`     | `cache`                                  |
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let enabled: bool = std::env::var("NOTIFICATIONS_ENABLED")
            .map(|v| v.parse().expect("NOTIFICATIONS_ENABLED must be true or false"))
            .unwrap_or(defaults.enabled);

        let render_strategy = std::env::var("RENDER_STRATEGY")
            .map(|v| RenderStrategy::from_str(&v).unwrap_or_else(|e| panic!("{e}")))
            .unwrap_or(defaults.render_strategy);

        let profile_url_base =
            std::env::var("PROFILE_URL_BASE").unwrap_or(defaults.profile_url_base);

        let default_language =
            std::env::var("DEFAULT_LANGUAGE").unwrap_or(defaults.default_language);

        let webhook_timeout_secs: u64 = std::env::var("WEBHOOK_TIMEOUT_SECS")
            .map(|v| v.parse().expect("WEBHOOK_TIMEOUT_SECS must be a valid u64"))
            .unwrap_or(defaults.webhook_timeout_secs);

        let subscriber_lookup = std::env::var("SUBSCRIBER_LOOKUP")
            .map(|v| SubscriberLookup::from_str(&v).unwrap_or_else(|e| panic!("{e}")))
            .unwrap_or(defaults.subscriber_lookup);

        Self {
            enabled,
            render_strategy,
            profile_url_base,
            default_language,
            webhook_timeout_secs,
            subscriber_lookup,
        }
    }
}
