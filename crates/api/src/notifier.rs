//! Wiring of the notification pipeline from [`NotifierConfig`].

use std::sync::Arc;

use qa_relay_events::render::StaticTranslator;
use qa_relay_events::{
    Dispatcher, FixedFormatRenderer, MessageRenderer, RenderStrategy, TemplatedRenderer,
    UserConfigBackend, UserConfigStore, WebhookTransport,
};

use crate::config::NotifierConfig;

/// Pick the renderer the deployment asked for.
pub fn build_renderer(config: &NotifierConfig) -> Arc<dyn MessageRenderer> {
    match config.render_strategy {
        RenderStrategy::Fixed => Arc::new(FixedFormatRenderer::new(&config.profile_url_base)),
        RenderStrategy::Templated => {
            let translator = StaticTranslator::english().with_default_lang(&config.default_language);
            Arc::new(
                TemplatedRenderer::new(Arc::new(translator))
                    .with_profile_url_base(&config.profile_url_base),
            )
        }
    }
}

/// Build the dispatcher with its own user config cache over `backend`.
pub fn build_dispatcher(
    config: &NotifierConfig,
    backend: Arc<dyn UserConfigBackend>,
    transport: Arc<dyn WebhookTransport>,
) -> Dispatcher {
    let store = Arc::new(UserConfigStore::new(backend));
    tracing::info!(
        enabled = config.enabled,
        render_strategy = %config.render_strategy,
        subscriber_lookup = %config.subscriber_lookup,
        "Notification dispatcher configured"
    );
    Dispatcher::new(store, build_renderer(config), transport)
        .with_enabled(config.enabled)
        .with_subscriber_lookup(config.subscriber_lookup)
}
