//! Per-user webhook notification engine.
//!
//! This crate turns Q&A notification events into chat-webhook messages:
//!
//! - [`UserConfigStore`]: read-through cache of per-user settings in front
//!   of a [`UserConfigBackend`].
//! - [`classifier`]: decides whether a user's flags allow an event.
//! - [`render`]: fixed-format and templated message renderers.
//! - [`delivery`]: single-attempt webhook POST.
//! - [`Dispatcher`]: runs the pipeline for each emitted event.

pub mod backend;
pub mod classifier;
pub mod delivery;
pub mod dispatcher;
pub mod render;
pub mod store;

#[cfg(test)]
mod testing;

pub use backend::{BackendError, MemoryUserConfigBackend, PgUserConfigBackend, UserConfigBackend};
pub use delivery::webhook::{WebhookDelivery, WebhookError, WebhookPayload, WebhookTransport};
pub use dispatcher::{DispatchOutcome, Dispatcher, SubscriberLookup};
pub use render::{FixedFormatRenderer, MessageRenderer, RenderStrategy, TemplatedRenderer};
pub use store::{ConfigFetchError, UserConfigStore};
