//! Decides whether a user's settings allow an event to be delivered.

use qa_relay_core::notification::EventType;
use qa_relay_core::user_config::UserNotificationConfig;

/// Whether `config` opts into the category `event_type` belongs to.
///
/// Pure and total: unrecognized types fall under the inbox flag.
pub fn is_enabled(config: &UserNotificationConfig, event_type: &EventType) -> bool {
    config.allows(event_type.category())
}
