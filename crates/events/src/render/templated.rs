//! Localized template renderer.

use std::sync::Arc;

use qa_relay_core::event::NotificationEvent;

use super::translator::{template_key, TemplateData, Translator, TAGS_TEMPLATE_KEY};
use super::{display_tags, profile_url, MessageRenderer, DEFAULT_PROFILE_URL_BASE};

/// Renders through a [`Translator`] keyed by notification type and the
/// receiver's language.
pub struct TemplatedRenderer {
    translator: Arc<dyn Translator>,
    profile_url_base: String,
}

impl TemplatedRenderer {
    pub fn new(translator: Arc<dyn Translator>) -> Self {
        Self {
            translator,
            profile_url_base: DEFAULT_PROFILE_URL_BASE.to_string(),
        }
    }

    pub fn with_profile_url_base(mut self, base: impl Into<String>) -> Self {
        self.profile_url_base = base.into();
        self
    }
}

impl MessageRenderer for TemplatedRenderer {
    fn render(&self, event: &NotificationEvent) -> String {
        let Some(notification_type) = event.notification_type.known() else {
            return String::new();
        };

        let trigger_user_url = profile_url(&self.profile_url_base, &event.trigger_user_display_name);
        let tags = display_tags(event);
        let data = TemplateData {
            trigger_user_display_name: &event.trigger_user_display_name,
            trigger_user_url: &trigger_user_url,
            question_title: &event.question_title,
            question_url: &event.question_url,
            question_tags: &tags,
        };

        let lang = &event.receiver_lang;
        let mut message = self
            .translator
            .translate(lang, template_key(notification_type), &data);

        if !message.is_empty() && !tags.is_empty() {
            let tag_line = self.translator.translate(lang, TAGS_TEMPLATE_KEY, &data);
            if !tag_line.is_empty() {
                message.push('\n');
                message.push_str(&tag_line);
            }
        }
        message
    }
}
