//! Localized template lookup.
//!
//! A [`Translator`] maps `(language, key, data)` to a finished string. The
//! bundled [`StaticTranslator`] keeps templates in memory and substitutes
//! `{placeholder}` tokens from [`TemplateData`].

use std::collections::HashMap;

use qa_relay_core::notification::NotificationType;

/// Language used when the receiver's language has no bundle.
pub const DEFAULT_LANGUAGE: &str = "en_US";

/// Values available to a template.
#[derive(Debug, Clone, Default)]
pub struct TemplateData<'a> {
    pub trigger_user_display_name: &'a str,
    pub trigger_user_url: &'a str,
    pub question_title: &'a str,
    pub question_url: &'a str,
    pub question_tags: &'a str,
}

impl TemplateData<'_> {
    /// Replace every known `{placeholder}` in `template`.
    pub fn apply(&self, template: &str) -> String {
        [
            ("{trigger_user_display_name}", self.trigger_user_display_name),
            ("{trigger_user_url}", self.trigger_user_url),
            ("{question_title}", self.question_title),
            ("{question_url}", self.question_url),
            ("{question_tags}", self.question_tags),
        ]
        .into_iter()
        .fold(template.to_string(), |acc, (token, value)| acc.replace(token, value))
    }
}

/// Localization lookup consumed by the templated renderer.
pub trait Translator: Send + Sync {
    /// Render `key` for `lang`. Returns an empty string when no template
    /// exists.
    fn translate(&self, lang: &str, key: &str, data: &TemplateData<'_>) -> String;
}

/// Template for the tag line appended to new-question messages that carry
/// tags.
pub const TAGS_TEMPLATE_KEY: &str = "notification.tpl.question_tags";

/// Template key for a notification type.
///
/// Both new-question types share one template.
pub fn template_key(notification_type: NotificationType) -> &'static str {
    match notification_type {
        NotificationType::UpdateQuestion => "notification.tpl.update_question",
        NotificationType::AnswerTheQuestion => "notification.tpl.answer_the_question",
        NotificationType::UpdateAnswer => "notification.tpl.update_answer",
        NotificationType::AcceptAnswer => "notification.tpl.accept_answer",
        NotificationType::CommentQuestion => "notification.tpl.comment_question",
        NotificationType::CommentAnswer => "notification.tpl.comment_answer",
        NotificationType::ReplyToYou => "notification.tpl.reply_to_you",
        NotificationType::MentionYou => "notification.tpl.mention_you",
        NotificationType::InvitedYouToAnswer => "notification.tpl.invited_you_to_answer",
        NotificationType::NewQuestion | NotificationType::NewQuestionFollowedTag => {
            "notification.tpl.new_question"
        }
    }
}

/// Built-in English templates.
const EN_US_TEMPLATES: &[(&str, &str)] = &[
    (
        "notification.tpl.update_question",
        "[{trigger_user_display_name}]({trigger_user_url}) updated the question [{question_title}]({question_url})",
    ),
    (
        "notification.tpl.answer_the_question",
        "[{trigger_user_display_name}]({trigger_user_url}) answered your question [{question_title}]({question_url})",
    ),
    (
        "notification.tpl.update_answer",
        "[{trigger_user_display_name}]({trigger_user_url}) updated your answer to [{question_title}]({question_url})",
    ),
    (
        "notification.tpl.accept_answer",
        "[{trigger_user_display_name}]({trigger_user_url}) accepted your answer to [{question_title}]({question_url})",
    ),
    (
        "notification.tpl.comment_question",
        "[{trigger_user_display_name}]({trigger_user_url}) commented on your question [{question_title}]({question_url})",
    ),
    (
        "notification.tpl.comment_answer",
        "[{trigger_user_display_name}]({trigger_user_url}) commented on your answer to [{question_title}]({question_url})",
    ),
    (
        "notification.tpl.reply_to_you",
        "[{trigger_user_display_name}]({trigger_user_url}) replied to your comment on [{question_title}]({question_url})",
    ),
    (
        "notification.tpl.mention_you",
        "[{trigger_user_display_name}]({trigger_user_url}) mentioned you in [{question_title}]({question_url})",
    ),
    (
        "notification.tpl.invited_you_to_answer",
        "[{trigger_user_display_name}]({trigger_user_url}) invited you to answer [{question_title}]({question_url})",
    ),
    (
        "notification.tpl.new_question",
        "[{trigger_user_display_name}]({trigger_user_url}) asked a new question [{question_title}]({question_url})",
    ),
    ("notification.tpl.question_tags", "Tags: {question_tags}"),
];

/// In-memory translator with one template bundle per language.
#[derive(Debug, Clone)]
pub struct StaticTranslator {
    default_lang: String,
    bundles: HashMap<String, HashMap<String, String>>,
}

impl StaticTranslator {
    /// A translator with no bundles at all.
    pub fn empty(default_lang: impl Into<String>) -> Self {
        Self {
            default_lang: default_lang.into(),
            bundles: HashMap::new(),
        }
    }

    /// A translator preloaded with the built-in `en_US` bundle.
    pub fn english() -> Self {
        Self::empty(DEFAULT_LANGUAGE).with_bundle(
            DEFAULT_LANGUAGE,
            EN_US_TEMPLATES
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string())),
        )
    }

    /// Change the fallback language.
    pub fn with_default_lang(mut self, lang: impl Into<String>) -> Self {
        self.default_lang = lang.into();
        self
    }

    /// Add or extend the bundle for `lang`.
    pub fn with_bundle<I>(mut self, lang: impl Into<String>, templates: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.bundles.entry(lang.into()).or_default().extend(templates);
        self
    }

    /// Add a bundle from a flat JSON object of `key -> template`.
    pub fn with_bundle_json(
        self,
        lang: impl Into<String>,
        json: &str,
    ) -> Result<Self, serde_json::Error> {
        let templates: HashMap<String, String> = serde_json::from_str(json)?;
        Ok(self.with_bundle(lang, templates))
    }

    fn lookup(&self, lang: &str, key: &str) -> Option<&str> {
        self.bundles
            .get(lang)
            .and_then(|bundle| bundle.get(key))
            .or_else(|| {
                self.bundles
                    .get(&self.default_lang)
                    .and_then(|bundle| bundle.get(key))
            })
            .map(String::as_str)
    }
}

impl Default for StaticTranslator {
    fn default() -> Self {
        Self::english()
    }
}

impl Translator for StaticTranslator {
    fn translate(&self, lang: &str, key: &str, data: &TemplateData<'_>) -> String {
        match self.lookup(lang, key) {
            Some(template) => data.apply(template),
            None => {
                tracing::debug!(lang, key, "No template found");
                String::new()
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
