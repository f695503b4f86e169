//! Localized message resolution.
//!
//! Picks the language for a request (explicit `?lang=` query first, then
//! the `Accept-Language` header, then the configured default) and loads
//! the maintenance message for it, falling back to the default language's
//! row and finally to the built-in strings.

use std::sync::Arc;

use anyhow::Result;
use serde::Serialize;
use tracing::debug;

use crate::constants::defaults;
use crate::database::Database;
use crate::settings::{LanguageSettings, SettingsStore};

#[derive(Debug, Clone, Serialize)]
pub struct ResolvedMessage {
    pub language: String,
    pub heading: String,
    pub description: String,
    pub countdown_label: String,
}

impl ResolvedMessage {
    fn built_in(language: &str) -> Self {
        Self {
            language: language.to_string(),
            heading: defaults::HEADING.to_string(),
            description: defaults::DESCRIPTION.to_string(),
            countdown_label: defaults::COUNTDOWN_LABEL.to_string(),
        }
    }
}

pub struct MessageService {
    db: Arc<Database>,
    settings: Arc<SettingsStore>,
}

impl MessageService {
    pub fn new(db: Arc<Database>, settings: Arc<SettingsStore>) -> Self {
        Self { db, settings }
    }

    pub async fn resolve(
        &self,
        requested: Option<&str>,
        accept_language: Option<&str>,
    ) -> Result<ResolvedMessage> {
        let languages = self.settings.languages().await?;
        let language = resolve_language(requested, accept_language, &languages);

        if let Some(record) = self.db.get_message(&language).await? {
            return Ok(ResolvedMessage {
                language,
                heading: record.heading,
                description: record.description,
                countdown_label: record.countdown_label,
            });
        }

        // No row for the resolved language; try the default language's row
        if language != languages.default_language {
            if let Some(record) = self.db.get_message(&languages.default_language).await? {
                debug!(
                    "no message for language {}, falling back to {}",
                    language, languages.default_language
                );
                return Ok(ResolvedMessage {
                    language,
                    heading: record.heading,
                    description: record.description,
                    countdown_label: record.countdown_label,
                });
            }
        }

        Ok(ResolvedMessage::built_in(&language))
    }
}

/// Resolve the effective language code for a request against the
/// configured language list.
pub fn resolve_language(
    requested: Option<&str>,
    accept_language: Option<&str>,
    languages: &LanguageSettings,
) -> String {
    if let Some(requested) = requested {
        let code = primary_subtag(requested);
        if languages.configured.contains_key(&code) {
            return code;
        }
    }

    if let Some(header) = accept_language {
        for tag in header.split(',') {
            let tag = tag.split(';').next().unwrap_or("").trim();
            if tag.is_empty() || tag == "*" {
                continue;
            }
            let code = primary_subtag(tag);
            if languages.configured.contains_key(&code) {
                return code;
            }
        }
    }

    if languages.configured.contains_key(&languages.default_language) {
        return languages.default_language.clone();
    }

    languages
        .configured
        .keys()
        .next()
        .cloned()
        .unwrap_or_else(|| defaults::LANGUAGE.to_string())
}

/// Lowercased primary subtag: "sv-SE" -> "sv", "sv_SE" -> "sv"
fn primary_subtag(tag: &str) -> String {
    tag.split(['-', '_'])
        .next()
        .unwrap_or(tag)
        .trim()
        .to_lowercase()
}
