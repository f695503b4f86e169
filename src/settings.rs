//! Typed view over the key-value settings store.
//!
//! All administrator-configurable state lives in the flat `settings`
//! table; this module groups the raw keys into the shapes the rest of
//! the service consumes and owns the save path (which also invalidates
//! the cached window facts, since a save may configure a new window).

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::constants::{defaults, keys};
use crate::database::{Database, SettingRecord};
use crate::transients::TransientStore;
use crate::window;

/// The configured maintenance window, as stored
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowSettings {
    pub enabled: bool,
    pub start: Option<String>,
    pub end: Option<String>,
    pub timezone: String,
}

impl WindowSettings {
    /// Identity of this window instance, used to dedup notifications.
    /// None when the window is not fully configured.
    pub fn fingerprint(&self) -> Option<String> {
        match (&self.start, &self.end) {
            (Some(start), Some(end)) if !start.is_empty() && !end.is_empty() => {
                Some(format!("{}|{}", start, end))
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DisplaySettings {
    pub show_countdown: bool,
    pub show_image: bool,
    pub image_url: String,
}

#[derive(Debug, Clone)]
pub struct EmailSettings {
    pub enabled: bool,
    pub addresses: Vec<String>,
    pub notify_end: bool,
    pub subject_start: Option<String>,
    pub message_start: Option<String>,
    pub subject_end: Option<String>,
    pub message_end: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LanguageSettings {
    /// language code -> display name
    pub configured: BTreeMap<String, String>,
    pub default_language: String,
}

pub struct SettingsStore {
    db: Arc<Database>,
    transients: Arc<TransientStore>,
}

impl SettingsStore {
    pub fn new(db: Arc<Database>, transients: Arc<TransientStore>) -> Self {
        Self { db, transients }
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        self.db.get_setting(key).await
    }

    pub async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.db
            .upsert_setting(&SettingRecord {
                key: key.to_string(),
                value: value.to_string(),
                updated_at: Utc::now(),
            })
            .await
    }

    pub async fn delete(&self, key: &str) -> Result<bool> {
        self.db.delete_setting(key).await
    }

    pub async fn all(&self) -> Result<Vec<SettingRecord>> {
        self.db.get_all_settings().await
    }

    pub async fn get_bool(&self, key: &str, default: bool) -> Result<bool> {
        Ok(match self.db.get_setting(key).await? {
            Some(value) => parse_bool(&value),
            None => default,
        })
    }

    pub async fn window(&self) -> Result<WindowSettings> {
        Ok(WindowSettings {
            enabled: self.get_bool(keys::ENABLED, false).await?,
            start: self.db.get_setting(keys::START_TIME).await?,
            end: self.db.get_setting(keys::END_TIME).await?,
            timezone: self
                .db
                .get_setting(keys::TIMEZONE)
                .await?
                .filter(|tz| !tz.is_empty())
                .unwrap_or_else(|| defaults::TIMEZONE.to_string()),
        })
    }

    pub async fn display(&self) -> Result<DisplaySettings> {
        Ok(DisplaySettings {
            show_countdown: self.get_bool(keys::SHOW_COUNTDOWN, true).await?,
            show_image: self.get_bool(keys::SHOW_IMAGE, true).await?,
            image_url: self
                .db
                .get_setting(keys::IMAGE_URL)
                .await?
                .filter(|url| !url.is_empty())
                .unwrap_or_else(|| defaults::IMAGE_URL.to_string()),
        })
    }

    pub async fn email(&self) -> Result<EmailSettings> {
        let addresses = self
            .db
            .get_setting(keys::EMAIL_ADDRESSES)
            .await?
            .unwrap_or_default()
            .split(',')
            .map(|addr| addr.trim().to_string())
            .filter(|addr| !addr.is_empty())
            .collect();

        Ok(EmailSettings {
            enabled: self.get_bool(keys::EMAIL_NOTIFICATIONS, false).await?,
            addresses,
            notify_end: self.get_bool(keys::EMAIL_NOTIFY_END, false).await?,
            subject_start: self.db.get_setting(keys::EMAIL_SUBJECT_START).await?,
            message_start: self.db.get_setting(keys::EMAIL_MESSAGE_START).await?,
            subject_end: self.db.get_setting(keys::EMAIL_SUBJECT_END).await?,
            message_end: self.db.get_setting(keys::EMAIL_MESSAGE_END).await?,
        })
    }

    pub async fn languages(&self) -> Result<LanguageSettings> {
        let configured: BTreeMap<String, String> = match self
            .db
            .get_setting(keys::CONFIGURED_LANGUAGES)
            .await?
        {
            Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!("stored language list is not valid JSON, using default: {}", e);
                default_language_map()
            }),
            None => default_language_map(),
        };

        let default_language = self
            .db
            .get_setting(keys::DEFAULT_LANGUAGE)
            .await?
            .filter(|lang| !lang.is_empty())
            .unwrap_or_else(|| defaults::LANGUAGE.to_string());

        Ok(LanguageSettings {
            configured,
            default_language,
        })
    }

    /// Write a batch of settings and invalidate the cached window facts.
    /// A new window may have been configured, so the "ended"/"active"
    /// conclusions no longer hold.
    pub async fn save_many(&self, values: &BTreeMap<String, String>) -> Result<usize> {
        let now = Utc::now();
        for (key, value) in values {
            self.db
                .upsert_setting(&SettingRecord {
                    key: key.clone(),
                    value: value.clone(),
                    updated_at: now,
                })
                .await?;
        }

        self.transients.clear_window_facts().await;
        self.warn_if_inverted().await;

        debug!("saved {} settings", values.len());
        Ok(values.len())
    }

    /// Inverted windows are accepted but never activate; flag them so the
    /// misconfiguration is visible in the logs.
    async fn warn_if_inverted(&self) {
        let window = match self.window().await {
            Ok(window) => window,
            Err(_) => return,
        };
        let tz = match window.timezone.parse::<chrono_tz::Tz>() {
            Ok(tz) => tz,
            Err(_) => return,
        };
        if let (Some(start), Some(end)) = (&window.start, &window.end) {
            if let (Some(start_dt), Some(end_dt)) = (
                window::parse_local_datetime(start, tz),
                window::parse_local_datetime(end, tz),
            ) {
                if start_dt >= end_dt {
                    warn!(
                        "maintenance window start {} is not before end {}; the window will never activate",
                        start, end
                    );
                }
            }
        }
    }

    /// Seed first-run defaults: countdown on and a single-entry language
    /// list. Existing values are never overwritten.
    pub async fn ensure_defaults(&self) -> Result<()> {
        if self.db.get_setting(keys::SHOW_COUNTDOWN).await?.is_none() {
            self.set(keys::SHOW_COUNTDOWN, "1").await?;
        }
        if self
            .db
            .get_setting(keys::CONFIGURED_LANGUAGES)
            .await?
            .is_none()
        {
            let languages = serde_json::to_string(&default_language_map())?;
            self.set(keys::CONFIGURED_LANGUAGES, &languages).await?;
            self.set(keys::DEFAULT_LANGUAGE, defaults::LANGUAGE).await?;
            info!("seeded default language configuration");
        }
        Ok(())
    }
}

fn default_language_map() -> BTreeMap<String, String> {
    BTreeMap::from([(
        defaults::LANGUAGE.to_string(),
        defaults::LANGUAGE_NAME.to_string(),
    )])
}

fn parse_bool(value: &str) -> bool {
    matches!(value.trim(), "1" | "true" | "on" | "yes")
}
