//! Record types for the persistence layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One entry of the flat key-value settings store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingRecord {
    pub key: String,
    pub value: String,
    pub updated_at: DateTime<Utc>,
}

/// Localized maintenance message, one row per language code
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageRecord {
    pub language: String,
    pub heading: String,
    /// Rich text; rendered unescaped into the maintenance page
    pub description: String,
    pub countdown_label: String,
    pub updated_at: DateTime<Utc>,
}
