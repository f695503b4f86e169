//! Application-wide constants: settings keys, cache TTLs, defaults.
//!
//! Constants are grouped by category so every magic value has a single
//! source of truth.

#![allow(dead_code)] // Some constants are defined for future use

/// Settings store keys. The store is a flat namespace; every key the
/// service reads or writes is listed here.
pub mod keys {
    pub const ENABLED: &str = "maintenance_enabled";
    pub const START_TIME: &str = "start_time";
    pub const END_TIME: &str = "end_time";
    pub const TIMEZONE: &str = "timezone";

    pub const SHOW_COUNTDOWN: &str = "show_countdown";
    pub const SHOW_IMAGE: &str = "show_image";
    pub const IMAGE_URL: &str = "image_url";

    pub const CONFIGURED_LANGUAGES: &str = "configured_languages";
    pub const DEFAULT_LANGUAGE: &str = "default_language";

    pub const EMAIL_NOTIFICATIONS: &str = "email_notifications";
    pub const EMAIL_ADDRESSES: &str = "email_addresses";
    pub const EMAIL_NOTIFY_END: &str = "email_notify_end";
    pub const EMAIL_SUBJECT_START: &str = "email_subject_start";
    pub const EMAIL_MESSAGE_START: &str = "email_message_start";
    pub const EMAIL_SUBJECT_END: &str = "email_subject_end";
    pub const EMAIL_MESSAGE_END: &str = "email_message_end";

    // Per-window dedup markers, holding the window fingerprint
    pub const EMAIL_SENT_START: &str = "email_sent_start";
    pub const EMAIL_SENT_END: &str = "email_sent_end";
}

/// Cached window fact constants
pub mod cache {
    /// How long a definitive "window ended" fact stays valid
    pub const WINDOW_ENDED_TTL_HOURS: i64 = 24;
}

/// Email dispatch constants
pub mod email {
    /// SMTP dispatch timeout
    pub const DISPATCH_TIMEOUT_SECONDS: u64 = 10;
}

/// Default configuration and content values
pub mod defaults {
    /// Default interval for the background transition watcher
    pub const CHECK_INTERVAL_SECONDS: u64 = 30;

    /// Default SQLite database path
    pub const DATABASE_PATH: &str = "data/maintenance.db";

    pub const TIMEZONE: &str = "UTC";
    pub const LANGUAGE: &str = "en";
    pub const LANGUAGE_NAME: &str = "English";

    pub const HEADING: &str = "Site Under Maintenance";
    pub const DESCRIPTION: &str =
        "We're working hard to improve the user experience. Stay tuned!";
    pub const COUNTDOWN_LABEL: &str = "We'll be back in:";

    /// Bundled fallback image served from the assets mount
    pub const IMAGE_URL: &str = "/assets/maintenance.svg";
}
