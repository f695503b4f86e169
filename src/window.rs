//! Maintenance window evaluation.
//!
//! Decides whether "now" falls inside the configured [start, end] window.
//! Start and end are local-datetime strings interpreted in the configured
//! IANA timezone; bounds are inclusive on both ends. Every failure mode
//! (missing configuration, unknown timezone, unparseable dates) resolves
//! to "not in maintenance" so a misconfiguration degrades to a normal
//! site instead of an error page.
//!
//! The evaluator caches two derived facts: once the end time has passed,
//! a "window ended" fact (24h TTL) short-circuits further evaluation;
//! while inside the window an "active" fact lives until the window's own
//! end time. Parsing is therefore bounded to once per state transition
//! rather than once per request.

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use tracing::debug;

use crate::constants::{cache, keys};
use crate::settings::{SettingsStore, WindowSettings};
use crate::transients::{TransientStore, WINDOW_ACTIVE_KEY, WINDOW_ENDED_KEY};

/// Stored format of the datetime-local inputs
pub const PRIMARY_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Accepted fallbacks: space-separated and seconds-bearing variants
const FALLBACK_FORMATS: &[&str] = &["%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WindowState {
    /// Maintenance mode is switched off
    Disabled,
    /// Start or end time is missing
    NotConfigured,
    /// Timezone did not parse as an IANA name
    InvalidTimezone,
    /// Neither the primary nor the fallback formats matched
    InvalidDates,
    /// Now is before the window opens
    Pending,
    /// Now is inside [start, end]
    Active { ends_at: DateTime<Utc> },
    /// Now is past the window's end
    Ended,
}

impl WindowState {
    pub fn is_active(&self) -> bool {
        matches!(self, WindowState::Active { .. })
    }
}

/// Parse a stored local-datetime string in the given timezone. Tries the
/// primary format first, then the fallbacks with `T` normalized to a
/// space where the format expects one.
pub fn parse_local_datetime(raw: &str, tz: Tz) -> Option<DateTime<Tz>> {
    let mut parsed = NaiveDateTime::parse_from_str(raw, PRIMARY_FORMAT).ok();

    if parsed.is_none() {
        let spaced = raw.replace('T', " ");
        for format in FALLBACK_FORMATS {
            let candidate = if format.contains('T') { raw } else { &spaced };
            if let Ok(naive) = NaiveDateTime::parse_from_str(candidate, format) {
                parsed = Some(naive);
                break;
            }
        }
    }

    // A DST gap can make a local time unrepresentable; fail closed.
    parsed.and_then(|naive| tz.from_local_datetime(&naive).earliest())
}

/// Pure window decision: no reads, no caching, fully determined by the
/// stored settings and `now`.
pub fn window_state(window: &WindowSettings, now: DateTime<Utc>) -> WindowState {
    if !window.enabled {
        return WindowState::Disabled;
    }

    let (start_raw, end_raw) = match (&window.start, &window.end) {
        (Some(start), Some(end)) if !start.is_empty() && !end.is_empty() => (start, end),
        _ => return WindowState::NotConfigured,
    };

    let tz: Tz = match window.timezone.parse() {
        Ok(tz) => tz,
        Err(_) => {
            debug!("invalid timezone in settings: {}", window.timezone);
            return WindowState::InvalidTimezone;
        }
    };

    let (start, end) = match (
        parse_local_datetime(start_raw, tz),
        parse_local_datetime(end_raw, tz),
    ) {
        (Some(start), Some(end)) => (start, end),
        _ => {
            debug!(
                "unparseable window dates: start={:?} end={:?}",
                start_raw, end_raw
            );
            return WindowState::InvalidDates;
        }
    };

    let now_local = now.with_timezone(&tz);
    if now_local < start {
        WindowState::Pending
    } else if now_local > end {
        WindowState::Ended
    } else {
        WindowState::Active {
            ends_at: end.with_timezone(&Utc),
        }
    }
}

pub struct WindowEvaluator {
    settings: Arc<SettingsStore>,
    transients: Arc<TransientStore>,
}

impl WindowEvaluator {
    pub fn new(settings: Arc<SettingsStore>, transients: Arc<TransientStore>) -> Self {
        Self {
            settings,
            transients,
        }
    }

    /// Should the maintenance page be shown right now?
    ///
    /// Checks the enabled flag first (no further reads when off), then the
    /// cached facts, and only then reads and parses the full window.
    pub async fn should_show_maintenance(&self) -> bool {
        let enabled = match self.settings.get_bool(keys::ENABLED, false).await {
            Ok(enabled) => enabled,
            Err(e) => {
                debug!("settings read failed, treating as not in maintenance: {}", e);
                return false;
            }
        };
        if !enabled {
            return false;
        }

        if self.transients.get(WINDOW_ENDED_KEY).await.is_some() {
            return false;
        }
        if self.transients.get(WINDOW_ACTIVE_KEY).await.is_some() {
            return true;
        }

        let state = self.evaluate_and_cache().await;
        state.is_active()
    }

    /// Full evaluation, bypassing the cached facts but refreshing them.
    /// Used by the transition watcher and the debug endpoint.
    pub async fn current_state(&self) -> WindowState {
        self.evaluate_and_cache().await
    }

    async fn evaluate_and_cache(&self) -> WindowState {
        let window = match self.settings.window().await {
            Ok(window) => window,
            Err(e) => {
                debug!("settings read failed, treating as not in maintenance: {}", e);
                return WindowState::NotConfigured;
            }
        };

        let state = window_state(&window, Utc::now());
        match &state {
            WindowState::Ended => {
                self.transients
                    .set(
                        WINDOW_ENDED_KEY,
                        "1",
                        Duration::hours(cache::WINDOW_ENDED_TTL_HOURS),
                    )
                    .await;
            }
            WindowState::Active { ends_at } => {
                let remaining = *ends_at - Utc::now();
                self.transients
                    .set(WINDOW_ACTIVE_KEY, "1", remaining)
                    .await;
            }
            _ => {}
        }
        state
    }
}
