//! In-process expiring key-value cache for derived facts.
//!
//! Holds the window evaluator's cached conclusions ("window ended",
//! "window active") so the hot path can skip date parsing. Entries carry
//! their own expiry; the store is cleared whenever settings are saved.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::debug;

/// Fact key: the configured window has already ended
pub const WINDOW_ENDED_KEY: &str = "window_ended";
/// Fact key: the configured window is currently active
pub const WINDOW_ACTIVE_KEY: &str = "window_active";

#[derive(Debug, Clone, Serialize)]
pub struct Transient {
    pub value: String,
    pub expires_at: DateTime<Utc>,
}

pub struct TransientStore {
    entries: Arc<RwLock<HashMap<String, Transient>>>,
}

impl TransientStore {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Store a value that expires after `ttl`. A non-positive ttl is a no-op.
    pub async fn set(&self, key: &str, value: &str, ttl: Duration) {
        if ttl <= Duration::zero() {
            return;
        }
        let mut entries = self.entries.write().await;
        entries.insert(
            key.to_string(),
            Transient {
                value: value.to_string(),
                expires_at: Utc::now() + ttl,
            },
        );
        debug!("transient set: {} (ttl {}s)", key, ttl.num_seconds());
    }

    /// Fetch a value, treating expired entries as absent.
    pub async fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.read().await;
        match entries.get(key) {
            Some(entry) if entry.expires_at > Utc::now() => Some(entry.value.clone()),
            _ => None,
        }
    }

    pub async fn remove(&self, key: &str) {
        let mut entries = self.entries.write().await;
        entries.remove(key);
    }

    /// Drop the cached window facts, forcing the next evaluation to
    /// re-read and re-parse the configured window.
    pub async fn clear_window_facts(&self) {
        let mut entries = self.entries.write().await;
        entries.remove(WINDOW_ENDED_KEY);
        entries.remove(WINDOW_ACTIVE_KEY);
        debug!("cleared cached window facts");
    }

    pub async fn clear(&self) -> usize {
        let mut entries = self.entries.write().await;
        let count = entries.len();
        entries.clear();
        count
    }

    /// Remove expired entries. Called periodically by the watcher.
    pub async fn sweep_expired(&self) -> usize {
        let mut entries = self.entries.write().await;
        let now = Utc::now();
        let initial = entries.len();
        entries.retain(|_, entry| entry.expires_at > now);
        initial - entries.len()
    }

    /// Snapshot of live entries for the debug endpoint
    pub async fn snapshot(&self) -> HashMap<String, Transient> {
        let entries = self.entries.read().await;
        let now = Utc::now();
        entries
            .iter()
            .filter(|(_, entry)| entry.expires_at > now)
            .map(|(key, entry)| (key.clone(), entry.clone()))
            .collect()
    }
}

impl Clone for TransientStore {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

impl Default for TransientStore {
    fn default() -> Self {
        Self::new()
    }
}
