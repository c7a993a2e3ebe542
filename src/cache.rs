use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use crate::clock::Clock;
use crate::models::WeatherData;

struct StoredEntry {
    value: WeatherData,
    expires_at: i64, // epoch milliseconds
}

/// In-memory weather cache with a fixed time-to-live.
/// A zero TTL disables storage entirely.
pub struct WeatherCache {
    ttl: Duration,
    clock: Arc<dyn Clock>,
    entries: Mutex<HashMap<String, StoredEntry>>,
}

impl WeatherCache {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl,
            clock,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        !self.ttl.is_zero()
    }

    fn now_ms(&self) -> i64 {
        self.clock.now().timestamp_millis()
    }

    /// Returns `None` for misses and expired entries; expired entries are evicted.
    #[tracing::instrument(name = "query_cache", level = "debug", skip(self))]
    pub async fn get(&self, key: &str) -> Option<WeatherData> {
        if !self.is_enabled() {
            return None;
        }
        let mut entries = self.entries.lock().await;
        let now = self.now_ms();
        match entries.get(key) {
            Some(entry) if now < entry.expires_at => {
                tracing::debug!("Key found and still fresh");
                Some(entry.value.clone())
            }
            Some(_) => {
                tracing::debug!("Key found but expired");
                entries.remove(key);
                None
            }
            None => {
                tracing::debug!("Key not found");
                None
            }
        }
    }

    #[tracing::instrument(name = "put_cache", level = "debug", skip(self, value))]
    pub async fn put(&self, key: &str, value: WeatherData) {
        if !self.is_enabled() {
            return;
        }
        let ttl_ms = i64::try_from(self.ttl.as_millis()).unwrap_or(i64::MAX);
        let expires_at = self.now_ms().saturating_add(ttl_ms);
        self.entries
            .lock()
            .await
            .insert(key.to_string(), StoredEntry { value, expires_at });
    }

    pub async fn entry_count(&self) -> usize {
        self.entries.lock().await.len()
    }
}
