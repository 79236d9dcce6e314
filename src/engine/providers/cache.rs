//! Explicit TTL cache, passed to provider constructors rather than kept as
//! ambient module-global state (spec.md §9: "caches as process-wide shared
//! state... model the cache as one explicit dependency"). A simple
//! `Mutex<HashMap>` suffices — Redis is a deployment choice, not a design
//! choice.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

struct Entry {
    value: String,
    expires_at: Instant,
}

/// Process-wide, concurrency-safe TTL key/value cache shared by all
/// providers and the metrics counters (spec.md §6: `metrics:<name>` keys
/// live in the same KV).
pub struct Cache {
    inner: Mutex<HashMap<String, Entry>>,
}

impl Default for Cache {
    fn default() -> Self {
        Self::new()
    }
}

impl Cache {
    pub fn new() -> Self {
        Cache { inner: Mutex::new(HashMap::new()) }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        let mut guard = self.inner.lock().expect("cache mutex poisoned");
        match guard.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Some(entry.value.clone()),
            Some(_) => {
                guard.remove(key);
                None
            }
            None => None,
        }
    }

    pub fn set(&self, key: impl Into<String>, value: impl Into<String>, ttl: Duration) {
        let mut guard = self.inner.lock().expect("cache mutex poisoned");
        guard.insert(key.into(), Entry { value: value.into(), expires_at: Instant::now() + ttl });
    }

    /// Atomically increments a counter keyed `metrics:<name>` and returns
    /// the post-increment value. Never expires.
    pub fn incr(&self, key: &str) -> i64 {
        let mut guard = self.inner.lock().expect("cache mutex poisoned");
        let current = guard
            .get(key)
            .map(|e| e.value.parse::<i64>().unwrap_or(0))
            .unwrap_or(0)
            + 1;
        guard.insert(
            key.to_string(),
            Entry { value: current.to_string(), expires_at: Instant::now() + Duration::from_secs(u64::MAX / 2) },
        );
        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_get_roundtrip() {
        let c = Cache::new();
        c.set("k", "v", Duration::from_secs(60));
        assert_eq!(c.get("k"), Some("v".to_string()));
    }

    #[test]
    fn expired_entry_is_gone() {
        let c = Cache::new();
        c.set("k", "v", Duration::from_millis(0));
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(c.get("k"), None);
    }

    #[test]
    fn incr_accumulates() {
        let c = Cache::new();
        assert_eq!(c.incr("metrics:x"), 1);
        assert_eq!(c.incr("metrics:x"), 2);
    }
}
