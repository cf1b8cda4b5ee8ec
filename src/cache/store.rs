use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tokio::time::Instant;
use tracing::trace;

use crate::helpers::time::get_instant;

/// Key-value store with store-enforced expiry.
///
/// Expired entries behave exactly like absent ones.
pub trait CacheStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    /// Insert or overwrite `key`. A `ttl_seconds` of 0 keeps the entry until it is deleted.
    fn set(&self, key: &str, value: String, ttl_seconds: u64);

    fn delete(&self, key: &str);

    fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}

impl<S: CacheStore + ?Sized> CacheStore for Arc<S> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: String, ttl_seconds: u64) {
        (**self).set(key, value, ttl_seconds)
    }

    fn delete(&self, key: &str) {
        (**self).delete(key)
    }

    fn contains(&self, key: &str) -> bool {
        (**self).contains(key)
    }
}

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.map(|at| now < at).unwrap_or(true)
    }
}

/// Process-local in-memory store: key -> (value, expiry)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<HashMap<String, Entry>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        let now = get_instant();
        self.inner.read().values().filter(|e| e.is_live(now)).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every expired entry, returning how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = get_instant();
        let mut map = self.inner.write();
        let before = map.len();
        map.retain(|_, e| e.is_live(now));
        before - map.len()
    }
}

impl CacheStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        let now = get_instant();
        {
            let map = self.inner.read();
            match map.get(key) {
                None => return None,
                Some(entry) if entry.is_live(now) => return Some(entry.value.clone()),
                Some(_) => {}
            }
        }

        // lazily evict; re-check since another writer may have refreshed it
        let mut map = self.inner.write();
        if map.get(key).is_some_and(|e| !e.is_live(now)) {
            trace!(key, "evicting expired cache entry");
            map.remove(key);
        }
        None
    }

    fn set(&self, key: &str, value: String, ttl_seconds: u64) {
        let expires_at = (ttl_seconds > 0).then(|| get_instant() + Duration::from_secs(ttl_seconds));
        self.inner
            .write()
            .insert(key.to_owned(), Entry { value, expires_at });
    }

    fn delete(&self, key: &str) {
        self.inner.write().remove(key);
    }
}
