//! In-process cache for geocode results.
//!
//! Keyed by a hash of the normalized address. Fallback results are cached
//! with the same TTL as real hits so poorly-resolving addresses do not hammer
//! the providers on every request. Size-unbounded: the address cardinality of
//! one deployment stays small.

use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::traits::GeocodeResult;

/// Cache key for a normalized address.
pub fn cache_key(normalized_address: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    normalized_address.hash(&mut hasher);
    hasher.finish()
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: GeocodeResult,
    expires_at: Instant,
}

/// TTL-expiring geocode cache, safe to share across request handlers.
///
/// Writes are last-write-wins; a result for a given key is deterministic
/// enough that races only trade one valid entry for another.
#[derive(Debug)]
pub struct GeocodeCache {
    ttl: Duration,
    entries: Mutex<HashMap<u64, CacheEntry>>,
}

impl GeocodeCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn get(&self, key: u64) -> Option<GeocodeResult> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        match entries.get(&key) {
            Some(entry) if entry.expires_at > Instant::now() => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(&key);
                None
            }
            None => None,
        }
    }

    pub fn put(&self, key: u64, value: GeocodeResult) {
        let entry = CacheEntry {
            value,
            expires_at: Instant::now() + self.ttl,
        };
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key, entry);
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
