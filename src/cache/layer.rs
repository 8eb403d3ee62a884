//! Cache layer: time-boxed JSON entries over a pluggable store.

use chrono::Utc;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

use super::traits::Store;

/// How long a cached response stays valid: 7 days, in milliseconds.
pub const CACHE_TTL_MILLIS: i64 = 7 * 24 * 60 * 60 * 1000;

/// Serialized envelope for one cached value.
#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry<T> {
  data: T,
  /// Write time, epoch milliseconds.
  timestamp: i64,
}

/// Expiring cache over a shared [`Store`].
///
/// Reads are lazy-invalidating: an expired or unreadable entry reads as a
/// miss and its bytes stay in place until [`sweep_expired`] runs. Writes are
/// best-effort: a full store triggers one sweep and one retry, and a second
/// failure is logged and swallowed so the read path never blocks on caching.
///
/// [`sweep_expired`]: ExpiringCache::sweep_expired
pub struct ExpiringCache {
  store: Arc<dyn Store>,
  ttl_millis: i64,
  /// Key prefixes this cache owns. The sweep refuses to touch anything else
  /// (the favorites set shares the store under an unprefixed key).
  prefixes: &'static [&'static str],
}

impl ExpiringCache {
  /// Create a cache over the given store, sweeping only the given prefixes.
  pub fn new(store: Arc<dyn Store>, prefixes: &'static [&'static str]) -> Self {
    Self {
      store,
      ttl_millis: CACHE_TTL_MILLIS,
      prefixes,
    }
  }

  /// Override the entry lifetime.
  #[allow(dead_code)]
  pub fn with_ttl(mut self, ttl: chrono::Duration) -> Self {
    self.ttl_millis = ttl.num_milliseconds();
    self
  }

  fn is_fresh(&self, timestamp: i64, now: i64) -> bool {
    now - timestamp < self.ttl_millis
  }

  /// Read a value if it is present and still within its lifetime.
  ///
  /// Never mutates storage: misses, expired entries, and corrupt entries all
  /// return `None` and leave the store untouched.
  pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
    let raw = match self.store.get(key) {
      Ok(Some(raw)) => raw,
      Ok(None) => return None,
      Err(e) => {
        debug!("cache read for {} failed: {}", key, e);
        return None;
      }
    };

    let entry: CacheEntry<T> = match serde_json::from_str(&raw) {
      Ok(entry) => entry,
      Err(e) => {
        // Corrupt entries read as misses; the sweep removes them later.
        debug!("cache entry {} is unreadable: {}", key, e);
        return None;
      }
    };

    if self.is_fresh(entry.timestamp, Utc::now().timestamp_millis()) {
      Some(entry.data)
    } else {
      None
    }
  }

  /// Write a value stamped with the current time.
  ///
  /// Returns whether the value actually landed in the store. A first write
  /// failure triggers one expiry sweep and one retry; after that the failure
  /// is logged and accepted.
  pub fn put<T: Serialize>(&self, key: &str, value: &T) -> bool {
    let entry = CacheEntry {
      data: value,
      timestamp: Utc::now().timestamp_millis(),
    };

    let json = match serde_json::to_string(&entry) {
      Ok(json) => json,
      Err(e) => {
        warn!("could not serialize cache entry {}: {}", key, e);
        return false;
      }
    };

    if self.store.set(key, &json).is_ok() {
      return true;
    }

    let removed = self.sweep_expired();
    match self.store.set(key, &json) {
      Ok(()) => true,
      Err(e) => {
        warn!(
          "cache write for {} failed after sweeping {} entries: {}",
          key, removed, e
        );
        false
      }
    }
  }

  /// Remove every owned entry whose lifetime has elapsed.
  ///
  /// Entries that no longer parse count as expired. Returns how many entries
  /// were removed.
  pub fn sweep_expired(&self) -> usize {
    let keys = match self.store.keys() {
      Ok(keys) => keys,
      Err(e) => {
        warn!("cache sweep could not scan keys: {}", e);
        return 0;
      }
    };

    let now = Utc::now().timestamp_millis();
    let mut removed = 0;

    for key in keys {
      if !self.prefixes.iter().any(|p| key.starts_with(p)) {
        continue;
      }

      let stale = match self.store.get(&key) {
        Ok(Some(raw)) => match serde_json::from_str::<CacheEntry<serde_json::Value>>(&raw) {
          Ok(entry) => !self.is_fresh(entry.timestamp, now),
          Err(_) => true,
        },
        _ => false,
      };

      if stale && self.store.remove(&key).is_ok() {
        removed += 1;
      }
    }

    if removed > 0 {
      debug!("swept {} expired cache entries", removed);
    }
    removed
  }
}

impl Clone for ExpiringCache {
  fn clone(&self) -> Self {
    Self {
      store: Arc::clone(&self.store),
      ttl_millis: self.ttl_millis,
      prefixes: self.prefixes,
    }
  }
}
