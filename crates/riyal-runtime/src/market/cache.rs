//! In-memory quote cache
//!
//! Quote lookups are cached per symbol with a freshness window so repeated
//! market calls inside one script do not hammer the quote API.

use std::collections::HashMap;
use std::time::{Duration, SystemTime};

/// Default freshness window for cached market data
pub const DEFAULT_TTL: Duration = Duration::from_secs(60);

/// A cached value with its creation time
#[derive(Debug, Clone)]
struct CachedEntry<T> {
    value: T,
    cached_at: SystemTime,
}

impl<T> CachedEntry<T> {
    fn new(value: T) -> Self {
        Self {
            value,
            cached_at: SystemTime::now(),
        }
    }

    fn is_valid(&self, ttl: Duration) -> bool {
        match self.cached_at.elapsed() {
            Ok(elapsed) => elapsed < ttl,
            Err(_) => false,
        }
    }
}

/// Time-bounded in-memory cache keyed by symbol
#[derive(Debug)]
pub struct MarketCache<T> {
    entries: HashMap<String, CachedEntry<T>>,
    ttl: Duration,
}

impl<T: Clone> MarketCache<T> {
    /// Create a cache with the default 60-second freshness window
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_TTL)
    }

    /// Create a cache with a custom freshness window
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
        }
    }

    /// Get a cached value if it is still fresh
    pub fn get(&self, key: &str) -> Option<T> {
        self.entries.get(key).and_then(|entry| {
            if entry.is_valid(self.ttl) {
                Some(entry.value.clone())
            } else {
                None
            }
        })
    }

    /// Store a value under a key
    pub fn set(&mut self, key: impl Into<String>, value: T) {
        self.entries.insert(key.into(), CachedEntry::new(value));
    }

    /// Drop expired entries
    pub fn cleanup(&mut self) {
        let ttl = self.ttl;
        self.entries.retain(|_, entry| entry.is_valid(ttl));
    }

    /// Number of entries, fresh or not
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the cache holds nothing
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: Clone> Default for MarketCache<T> {
    fn default() -> Self {
        Self::new()
    }
}
