//! In-memory TTL cache for device-search results.
//!
//! Entries are keyed by the exact (trimmed) search term and hold
//! already-sanitized device hits. Invalidation is deliberately coarse:
//! any catalog write that can change search results flushes the whole
//! namespace rather than hunting for affected terms.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use crate::lookup::DeviceHit;

/// Default time-to-live for a cached search result.
pub const DEFAULT_SEARCH_TTL: Duration = Duration::from_secs(60 * 60);

struct CacheEntry {
    cached_at: Instant,
    hits: Vec<DeviceHit>,
}

/// TTL cache shared by the lookup, catalog, and interchange services.
pub struct SearchCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl SearchCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Fetch the cached hits for a term, if present and not expired.
    /// Expired entries are dropped on access.
    pub fn get(&self, term: &str) -> Option<Vec<DeviceHit>> {
        let mut entries = self.lock();
        match entries.get(term) {
            Some(entry) if entry.cached_at.elapsed() <= self.ttl => Some(entry.hits.clone()),
            Some(_) => {
                entries.remove(term);
                None
            }
            None => None,
        }
    }

    /// Store the hits for a term, replacing any previous entry.
    pub fn insert(&self, term: &str, hits: Vec<DeviceHit>) {
        self.lock().insert(
            term.to_string(),
            CacheEntry {
                cached_at: Instant::now(),
                hits,
            },
        );
    }

    /// Drop every cached term.
    pub fn flush_all(&self) {
        let mut entries = self.lock();
        if !entries.is_empty() {
            tracing::debug!(entries = entries.len(), "Flushing device search cache");
        }
        entries.clear();
    }

    /// Number of live entries (expired ones included until touched).
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, CacheEntry>> {
        // A poisoned cache is still just a cache; recover the guard.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for SearchCache {
    fn default() -> Self {
        Self::new(DEFAULT_SEARCH_TTL)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
