//! Process-local expiring cache of resolved model IDs

use std::fmt;
use std::time::{Duration, Instant};

use moka::sync::Cache as MokaCache;

use crate::domain::feature::FeatureId;

/// Where a cached resolution came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionSource {
    /// A persisted override read from the store
    Store,
    /// A registry default or caller-supplied fallback
    Fallback,
}

impl fmt::Display for ResolutionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionSource::Store => write!(f, "store"),
            ResolutionSource::Fallback => write!(f, "fallback"),
        }
    }
}

/// Longest accepted cache TTL; moka rejects lifetimes approaching 1000 years
pub const MAX_CACHE_TTL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Cached resolution with the time it was fetched
#[derive(Debug, Clone)]
pub struct CachedResolution {
    pub model_id: String,
    pub source: ResolutionSource,
    fetched_at: Instant,
}

impl CachedResolution {
    pub fn new(model_id: impl Into<String>, source: ResolutionSource) -> Self {
        Self {
            model_id: model_id.into(),
            source,
            fetched_at: Instant::now(),
        }
    }

    pub fn fetched_at(&self) -> Instant {
        self.fetched_at
    }

    /// A zero TTL never expires
    pub fn is_fresh(&self, ttl: Duration) -> bool {
        ttl.is_zero() || self.fetched_at.elapsed() < ttl
    }
}

/// Expiring map from feature ID to its last resolution.
///
/// Operations are synchronous and never suspend. Entries are valid only while
/// `now - fetched_at < ttl`; stale entries read as absent and are dropped.
/// The moka TTL only reclaims memory, freshness is decided by `fetched_at`.
pub struct ResolutionCache {
    entries: MokaCache<FeatureId, CachedResolution>,
    ttl: Duration,
}

impl ResolutionCache {
    /// Creates an unbounded cache
    pub fn new(ttl: Duration) -> Self {
        Self::with_capacity(ttl, None)
    }

    /// Creates a cache, optionally bounded to `capacity` entries
    pub fn with_capacity(ttl: Duration, capacity: Option<u64>) -> Self {
        let mut builder = MokaCache::builder();

        if let Some(capacity) = capacity {
            builder = builder.max_capacity(capacity);
        }

        // Entries outliving MAX_CACHE_TTL are reclaimed early
        if !ttl.is_zero() {
            builder = builder.time_to_live(ttl.min(MAX_CACHE_TTL));
        }

        Self {
            entries: builder.build(),
            ttl,
        }
    }

    /// Returns the entry for `key` unless it is missing or expired
    pub fn get(&self, key: &FeatureId) -> Option<CachedResolution> {
        let entry = self.entries.get(key)?;

        if entry.is_fresh(self.ttl) {
            Some(entry)
        } else {
            self.entries.invalidate(key);
            None
        }
    }

    /// Stores `entry`, replacing any existing one
    pub fn set(&self, key: &FeatureId, entry: CachedResolution) {
        self.entries.insert(key.clone(), entry);
    }

    /// Removes the entry for `key`; absent keys are a no-op
    pub fn delete(&self, key: &FeatureId) {
        self.entries.invalidate(key);
    }

    pub fn clear(&self) {
        self.entries.invalidate_all();
    }

    /// Approximate number of live entries
    pub fn len(&self) -> u64 {
        self.entries.run_pending_tasks();
        self.entries.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for ResolutionCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolutionCache")
            .field("ttl", &self.ttl)
            .field("entries", &self.entries.entry_count())
            .finish()
    }
}
