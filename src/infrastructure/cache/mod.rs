//! Cache infrastructure - local expiring resolution cache

mod resolution;

pub use resolution::{CachedResolution, MAX_CACHE_TTL, ResolutionCache, ResolutionSource};
