//! Store factory for runtime backend selection

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::{DomainError, OverrideStore};

use super::file::FileOverrideStore;
use super::in_memory::InMemoryOverrideStore;
use super::redis::{RedisOverrideStore, RedisStoreConfig};

/// Supported store backends
#[derive(Debug, Clone, Default, PartialEq)]
pub enum StoreType {
    /// Process-local map
    #[default]
    InMemory,
    /// Redis string keys
    Redis,
    /// JSON document on disk
    File,
}

impl std::fmt::Display for StoreType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreType::InMemory => write!(f, "memory"),
            StoreType::Redis => write!(f, "redis"),
            StoreType::File => write!(f, "file"),
        }
    }
}

impl std::str::FromStr for StoreType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" | "in_memory" | "inmemory" => Ok(StoreType::InMemory),
            "redis" => Ok(StoreType::Redis),
            "file" | "json" => Ok(StoreType::File),
            _ => Err(DomainError::configuration(format!(
                "Unknown store type: {}. Valid types: memory, redis, file",
                s
            ))),
        }
    }
}

/// Configuration for the store factory
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub store_type: StoreType,
    /// Redis URL (required for Redis)
    pub redis_url: Option<String>,
    /// Key prefix (Redis only)
    pub key_prefix: Option<String>,
    /// Document path (required for File)
    pub path: Option<PathBuf>,
    /// Entry expiry (memory only); zero keeps entries until deleted
    pub entry_ttl: Duration,
    /// Initial connection bound (Redis only)
    pub connect_timeout: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            store_type: StoreType::InMemory,
            redis_url: None,
            key_prefix: None,
            path: None,
            entry_ttl: Duration::ZERO,
            connect_timeout: Duration::from_secs(5),
        }
    }
}

impl StoreConfig {
    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn redis(url: impl Into<String>) -> Self {
        Self {
            store_type: StoreType::Redis,
            redis_url: Some(url.into()),
            ..Default::default()
        }
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            store_type: StoreType::File,
            path: Some(path.into()),
            ..Default::default()
        }
    }

    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = Some(prefix.into());
        self
    }

    pub fn with_entry_ttl(mut self, ttl: Duration) -> Self {
        self.entry_ttl = ttl;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }
}

/// Factory for creating store instances
#[derive(Debug, Default)]
pub struct StoreFactory;

impl StoreFactory {
    pub fn new() -> Self {
        Self
    }

    /// Creates a store based on configuration
    pub async fn create(&self, config: &StoreConfig) -> Result<Arc<dyn OverrideStore>, DomainError> {
        match config.store_type {
            StoreType::InMemory => Ok(Arc::new(InMemoryOverrideStore::with_entry_ttl(
                config.entry_ttl,
            ))),
            StoreType::Redis => {
                let url = config.redis_url.clone().ok_or_else(|| {
                    DomainError::configuration("Redis URL is required for Redis store type")
                })?;

                let mut redis_config =
                    RedisStoreConfig::new(url).with_connect_timeout(config.connect_timeout);

                if let Some(prefix) = &config.key_prefix {
                    redis_config = redis_config.with_key_prefix(prefix.clone());
                }

                Ok(Arc::new(RedisOverrideStore::new(redis_config).await?))
            }
            StoreType::File => {
                let path = config.path.clone().ok_or_else(|| {
                    DomainError::configuration("A path is required for file store type")
                })?;

                Ok(Arc::new(FileOverrideStore::open(path).await?))
            }
        }
    }
}
