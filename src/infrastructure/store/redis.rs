//! Redis override store

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};

use crate::domain::{DomainError, FeatureId, FeatureOverride, ModelOverride, OverrideStore};

/// Default namespace for override keys
pub const DEFAULT_KEY_PREFIX: &str = "modelkit:overrides:";

const SCAN_BATCH: usize = 100;

/// Configuration for the Redis store
#[derive(Debug, Clone)]
pub struct RedisStoreConfig {
    /// Redis connection URL (e.g., "redis://127.0.0.1:6379")
    pub url: String,
    /// Prefix prepended to every feature ID
    pub key_prefix: String,
    /// Upper bound on establishing the initial connection
    pub connect_timeout: Duration,
}

impl Default for RedisStoreConfig {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379".to_string(),
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            connect_timeout: Duration::from_secs(5),
        }
    }
}

impl RedisStoreConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }
}

/// Override store backed by Redis string keys holding the JSON wire shape
///
/// Enumeration uses `SCAN MATCH <prefix>*`, never `KEYS`.
#[derive(Clone)]
pub struct RedisOverrideStore {
    connection: ConnectionManager,
    config: RedisStoreConfig,
}

impl fmt::Debug for RedisOverrideStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisOverrideStore")
            .field("config", &self.config)
            .field("connection", &"<ConnectionManager>")
            .finish()
    }
}

impl RedisOverrideStore {
    /// Connects to Redis
    pub async fn new(config: RedisStoreConfig) -> Result<Self, DomainError> {
        let client = Client::open(config.url.as_str())
            .map_err(|e| DomainError::storage(format!("Failed to create Redis client: {}", e)))?;

        let connection = tokio::time::timeout(config.connect_timeout, ConnectionManager::new(client))
            .await
            .map_err(|_| {
                DomainError::storage(format!(
                    "Timed out connecting to Redis after {:?}",
                    config.connect_timeout
                ))
            })?
            .map_err(|e| DomainError::storage(format!("Failed to connect to Redis: {}", e)))?;

        Ok(Self { connection, config })
    }

    fn key(&self, feature_id: &FeatureId) -> String {
        prefixed_key(&self.config.key_prefix, feature_id)
    }

    async fn scan_keys(&self) -> Result<Vec<String>, DomainError> {
        let pattern = format!("{}*", self.config.key_prefix);
        let mut conn = self.connection.clone();
        let mut cursor = 0u64;
        let mut keys = Vec::new();

        loop {
            let (next_cursor, batch): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut conn)
                .await
                .map_err(|e| {
                    DomainError::storage(format!("Failed to scan keys '{}': {}", pattern, e))
                })?;

            keys.extend(batch);
            cursor = next_cursor;

            if cursor == 0 {
                break;
            }
        }

        // SCAN may return a key more than once
        keys.sort();
        keys.dedup();

        Ok(keys)
    }

    /// Removes every override under this store's prefix
    pub async fn clear(&self) -> Result<usize, DomainError> {
        let keys = self.scan_keys().await?;

        if keys.is_empty() {
            return Ok(0);
        }

        let mut conn = self.connection.clone();
        let deleted: i64 = conn
            .del(&keys)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete keys: {}", e)))?;

        Ok(deleted as usize)
    }
}

fn prefixed_key(prefix: &str, feature_id: &FeatureId) -> String {
    format!("{}{}", prefix, feature_id)
}

fn feature_id_from_key(prefix: &str, key: &str) -> Option<FeatureId> {
    key.strip_prefix(prefix)
        .and_then(|id| FeatureId::new(id).ok())
}

/// Unparseable records are reported and treated as absent
fn decode_override(feature_id: &FeatureId, data: &str) -> Option<ModelOverride> {
    match serde_json::from_str(data) {
        Ok(model_override) => Some(model_override),
        Err(e) => {
            tracing::error!(
                feature_id = %feature_id,
                error = %e,
                "Failed to parse stored override"
            );
            None
        }
    }
}

#[async_trait]
impl OverrideStore for RedisOverrideStore {
    async fn get(&self, feature_id: &FeatureId) -> Result<Option<ModelOverride>, DomainError> {
        let key = self.key(feature_id);
        let mut conn = self.connection.clone();

        let data: Option<String> = conn.get(&key).await.map_err(|e| {
            DomainError::storage(format!("Failed to get key '{}': {}", key, e))
        })?;

        Ok(data.and_then(|data| decode_override(feature_id, &data)))
    }

    async fn set(
        &self,
        feature_id: &FeatureId,
        model_override: ModelOverride,
    ) -> Result<(), DomainError> {
        let key = self.key(feature_id);
        let data = serde_json::to_string(&model_override.stamped_now()).map_err(|e| {
            DomainError::internal(format!("Failed to serialize override: {}", e))
        })?;

        let mut conn = self.connection.clone();
        let _: () = conn
            .set(&key, data)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to set key '{}': {}", key, e)))?;

        Ok(())
    }

    async fn delete(&self, feature_id: &FeatureId) -> Result<(), DomainError> {
        let key = self.key(feature_id);
        let mut conn = self.connection.clone();

        let _: i64 = conn.del(&key).await.map_err(|e| {
            DomainError::storage(format!("Failed to delete key '{}': {}", key, e))
        })?;

        Ok(())
    }

    async fn list(&self) -> Result<Vec<FeatureOverride>, DomainError> {
        let keys = self.scan_keys().await?;

        if keys.is_empty() {
            return Ok(Vec::new());
        }

        let mut conn = self.connection.clone();
        let values: Vec<Option<String>> = redis::cmd("MGET")
            .arg(&keys)
            .query_async(&mut conn)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to read overrides: {}", e)))?;

        // Keys deleted between SCAN and MGET come back as nil and are skipped
        Ok(keys
            .iter()
            .zip(values)
            .filter_map(|(key, value)| {
                let feature_id = feature_id_from_key(&self.config.key_prefix, key)?;
                let model_override = decode_override(&feature_id, &value?)?;

                Some(FeatureOverride {
                    feature_id,
                    model_override,
                })
            })
            .collect())
    }

    async fn health_check(&self) -> Result<bool, DomainError> {
        let mut conn = self.connection.clone();

        let reply: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| DomainError::storage(format!("Redis health check failed: {}", e)))?;

        Ok(reply == "PONG")
    }
}
