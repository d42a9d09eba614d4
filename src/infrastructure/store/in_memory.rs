//! In-memory override store

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use async_trait::async_trait;

use crate::domain::{DomainError, FeatureId, FeatureOverride, ModelOverride, OverrideStore};

#[derive(Debug, Clone)]
struct StoredOverride {
    model_override: ModelOverride,
    expires_at: Option<Instant>,
}

impl StoredOverride {
    fn is_expired(&self) -> bool {
        self.expires_at
            .map(|deadline| Instant::now() >= deadline)
            .unwrap_or(false)
    }
}

/// Thread-safe in-memory override store
///
/// Data is lost when the process terminates. Entries may optionally expire
/// after `entry_ttl`; a zero TTL keeps them until deleted.
#[derive(Debug)]
pub struct InMemoryOverrideStore {
    entries: RwLock<HashMap<FeatureId, StoredOverride>>,
    entry_ttl: Duration,
}

impl Default for InMemoryOverrideStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryOverrideStore {
    /// Creates an empty store whose entries never expire
    pub fn new() -> Self {
        Self::with_entry_ttl(Duration::ZERO)
    }

    /// Creates an empty store whose entries expire after `entry_ttl`
    pub fn with_entry_ttl(entry_ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            entry_ttl,
        }
    }

    fn deadline(&self) -> Option<Instant> {
        if self.entry_ttl.is_zero() {
            None
        } else {
            Some(Instant::now() + self.entry_ttl)
        }
    }
}

#[async_trait]
impl OverrideStore for InMemoryOverrideStore {
    async fn get(&self, feature_id: &FeatureId) -> Result<Option<ModelOverride>, DomainError> {
        let entries = self.entries.read().map_err(|e| {
            DomainError::storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(entries
            .get(feature_id)
            .filter(|entry| !entry.is_expired())
            .map(|entry| entry.model_override.clone()))
    }

    async fn set(
        &self,
        feature_id: &FeatureId,
        model_override: ModelOverride,
    ) -> Result<(), DomainError> {
        let mut entries = self.entries.write().map_err(|e| {
            DomainError::storage(format!("Failed to acquire write lock: {}", e))
        })?;

        entries.insert(
            feature_id.clone(),
            StoredOverride {
                model_override: model_override.stamped_now(),
                expires_at: self.deadline(),
            },
        );
        Ok(())
    }

    async fn delete(&self, feature_id: &FeatureId) -> Result<(), DomainError> {
        let mut entries = self.entries.write().map_err(|e| {
            DomainError::storage(format!("Failed to acquire write lock: {}", e))
        })?;

        entries.remove(feature_id);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<FeatureOverride>, DomainError> {
        let mut entries = self.entries.write().map_err(|e| {
            DomainError::storage(format!("Failed to acquire write lock: {}", e))
        })?;

        entries.retain(|_, entry| !entry.is_expired());

        Ok(entries
            .iter()
            .map(|(feature_id, entry)| FeatureOverride {
                feature_id: feature_id.clone(),
                model_override: entry.model_override.clone(),
            })
            .collect())
    }

    async fn health_check(&self) -> Result<bool, DomainError> {
        self.entries.read().map_err(|e| {
            DomainError::storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(true)
    }
}
