//! JSON file override store

use std::collections::BTreeMap;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{DomainError, FeatureId, FeatureOverride, ModelOverride, OverrideStore};

/// Override store persisted as a single JSON object `{ featureId: override }`
///
/// The whole document is loaded at open and rewritten on every mutation via
/// a temporary file and rename, so readers never see a partial file.
#[derive(Debug)]
pub struct FileOverrideStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<FeatureId, ModelOverride>>,
}

impl FileOverrideStore {
    /// Opens the store, treating a missing file as empty
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, DomainError> {
        let path = path.into();

        let entries = match tokio::fs::read_to_string(&path).await {
            Ok(content) if content.trim().is_empty() => BTreeMap::new(),
            Ok(content) => serde_json::from_str(&content).map_err(|e| {
                DomainError::storage(format!(
                    "Failed to parse override file '{}': {}",
                    path.display(),
                    e
                ))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                return Err(DomainError::storage(format!(
                    "Failed to read override file '{}': {}",
                    path.display(),
                    e
                )))
            }
        };

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    async fn persist(&self, entries: &BTreeMap<FeatureId, ModelOverride>) -> Result<(), DomainError> {
        let data = serde_json::to_string_pretty(entries)
            .map_err(|e| DomainError::internal(format!("Failed to serialize overrides: {}", e)))?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        tokio::fs::write(&tmp, data).await.map_err(|e| {
            DomainError::storage(format!("Failed to write '{}': {}", tmp.display(), e))
        })?;

        tokio::fs::rename(&tmp, &self.path).await.map_err(|e| {
            DomainError::storage(format!(
                "Failed to replace '{}': {}",
                self.path.display(),
                e
            ))
        })
    }
}

#[async_trait]
impl OverrideStore for FileOverrideStore {
    async fn get(&self, feature_id: &FeatureId) -> Result<Option<ModelOverride>, DomainError> {
        Ok(self.entries.lock().await.get(feature_id).cloned())
    }

    async fn set(
        &self,
        feature_id: &FeatureId,
        model_override: ModelOverride,
    ) -> Result<(), DomainError> {
        let mut entries = self.entries.lock().await;
        let mut next = entries.clone();
        next.insert(feature_id.clone(), model_override.stamped_now());

        self.persist(&next).await?;
        *entries = next;
        Ok(())
    }

    async fn delete(&self, feature_id: &FeatureId) -> Result<(), DomainError> {
        let mut entries = self.entries.lock().await;

        if !entries.contains_key(feature_id) {
            return Ok(());
        }

        let mut next = entries.clone();
        next.remove(feature_id);

        self.persist(&next).await?;
        *entries = next;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<FeatureOverride>, DomainError> {
        Ok(self
            .entries
            .lock()
            .await
            .iter()
            .map(|(feature_id, model_override)| FeatureOverride {
                feature_id: feature_id.clone(),
                model_override: model_override.clone(),
            })
            .collect())
    }

    /// Records are served from memory; the document is only touched on writes
    async fn health_check(&self) -> Result<bool, DomainError> {
        Ok(true)
    }
}
