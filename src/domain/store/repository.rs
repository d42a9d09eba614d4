//! Override store trait definition

use async_trait::async_trait;

use crate::domain::feature::{FeatureId, FeatureOverride, ModelOverride};
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Persistence contract for feature overrides.
///
/// `Ok(None)` from `get` means "no override" and is never an error; any
/// failure to reach or use the backend must surface as `Err`. The resolver
/// relies on that distinction to decide between serving a fallback and
/// logging an outage.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait OverrideStore: Send + Sync {
    /// Reads the override for a feature
    async fn get(&self, feature_id: &FeatureId) -> Result<Option<ModelOverride>, DomainError>;

    /// Upserts an override (full replace), stamping `updated_at`
    async fn set(&self, feature_id: &FeatureId, model_override: ModelOverride)
        -> Result<(), DomainError>;

    /// Removes an override; removing a missing key succeeds
    async fn delete(&self, feature_id: &FeatureId) -> Result<(), DomainError>;

    /// Enumerates every persisted override
    async fn list(&self) -> Result<Vec<FeatureOverride>, DomainError>;

    /// Checks the backend is reachable without enumerating records
    async fn health_check(&self) -> Result<bool, DomainError>;
}
