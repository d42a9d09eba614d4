//! ModelKit service - override resolution, override writes and listing

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::domain::{
    DomainError, EffectiveConfig, FeatureDefinition, FeatureId, FeatureOverride,
    FeatureRegistry, ModelOverride, OverridePatch, OverrideStore, RegisteredFeature,
};
use crate::infrastructure::cache::{CachedResolution, ResolutionCache, ResolutionSource};

/// Default lifetime of a cached resolution
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60);

/// Default bound on a single store read
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(5);

/// Tuning knobs for a [`ModelKit`] instance
#[derive(Debug, Clone)]
pub struct ModelKitOptions {
    /// Lifetime of cached resolutions; zero never expires
    pub cache_ttl: Duration,
    /// Optional bound on cached features
    pub cache_capacity: Option<u64>,
    /// Bound on store reads; `None` waits for the backend's own timeout
    pub store_timeout: Option<Duration>,
}

impl Default for ModelKitOptions {
    fn default() -> Self {
        Self {
            cache_ttl: DEFAULT_CACHE_TTL,
            cache_capacity: None,
            store_timeout: Some(DEFAULT_STORE_TIMEOUT),
        }
    }
}

impl ModelKitOptions {
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn with_cache_capacity(mut self, capacity: u64) -> Self {
        self.cache_capacity = Some(capacity);
        self
    }

    pub fn with_store_timeout(mut self, timeout: Duration) -> Self {
        self.store_timeout = Some(timeout);
        self
    }

    pub fn without_store_timeout(mut self) -> Self {
        self.store_timeout = None;
        self
    }
}

/// Runtime model configuration client.
///
/// Resolution consults the local cache, then the store, then the fallback
/// (registered definition first, caller-supplied value second). Store
/// failures during resolution are logged and degrade to the fallback; they
/// never reach the caller. Writes, audit reads and listings propagate store
/// failures.
///
/// Each instance owns its cache. A resolution that races a write on the same
/// feature may return the previous value until its cache entry expires.
pub struct ModelKit {
    store: Arc<dyn OverrideStore>,
    registry: Option<FeatureRegistry>,
    cache: ResolutionCache,
    options: ModelKitOptions,
}

impl ModelKit {
    /// Creates a client without a feature registry: every call to
    /// [`ModelKit::get_model_or`] supplies its own fallback and any feature
    /// ID may be overridden.
    pub fn new(store: Arc<dyn OverrideStore>, options: ModelKitOptions) -> Self {
        let cache = ResolutionCache::with_capacity(options.cache_ttl, options.cache_capacity);

        Self {
            store,
            registry: None,
            cache,
            options,
        }
    }

    /// Attaches a feature registry. Definitions become fallbacks, and writes
    /// to unregistered features are rejected.
    pub fn with_registry(mut self, registry: FeatureRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn registry(&self) -> Option<&FeatureRegistry> {
        self.registry.as_ref()
    }

    /// Resolves a feature's model ID using its registered definition as fallback
    pub async fn get_model(&self, feature_id: &str) -> Result<String, DomainError> {
        self.resolve(feature_id, None).await
    }

    /// Resolves a feature's model ID with a caller-supplied fallback
    pub async fn get_model_or(
        &self,
        feature_id: &str,
        fallback_model_id: &str,
    ) -> Result<String, DomainError> {
        self.resolve(feature_id, Some(fallback_model_id)).await
    }

    async fn resolve(
        &self,
        feature_id: &str,
        fallback_model_id: Option<&str>,
    ) -> Result<String, DomainError> {
        let feature_id = FeatureId::new(feature_id)?;

        if let Some(cached) = self.cache.get(&feature_id) {
            debug!(feature_id = %feature_id, source = %cached.source, "Cache hit");
            return Ok(cached.model_id);
        }

        match self.read_store(&feature_id).await {
            Ok(Some(model_override)) => {
                debug!(
                    feature_id = %feature_id,
                    model_id = %model_override.model_id,
                    "Resolved override from store"
                );
                self.cache.set(
                    &feature_id,
                    CachedResolution::new(model_override.model_id.clone(), ResolutionSource::Store),
                );
                return Ok(model_override.model_id);
            }
            Ok(None) => {
                debug!(feature_id = %feature_id, "No override stored");
            }
            Err(e) => {
                warn!(
                    feature_id = %feature_id,
                    error = %e,
                    "Override store unavailable, serving fallback"
                );
            }
        }

        let model_id = self
            .definition(&feature_id)
            .map(|definition| definition.model_id.clone())
            .or_else(|| {
                fallback_model_id
                    .filter(|fallback| !fallback.trim().is_empty())
                    .map(str::to_string)
            })
            .ok_or_else(|| DomainError::feature_not_found(&feature_id))?;

        // Cached so an outage does not hit the failing store on every call
        self.cache.set(
            &feature_id,
            CachedResolution::new(model_id.clone(), ResolutionSource::Fallback),
        );

        Ok(model_id)
    }

    /// Persists an override, then evicts the cached resolution.
    ///
    /// With a registry, a missing `model_id` is taken from the definition and
    /// unknown features are rejected. Eviction only happens once the store
    /// write succeeded.
    pub async fn set_override(
        &self,
        feature_id: &str,
        patch: OverridePatch,
    ) -> Result<(), DomainError> {
        let feature_id = FeatureId::new(feature_id)?;
        self.ensure_registered(&feature_id)?;

        let default_model_id = self
            .definition(&feature_id)
            .map(|definition| definition.model_id.as_str());
        let model_override = patch.into_override(default_model_id)?;
        let model_id = model_override.model_id.clone();

        self.store
            .set(&feature_id, model_override)
            .await
            .inspect_err(|e| {
                warn!(feature_id = %feature_id, error = %e, "Failed to set override");
            })?;

        self.cache.delete(&feature_id);
        info!(feature_id = %feature_id, model_id = %model_id, "Override set");

        Ok(())
    }

    /// Deletes an override, then evicts the cached resolution. Idempotent.
    pub async fn clear_override(&self, feature_id: &str) -> Result<(), DomainError> {
        let feature_id = FeatureId::new(feature_id)?;

        self.store
            .delete(&feature_id)
            .await
            .inspect_err(|e| {
                warn!(feature_id = %feature_id, error = %e, "Failed to clear override");
            })?;

        self.cache.delete(&feature_id);
        info!(feature_id = %feature_id, "Override cleared");

        Ok(())
    }

    /// Reads the effective configuration straight from the store.
    pub async fn get_config(&self, feature_id: &str) -> Result<EffectiveConfig, DomainError> {
        let feature_id = FeatureId::new(feature_id)?;
        let model_override = self.read_store(&feature_id).await?;

        EffectiveConfig::layer(
            &feature_id,
            self.definition(&feature_id),
            model_override.as_ref(),
        )
        .ok_or_else(|| DomainError::feature_not_found(&feature_id))
    }

    /// Lists every persisted override, ordered by feature ID
    pub async fn list_overrides(&self) -> Result<Vec<FeatureOverride>, DomainError> {
        let mut overrides = self.store.list().await?;
        overrides.sort_by(|a, b| a.feature_id.cmp(&b.feature_id));
        Ok(overrides)
    }

    /// Lists registered feature definitions; empty without a registry
    pub fn list_features(&self) -> Vec<RegisteredFeature> {
        self.registry
            .as_ref()
            .map(FeatureRegistry::list)
            .unwrap_or_default()
    }

    /// Checks the store answers within the read bound, without listing records
    pub async fn check_store(&self) -> Result<(), DomainError> {
        if self.bounded(self.store.health_check()).await? {
            Ok(())
        } else {
            Err(DomainError::storage("Override store reported unhealthy"))
        }
    }

    /// Drops the cached resolution for one feature
    pub fn invalidate(&self, feature_id: &str) {
        if let Ok(feature_id) = FeatureId::new(feature_id) {
            self.cache.delete(&feature_id);
        }
    }

    /// Drops every cached resolution
    pub fn invalidate_all(&self) {
        self.cache.clear();
    }

    fn definition(&self, feature_id: &FeatureId) -> Option<&FeatureDefinition> {
        self.registry.as_ref()?.get(feature_id)
    }

    fn ensure_registered(&self, feature_id: &FeatureId) -> Result<(), DomainError> {
        match &self.registry {
            Some(registry) if !registry.contains(feature_id) => {
                Err(DomainError::feature_not_found(feature_id))
            }
            _ => Ok(()),
        }
    }

    async fn read_store(&self, feature_id: &FeatureId) -> Result<Option<ModelOverride>, DomainError> {
        self.bounded(self.store.get(feature_id)).await
    }

    async fn bounded<T>(
        &self,
        call: impl Future<Output = Result<T, DomainError>>,
    ) -> Result<T, DomainError> {
        match self.options.store_timeout {
            Some(limit) => tokio::time::timeout(limit, call).await.map_err(|_| {
                DomainError::storage(format!("Store call timed out after {:?}", limit))
            })?,
            None => call.await,
        }
    }
}

impl fmt::Debug for ModelKit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelKit")
            .field("registry", &self.registry)
            .field("cache", &self.cache)
            .field("options", &self.options)
            .field("store", &"<dyn OverrideStore>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::store::mock::ScriptedOverrideStore;
    use crate::domain::store::MockOverrideStore;
    use crate::domain::{ConfigSource, GenerationParams};

    const SONNET: &str = "anthropic/claude-3.5-sonnet";
    const OPUS: &str = "anthropic/claude-opus-4";

    fn bare(store: Arc<ScriptedOverrideStore>) -> ModelKit {
        ModelKit::new(store, ModelKitOptions::default())
    }

    fn registry() -> FeatureRegistry {
        FeatureRegistry::from_definitions([
            (
                "chatbot",
                FeatureDefinition::new(SONNET)
                    .with_name("Chatbot")
                    .with_params(GenerationParams::new().with_temperature(0.2).with_max_tokens(1024)),
            ),
            ("summarize", FeatureDefinition::new("openai/gpt-4o-mini")),
        ])
        .unwrap()
    }

    fn with_registry(store: Arc<ScriptedOverrideStore>) -> ModelKit {
        ModelKit::new(store, ModelKitOptions::default()).with_registry(registry())
    }

    fn opus_patch() -> OverridePatch {
        OverridePatch::new()
            .with_model_id(OPUS)
            .with_params(GenerationParams::new().with_temperature(0.9).with_max_tokens(4096))
    }

    #[tokio::test]
    async fn test_fallback_on_miss() {
        let kit = bare(Arc::new(ScriptedOverrideStore::new()));

        let model = kit.get_model_or("unconfigured", "fallback/model").await.unwrap();
        assert_eq!(model, "fallback/model");
    }

    #[tokio::test]
    async fn test_override_takes_precedence() {
        let kit = bare(Arc::new(ScriptedOverrideStore::new()));

        kit.set_override("chatbot", OverridePatch::new().with_model_id("X"))
            .await
            .unwrap();

        assert_eq!(kit.get_model_or("chatbot", "Y").await.unwrap(), "X");
    }

    #[tokio::test]
    async fn test_write_evicts_cached_fallback() {
        let store = Arc::new(ScriptedOverrideStore::new());
        let kit = bare(store.clone());

        assert_eq!(kit.get_model_or("chatbot", "Y").await.unwrap(), "Y");

        kit.set_override("chatbot", OverridePatch::new().with_model_id("X"))
            .await
            .unwrap();

        assert_eq!(kit.get_model_or("chatbot", "Y").await.unwrap(), "X");
    }

    #[tokio::test]
    async fn test_clear_reverts_to_fallback() {
        let kit = bare(Arc::new(ScriptedOverrideStore::new()));

        kit.set_override("chatbot", OverridePatch::new().with_model_id("X"))
            .await
            .unwrap();
        assert_eq!(kit.get_model_or("chatbot", "Y").await.unwrap(), "X");

        kit.clear_override("chatbot").await.unwrap();

        assert_eq!(kit.get_model_or("chatbot", "Y").await.unwrap(), "Y");
    }

    #[tokio::test]
    async fn test_store_outage_serves_fallback() {
        let store = Arc::new(ScriptedOverrideStore::new().with_override("chatbot", ModelOverride::new("X")));
        store.set_fail_reads(true);
        let kit = bare(store);

        assert_eq!(kit.get_model_or("chatbot", "Y").await.unwrap(), "Y");
    }

    #[tokio::test]
    async fn test_outage_fallback_is_cached() {
        let store = Arc::new(ScriptedOverrideStore::new());
        store.set_fail_reads(true);
        let kit = bare(store.clone());

        kit.get_model_or("chatbot", "Y").await.unwrap();
        kit.get_model_or("chatbot", "Y").await.unwrap();
        kit.get_model_or("chatbot", "Y").await.unwrap();

        assert_eq!(store.get_calls(), 1);
    }

    #[tokio::test]
    async fn test_ttl_expiry_exposes_store_changes() {
        let store = Arc::new(ScriptedOverrideStore::new());
        let kit = ModelKit::new(
            store.clone(),
            ModelKitOptions::default().with_cache_ttl(Duration::from_millis(100)),
        );

        assert_eq!(kit.get_model_or("chatbot", "Y").await.unwrap(), "Y");

        tokio::time::sleep(Duration::from_millis(150)).await;
        store.put_direct("chatbot", ModelOverride::new("X"));

        assert_eq!(kit.get_model_or("chatbot", "Y").await.unwrap(), "X");
    }

    #[tokio::test]
    async fn test_cache_masks_direct_store_change_within_ttl() {
        let store = Arc::new(ScriptedOverrideStore::new());
        let kit = bare(store.clone());

        assert_eq!(kit.get_model_or("chatbot", "Y").await.unwrap(), "Y");
        store.put_direct("chatbot", ModelOverride::new("X"));

        assert_eq!(kit.get_model_or("chatbot", "Y").await.unwrap(), "Y");

        kit.invalidate("chatbot");
        assert_eq!(kit.get_model_or("chatbot", "Y").await.unwrap(), "X");
    }

    #[tokio::test]
    async fn test_clear_missing_override_succeeds() {
        let kit = bare(Arc::new(ScriptedOverrideStore::new()));
        kit.clear_override("never-set").await.unwrap();
    }

    #[tokio::test]
    async fn test_chatbot_scenario() {
        let kit = bare(Arc::new(ScriptedOverrideStore::new()));
        let before = chrono::Utc::now().timestamp_millis();

        assert_eq!(kit.get_model_or("chatbot", SONNET).await.unwrap(), SONNET);

        kit.set_override("chatbot", opus_patch()).await.unwrap();
        assert_eq!(kit.get_model_or("chatbot", SONNET).await.unwrap(), OPUS);

        let overrides = kit.list_overrides().await.unwrap();
        assert_eq!(overrides.len(), 1);
        assert_eq!(overrides[0].feature_id.as_str(), "chatbot");

        let stored = &overrides[0].model_override;
        assert_eq!(stored.model_id, OPUS);
        assert_eq!(stored.params.temperature, Some(0.9));
        assert_eq!(stored.params.max_tokens, Some(4096));
        assert!(stored.updated_at.unwrap() >= before);

        kit.clear_override("chatbot").await.unwrap();
        assert_eq!(kit.get_model_or("chatbot", SONNET).await.unwrap(), SONNET);
    }

    #[tokio::test]
    async fn test_unknown_feature_without_fallback_is_not_found() {
        let kit = bare(Arc::new(ScriptedOverrideStore::new()));

        let err = kit.get_model("chatbot").await.unwrap_err();
        assert!(err.is_not_found());

        let err = kit.get_model_or("chatbot", "  ").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_unknown_feature_during_outage_is_not_found() {
        let store = Arc::new(ScriptedOverrideStore::new());
        store.set_fail_reads(true);
        let kit = bare(store);

        assert!(kit.get_model("chatbot").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_empty_feature_id_is_validation_error() {
        let kit = bare(Arc::new(ScriptedOverrideStore::new()));

        let err = kit.get_model_or("", "Y").await.unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_slow_store_times_out_to_fallback() {
        let store = Arc::new(
            ScriptedOverrideStore::new()
                .with_override("chatbot", ModelOverride::new("X"))
                .with_read_delay(Duration::from_secs(5)),
        );
        let kit = ModelKit::new(
            store,
            ModelKitOptions::default().with_store_timeout(Duration::from_millis(50)),
        );

        let started = std::time::Instant::now();
        assert_eq!(kit.get_model_or("chatbot", "Y").await.unwrap(), "Y");
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_failed_write_propagates_and_keeps_cache() {
        let store = Arc::new(ScriptedOverrideStore::new());
        let kit = bare(store.clone());

        assert_eq!(kit.get_model_or("chatbot", "Y").await.unwrap(), "Y");

        store.set_fail_writes(true);
        let err = kit
            .set_override("chatbot", OverridePatch::new().with_model_id("X"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Storage { .. }));

        assert_eq!(kit.get_model_or("chatbot", "Y").await.unwrap(), "Y");
        assert_eq!(store.get_calls(), 1);
    }

    #[tokio::test]
    async fn test_failed_clear_propagates() {
        let store = Arc::new(ScriptedOverrideStore::new());
        store.set_fail_writes(true);
        let kit = bare(store);

        assert!(kit.clear_override("chatbot").await.is_err());
    }

    #[tokio::test]
    async fn test_list_overrides_propagates_failure() {
        let store = Arc::new(ScriptedOverrideStore::new());
        store.set_fail_reads(true);
        let kit = bare(store);

        assert!(matches!(
            kit.list_overrides().await,
            Err(DomainError::Storage { .. })
        ));
    }

    #[tokio::test]
    async fn test_list_overrides_sorted() {
        let store = Arc::new(
            ScriptedOverrideStore::new()
                .with_override("zeta", ModelOverride::new("m"))
                .with_override("alpha", ModelOverride::new("m"))
                .with_override("mid", ModelOverride::new("m")),
        );
        let kit = bare(store);

        let ids: Vec<String> = kit
            .list_overrides()
            .await
            .unwrap()
            .into_iter()
            .map(|o| o.feature_id.to_string())
            .collect();

        assert_eq!(ids, vec!["alpha", "mid", "zeta"]);
    }

    #[tokio::test]
    async fn test_bare_mode_requires_model_id() {
        let store = Arc::new(ScriptedOverrideStore::new());
        let kit = bare(store.clone());

        let err = kit
            .set_override("chatbot", OverridePatch::new())
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Validation { .. }));
        assert!(store.stored("chatbot").is_none());
    }

    #[tokio::test]
    async fn test_bare_mode_get_config_returns_override() {
        let kit = bare(Arc::new(ScriptedOverrideStore::new()));

        assert!(kit.get_config("chatbot").await.unwrap_err().is_not_found());

        kit.set_override("chatbot", opus_patch()).await.unwrap();
        let config = kit.get_config("chatbot").await.unwrap();

        assert_eq!(config.model_id, OPUS);
        assert_eq!(config.source, ConfigSource::Override);
        assert!(config.updated_at.is_some());
    }

    #[tokio::test]
    async fn test_get_config_propagates_store_failure() {
        let store = Arc::new(ScriptedOverrideStore::new());
        store.set_fail_reads(true);
        let kit = with_registry(store);

        assert!(matches!(
            kit.get_config("chatbot").await,
            Err(DomainError::Storage { .. })
        ));
    }

    #[tokio::test]
    async fn test_registry_mode_resolves_definition_default() {
        let kit = with_registry(Arc::new(ScriptedOverrideStore::new()));

        assert_eq!(kit.get_model("chatbot").await.unwrap(), SONNET);
        assert_eq!(kit.get_model_or("chatbot", "other").await.unwrap(), SONNET);
        assert!(kit.get_model("unknown").await.unwrap_err().is_not_found());
        assert_eq!(kit.get_model_or("unknown", "other").await.unwrap(), "other");
    }

    #[tokio::test]
    async fn test_registry_mode_fills_model_id_from_definition() {
        let store = Arc::new(ScriptedOverrideStore::new());
        let kit = with_registry(store.clone());

        kit.set_override(
            "chatbot",
            OverridePatch::new().with_params(GenerationParams::new().with_temperature(0.7)),
        )
        .await
        .unwrap();

        let stored = store.stored("chatbot").unwrap();
        assert_eq!(stored.model_id, SONNET);
        assert_eq!(stored.params.temperature, Some(0.7));
        assert!(stored.params.max_tokens.is_none());
    }

    #[tokio::test]
    async fn test_registry_mode_rejects_unknown_feature_writes() {
        let store = Arc::new(ScriptedOverrideStore::new());
        let kit = with_registry(store.clone());

        let err = kit
            .set_override("unknown", OverridePatch::new().with_model_id("X"))
            .await
            .unwrap_err();

        assert!(err.is_not_found());
        assert!(store.stored("unknown").is_none());
    }

    #[tokio::test]
    async fn test_registry_mode_get_config_merges_fields() {
        let kit = with_registry(Arc::new(ScriptedOverrideStore::new()));

        let config = kit.get_config("chatbot").await.unwrap();
        assert_eq!(config.model_id, SONNET);
        assert_eq!(config.source, ConfigSource::Default);

        kit.set_override(
            "chatbot",
            OverridePatch::new()
                .with_model_id(OPUS)
                .with_params(GenerationParams::new().with_temperature(0.9)),
        )
        .await
        .unwrap();

        let config = kit.get_config("chatbot").await.unwrap();
        assert_eq!(config.model_id, OPUS);
        assert_eq!(config.name.as_deref(), Some("Chatbot"));
        assert_eq!(config.params.temperature, Some(0.9));
        assert_eq!(config.params.max_tokens, Some(1024));
        assert_eq!(config.source, ConfigSource::Override);
    }

    #[tokio::test]
    async fn test_list_features() {
        let kit = with_registry(Arc::new(ScriptedOverrideStore::new()));
        let ids: Vec<String> = kit
            .list_features()
            .into_iter()
            .map(|f| f.id.to_string())
            .collect();
        assert_eq!(ids, vec!["chatbot", "summarize"]);

        let bare_kit = bare(Arc::new(ScriptedOverrideStore::new()));
        assert!(bare_kit.list_features().is_empty());
    }

    #[tokio::test]
    async fn test_invalidate_all() {
        let store = Arc::new(ScriptedOverrideStore::new());
        let kit = bare(store.clone());

        kit.get_model_or("a", "Y").await.unwrap();
        kit.get_model_or("b", "Y").await.unwrap();
        kit.invalidate_all();
        kit.get_model_or("a", "Y").await.unwrap();
        kit.get_model_or("b", "Y").await.unwrap();

        assert_eq!(store.get_calls(), 4);
    }

    #[tokio::test]
    async fn test_check_store() {
        let store = Arc::new(
            ScriptedOverrideStore::new().with_override("chatbot", ModelOverride::new("m")),
        );
        let kit = bare(store.clone());

        kit.check_store().await.unwrap();

        store.set_fail_reads(true);
        assert!(matches!(
            kit.check_store().await,
            Err(DomainError::Storage { .. })
        ));
    }

    #[tokio::test]
    async fn test_check_store_does_not_list() {
        let mut store = MockOverrideStore::new();
        store.expect_list().never();
        store.expect_health_check().times(1).returning(|| Ok(false));

        let kit = ModelKit::new(Arc::new(store), ModelKitOptions::default());

        assert!(kit.check_store().await.is_err());
    }

    #[tokio::test]
    async fn test_ttl_beyond_cache_limit_does_not_panic() {
        let store = Arc::new(ScriptedOverrideStore::new());
        let kit = ModelKit::new(
            store.clone(),
            ModelKitOptions::default().with_cache_ttl(Duration::from_millis(100_000_000_000_000)),
        );

        assert_eq!(kit.get_model_or("chatbot", "Y").await.unwrap(), "Y");
        assert_eq!(kit.get_model_or("chatbot", "Y").await.unwrap(), "Y");
        assert_eq!(store.get_calls(), 1);
    }

    #[tokio::test]
    async fn test_cache_hit_skips_store() {
        let mut store = MockOverrideStore::new();
        store
            .expect_get()
            .times(1)
            .returning(|_| Ok(Some(ModelOverride::new("X"))));

        let kit = ModelKit::new(Arc::new(store), ModelKitOptions::default());

        assert_eq!(kit.get_model_or("chatbot", "Y").await.unwrap(), "X");
        assert_eq!(kit.get_model_or("chatbot", "Y").await.unwrap(), "X");
    }

    #[tokio::test]
    async fn test_invalid_write_performs_no_io() {
        let mut store = MockOverrideStore::new();
        store.expect_set().never();
        store.expect_get().never();

        let kit = ModelKit::new(Arc::new(store), ModelKitOptions::default());

        let err = kit
            .set_override("chatbot", OverridePatch::new().with_model_id(""))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));
    }
}
