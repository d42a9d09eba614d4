//! ModelKit
//!
//! Runtime model configuration for AI features: each feature resolves its
//! model ID from a short-lived local cache, then a persisted override, then
//! a registered or caller-supplied fallback. Overrides are managed over HTTP
//! or the CLI without redeploying the consuming application.

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;
pub use domain::{DomainError, FeatureDefinition, FeatureRegistry, ModelOverride, OverridePatch};
pub use infrastructure::services::{ModelKit, ModelKitOptions};

use std::sync::Arc;

use api::state::AppState;
use infrastructure::store::StoreFactory;
use tracing::info;

/// Create a client from configuration: store backend, cache options and
/// the optional feature registry
pub async fn create_model_kit(config: &AppConfig) -> anyhow::Result<ModelKit> {
    let options = config.cache.to_options()?;
    let store_config = config.storage.to_store_config()?;
    let store = StoreFactory::new().create(&store_config).await?;

    let mut model_kit = ModelKit::new(store, options);

    if let Some(registry) = config.feature_registry()? {
        info!(features = registry.len(), "Feature registry loaded");
        model_kit = model_kit.with_registry(registry);
    }

    info!(
        store = %store_config.store_type,
        cache_ttl_ms = config.cache.ttl_ms,
        "ModelKit initialized"
    );

    Ok(model_kit)
}

/// Create the application state with default configuration
pub async fn create_app_state() -> anyhow::Result<AppState> {
    create_app_state_with_config(&AppConfig::default()).await
}

/// Create the application state with custom configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let model_kit = create_model_kit(config).await?;
    Ok(AppState::new(Arc::new(model_kit)))
}
