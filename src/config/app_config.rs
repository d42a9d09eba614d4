use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::domain::{DomainError, FeatureDefinition, FeatureRegistry, GenerationParams};
use crate::infrastructure::cache::MAX_CACHE_TTL;
use crate::infrastructure::services::ModelKitOptions;
use crate::infrastructure::store::StoreConfig;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub storage: StorageConfig,
    pub cache: CacheConfig,
    /// Registered features keyed by feature ID; empty runs without a registry
    pub features: BTreeMap<String, FeatureConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
    pub debug: bool,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Backend name: memory, redis or file
    #[serde(rename = "type")]
    pub store_type: String,
    pub url: Option<String>,
    pub prefix: Option<String>,
    pub path: Option<PathBuf>,
    /// Memory backend entry expiry; 0 keeps entries until deleted
    pub entry_ttl_secs: u64,
    pub connect_timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// 0 never expires
    pub ttl_ms: u64,
    pub max_capacity: Option<u64>,
    /// 0 disables the bound on store reads
    pub store_timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeatureConfig {
    pub model_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
    #[serde(default)]
    pub top_p: Option<f64>,
    #[serde(default)]
    pub top_k: Option<u32>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            cors: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
            debug: false,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            store_type: "memory".to_string(),
            url: None,
            prefix: None,
            path: None,
            entry_ttl_secs: 0,
            connect_timeout_ms: 5000,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_ms: 60_000,
            max_capacity: None,
            store_timeout_ms: 5000,
        }
    }
}

impl StorageConfig {
    pub fn to_store_config(&self) -> Result<StoreConfig, DomainError> {
        Ok(StoreConfig {
            store_type: self.store_type.parse()?,
            redis_url: self.url.clone(),
            key_prefix: self.prefix.clone(),
            path: self.path.clone(),
            entry_ttl: Duration::from_secs(self.entry_ttl_secs),
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
        })
    }
}

impl CacheConfig {
    pub fn to_options(&self) -> Result<ModelKitOptions, DomainError> {
        let ttl = Duration::from_millis(self.ttl_ms);

        if ttl > MAX_CACHE_TTL {
            return Err(DomainError::configuration(format!(
                "cache.ttl_ms {} exceeds the maximum of {} ms",
                self.ttl_ms,
                MAX_CACHE_TTL.as_millis()
            )));
        }

        let mut options = ModelKitOptions::default().with_cache_ttl(ttl);

        if let Some(capacity) = self.max_capacity {
            options = options.with_cache_capacity(capacity);
        }

        if self.store_timeout_ms == 0 {
            Ok(options.without_store_timeout())
        } else {
            Ok(options.with_store_timeout(Duration::from_millis(self.store_timeout_ms)))
        }
    }
}

impl FeatureConfig {
    pub fn to_definition(&self) -> FeatureDefinition {
        let mut definition = FeatureDefinition::new(&self.model_id).with_params(GenerationParams {
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            top_p: self.top_p,
            top_k: self.top_k,
        });

        if let Some(name) = &self.name {
            definition = definition.with_name(name);
        }

        if let Some(title) = &self.title {
            definition = definition.with_title(title);
        }

        definition
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Builds the feature registry; `None` when no features are configured
    pub fn feature_registry(&self) -> Result<Option<FeatureRegistry>, DomainError> {
        if self.features.is_empty() {
            return Ok(None);
        }

        let registry = FeatureRegistry::from_definitions(
            self.features
                .iter()
                .map(|(id, feature)| (id.clone(), feature.to_definition())),
        )
        .map_err(|e| DomainError::configuration(format!("Invalid feature registry: {}", e)))?;

        Ok(Some(registry))
    }
}
