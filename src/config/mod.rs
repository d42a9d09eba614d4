//! Configuration management

mod app_config;

pub use app_config::{
    AppConfig, CacheConfig, FeatureConfig, LogFormat, LoggingConfig, ServerConfig, StorageConfig,
};
