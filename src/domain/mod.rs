//! Domain layer - Core entities and contracts

pub mod error;
pub mod feature;
pub mod store;

pub use error::DomainError;
pub use feature::{
    ConfigSource, EffectiveConfig, FeatureDefinition, FeatureId, FeatureOverride,
    FeatureRegistry, FeatureValidationError, GenerationParams, ModelOverride, OverridePatch,
    RegisteredFeature,
};
pub use store::OverrideStore;
