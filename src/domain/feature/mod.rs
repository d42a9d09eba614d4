//! Feature domain - definitions, overrides and their merged view

mod entity;
mod registry;
mod validation;

pub use entity::{
    ConfigSource, EffectiveConfig, FeatureDefinition, FeatureId, FeatureOverride,
    GenerationParams, ModelOverride, OverridePatch, RegisteredFeature,
};
pub use registry::FeatureRegistry;
pub use validation::{validate_feature_id, validate_model_id, FeatureValidationError};
