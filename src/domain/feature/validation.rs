//! Feature and override validation utilities

use std::fmt;

use crate::domain::DomainError;

/// Feature validation errors
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureValidationError {
    /// Feature ID is empty
    EmptyFeatureId,
    /// Model ID is missing from an override that cannot be completed from a definition
    MissingModelId,
    /// Model ID is present but blank
    EmptyModelId,
}

impl fmt::Display for FeatureValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyFeatureId => write!(f, "Feature ID cannot be empty"),
            Self::MissingModelId => write!(f, "modelId is required"),
            Self::EmptyModelId => write!(f, "modelId cannot be empty"),
        }
    }
}

impl std::error::Error for FeatureValidationError {}

impl From<FeatureValidationError> for DomainError {
    fn from(err: FeatureValidationError) -> Self {
        DomainError::validation(err.to_string())
    }
}

/// Validates a feature identifier. Any non-empty string is accepted.
pub fn validate_feature_id(id: &str) -> Result<(), FeatureValidationError> {
    if id.is_empty() {
        return Err(FeatureValidationError::EmptyFeatureId);
    }

    Ok(())
}

/// Validates a model identifier. The value is opaque; only blankness is rejected.
pub fn validate_model_id(model_id: &str) -> Result<(), FeatureValidationError> {
    if model_id.trim().is_empty() {
        return Err(FeatureValidationError::EmptyModelId);
    }

    Ok(())
}
