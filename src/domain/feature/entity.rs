//! Feature, override and effective configuration types

use serde::{Deserialize, Serialize};

use super::validation::{
    validate_feature_id, validate_model_id, FeatureValidationError,
};

/// Feature identifier - any non-empty string, unique across the namespace
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FeatureId(String);

impl FeatureId {
    /// Create a new FeatureId after validation
    pub fn new(id: impl Into<String>) -> Result<Self, FeatureValidationError> {
        let id = id.into();
        validate_feature_id(&id)?;
        Ok(Self(id))
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for FeatureId {
    type Error = FeatureValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<FeatureId> for String {
    fn from(id: FeatureId) -> Self {
        id.0
    }
}

impl std::fmt::Display for FeatureId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Optional generation parameters shared by definitions and overrides.
///
/// No ranges are enforced here; the model provider owns that.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
}

impl GenerationParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_top_p(mut self, top_p: f64) -> Self {
        self.top_p = Some(top_p);
        self
    }

    pub fn with_top_k(mut self, top_k: u32) -> Self {
        self.top_k = Some(top_k);
        self
    }

    /// Layers `upper` on top of `self`, field by field.
    ///
    /// A field set in `upper` always wins; an unset field in `upper` keeps
    /// the value from `self`.
    pub fn overlay(&self, upper: &GenerationParams) -> GenerationParams {
        GenerationParams {
            temperature: upper.temperature.or(self.temperature),
            max_tokens: upper.max_tokens.or(self.max_tokens),
            top_p: upper.top_p.or(self.top_p),
            top_k: upper.top_k.or(self.top_k),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.temperature.is_none()
            && self.max_tokens.is_none()
            && self.top_p.is_none()
            && self.top_k.is_none()
    }
}

/// Persisted override record, in its JSON wire shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelOverride {
    pub model_id: String,

    #[serde(flatten)]
    pub params: GenerationParams,

    /// Epoch milliseconds, stamped by the store on every write
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
}

impl ModelOverride {
    pub fn new(model_id: impl Into<String>) -> Self {
        Self {
            model_id: model_id.into(),
            params: GenerationParams::default(),
            updated_at: None,
        }
    }

    pub fn with_params(mut self, params: GenerationParams) -> Self {
        self.params = params;
        self
    }

    /// Returns a copy stamped with the given write time
    pub fn stamped(&self, updated_at: i64) -> Self {
        Self {
            updated_at: Some(updated_at),
            ..self.clone()
        }
    }

    /// Returns a copy stamped with the current wall-clock time
    pub fn stamped_now(&self) -> Self {
        self.stamped(chrono::Utc::now().timestamp_millis())
    }
}

/// Write-side input: an override whose model ID may be omitted
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverridePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_id: Option<String>,

    #[serde(flatten)]
    pub params: GenerationParams,
}

impl OverridePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_model_id(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = Some(model_id.into());
        self
    }

    pub fn with_params(mut self, params: GenerationParams) -> Self {
        self.params = params;
        self
    }

    /// Completes the patch into a full override.
    ///
    /// Only `model_id` is filled from `default_model_id`; the generation
    /// parameters are taken from the patch as-is (full replace).
    pub fn into_override(
        self,
        default_model_id: Option<&str>,
    ) -> Result<ModelOverride, FeatureValidationError> {
        let model_id = self
            .model_id
            .or_else(|| default_model_id.map(str::to_string))
            .ok_or(FeatureValidationError::MissingModelId)?;

        validate_model_id(&model_id)?;

        Ok(ModelOverride {
            model_id,
            params: self.params,
            updated_at: None,
        })
    }
}

impl From<ModelOverride> for OverridePatch {
    fn from(value: ModelOverride) -> Self {
        Self {
            model_id: Some(value.model_id),
            params: value.params,
        }
    }
}

/// Configuration-time default for a feature, immutable for the process lifetime
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureDefinition {
    /// Display name (e.g. "Content generation")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Short description or subtitle
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    pub model_id: String,

    #[serde(flatten)]
    pub params: GenerationParams,
}

impl FeatureDefinition {
    pub fn new(model_id: impl Into<String>) -> Self {
        Self {
            name: None,
            title: None,
            model_id: model_id.into(),
            params: GenerationParams::default(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_params(mut self, params: GenerationParams) -> Self {
        self.params = params;
        self
    }
}

/// Which layer produced the winning model ID of an effective configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    Default,
    Override,
}

/// Merged view of a feature: definition defaults overlaid with the override
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectiveConfig {
    pub feature_id: FeatureId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    pub model_id: String,

    #[serde(flatten)]
    pub params: GenerationParams,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,

    pub source: ConfigSource,
}

impl EffectiveConfig {
    /// Layers an override on top of a definition.
    ///
    /// Returns `None` when neither layer exists.
    pub fn layer(
        feature_id: &FeatureId,
        definition: Option<&FeatureDefinition>,
        model_override: Option<&ModelOverride>,
    ) -> Option<Self> {
        match (definition, model_override) {
            (None, None) => None,
            (Some(def), None) => Some(Self {
                feature_id: feature_id.clone(),
                name: def.name.clone(),
                title: def.title.clone(),
                model_id: def.model_id.clone(),
                params: def.params.clone(),
                updated_at: None,
                source: ConfigSource::Default,
            }),
            (definition, Some(ov)) => {
                let base = definition.map(|d| d.params.clone()).unwrap_or_default();

                Some(Self {
                    feature_id: feature_id.clone(),
                    name: definition.and_then(|d| d.name.clone()),
                    title: definition.and_then(|d| d.title.clone()),
                    model_id: ov.model_id.clone(),
                    params: base.overlay(&ov.params),
                    updated_at: ov.updated_at,
                    source: ConfigSource::Override,
                })
            }
        }
    }
}

/// One entry of the override listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureOverride {
    pub feature_id: FeatureId,

    #[serde(rename = "override")]
    pub model_override: ModelOverride,
}

/// A registered feature definition together with its ID
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisteredFeature {
    pub id: FeatureId,

    #[serde(flatten)]
    pub definition: FeatureDefinition,
}
