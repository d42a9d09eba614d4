//! Static feature registry supplied at startup

use std::collections::BTreeMap;

use super::entity::{FeatureDefinition, FeatureId, RegisteredFeature};
use super::validation::{validate_model_id, FeatureValidationError};

/// Immutable mapping of feature ID to its default definition
#[derive(Debug, Clone, Default)]
pub struct FeatureRegistry {
    features: BTreeMap<FeatureId, FeatureDefinition>,
}

impl FeatureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a feature definition, replacing any previous one with the same ID
    pub fn with_feature(
        mut self,
        id: FeatureId,
        definition: FeatureDefinition,
    ) -> Result<Self, FeatureValidationError> {
        validate_model_id(&definition.model_id)?;
        self.features.insert(id, definition);
        Ok(self)
    }

    /// Builds a registry from raw `(id, definition)` pairs
    pub fn from_definitions<I, S>(definitions: I) -> Result<Self, FeatureValidationError>
    where
        I: IntoIterator<Item = (S, FeatureDefinition)>,
        S: Into<String>,
    {
        definitions
            .into_iter()
            .try_fold(Self::new(), |registry, (id, definition)| {
                registry.with_feature(FeatureId::new(id)?, definition)
            })
    }

    pub fn get(&self, id: &FeatureId) -> Option<&FeatureDefinition> {
        self.features.get(id)
    }

    pub fn contains(&self, id: &FeatureId) -> bool {
        self.features.contains_key(id)
    }

    /// Lists all definitions ordered by feature ID
    pub fn list(&self) -> Vec<RegisteredFeature> {
        self.features
            .iter()
            .map(|(id, definition)| RegisteredFeature {
                id: id.clone(),
                definition: definition.clone(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_definitions_sorted_listing() {
        let registry = FeatureRegistry::from_definitions([
            ("summarize", FeatureDefinition::new("openai/gpt-4o-mini")),
            ("chatbot", FeatureDefinition::new("anthropic/claude-3.5-sonnet")),
        ])
        .unwrap();

        let ids: Vec<String> = registry
            .list()
            .into_iter()
            .map(|f| f.id.to_string())
            .collect();

        assert_eq!(ids, vec!["chatbot", "summarize"]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_get_and_contains() {
        let registry =
            FeatureRegistry::from_definitions([("chatbot", FeatureDefinition::new("m"))]).unwrap();
        let chatbot = FeatureId::new("chatbot").unwrap();
        let other = FeatureId::new("other").unwrap();

        assert!(registry.contains(&chatbot));
        assert_eq!(registry.get(&chatbot).unwrap().model_id, "m");
        assert!(registry.get(&other).is_none());
    }

    #[test]
    fn test_rejects_blank_default_model() {
        let result = FeatureRegistry::from_definitions([("chatbot", FeatureDefinition::new(""))]);
        assert_eq!(result.unwrap_err(), FeatureValidationError::EmptyModelId);
    }

    #[test]
    fn test_rejects_empty_feature_id() {
        let result = FeatureRegistry::from_definitions([("", FeatureDefinition::new("m"))]);
        assert_eq!(result.unwrap_err(), FeatureValidationError::EmptyFeatureId);
    }

    #[test]
    fn test_registered_feature_serialization() {
        let registry = FeatureRegistry::from_definitions([(
            "chatbot",
            FeatureDefinition::new("m").with_name("Chat"),
        )])
        .unwrap();

        let json = serde_json::to_string(&registry.list()[0]).unwrap();
        assert_eq!(json, r#"{"id":"chatbot","name":"Chat","modelId":"m"}"#);
    }
}
