//! Tier-based model configuration.
//!
//! [`ModelConfig`] groups the model selections for the two tiers used by
//! the chat pipeline. This is a static value object: once created, models
//! don't change at runtime.

use crate::core::model::Model;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which tier of the language-model service a request goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelTier {
    /// Selection, decomposition and synthesis
    Primary,
    /// Reformatting calls of structured output recovery, always at temperature 0
    Recovery,
}

impl ModelTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelTier::Primary => "primary",
            ModelTier::Recovery => "recovery",
        }
    }
}

impl fmt::Display for ModelTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Model selection per tier.
///
/// # Example
///
/// ```
/// use pyhc_domain::{Model, ModelConfig, ModelTier};
///
/// let config = ModelConfig::default().with_recovery(Model::Gpt41Mini);
/// assert_eq!(config.model_for(ModelTier::Primary), &Model::Gpt4o);
/// assert_eq!(config.model_for(ModelTier::Recovery), &Model::Gpt41Mini);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub primary: Model,
    pub recovery: Model,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            primary: Model::Gpt4o,
            recovery: Model::Gpt4oMini,
        }
    }
}

impl ModelConfig {
    pub fn with_primary(mut self, model: Model) -> Self {
        self.primary = model;
        self
    }

    pub fn with_recovery(mut self, model: Model) -> Self {
        self.recovery = model;
        self
    }

    pub fn model_for(&self, tier: ModelTier) -> &Model {
        match tier {
            ModelTier::Primary => &self.primary,
            ModelTier::Recovery => &self.recovery,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tiers() {
        let config = ModelConfig::default();
        assert_eq!(config.primary, Model::Gpt4o);
        assert_eq!(config.recovery, Model::Gpt4oMini);
    }

    #[test]
    fn test_builder() {
        let config = ModelConfig::default().with_primary(Model::Custom("local-llm".into()));
        assert_eq!(
            config.model_for(ModelTier::Primary),
            &Model::Custom("local-llm".into())
        );
    }

    #[test]
    fn test_tier_display() {
        assert_eq!(ModelTier::Recovery.to_string(), "recovery");
    }
}
