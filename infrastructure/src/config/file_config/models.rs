//! Tiered model configuration from TOML (`[models]` section)

use pyhc_domain::{ConfigIssue, ConfigIssueCode, Model, ModelConfig};
use serde::{Deserialize, Serialize};

/// Tiered model configuration from TOML
///
/// # Example
///
/// ```toml
/// [models]
/// primary = "gpt-4o"        # Selection, decomposition, synthesis
/// recovery = "gpt-4o-mini"  # Reformatting malformed structured output
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileModelsConfig {
    pub primary: Option<String>,
    pub recovery: Option<String>,
}

impl FileModelsConfig {
    /// Parse a single model string, collecting issues for empty names.
    fn parse_single_model(field: &str, value: Option<&String>) -> (Option<Model>, Vec<ConfigIssue>) {
        match value {
            None => (None, Vec::new()),
            Some(s) if s.trim().is_empty() => (
                None,
                vec![ConfigIssue::error(
                    ConfigIssueCode::EmptyModelName,
                    format!("models.{}: model name cannot be empty", field),
                )],
            ),
            // Unknown names become Model::Custom
            Some(s) => match s.trim().parse::<Model>() {
                Ok(model) => (Some(model), Vec::new()),
                Err(never) => match never {},
            },
        }
    }

    pub fn parse_primary(&self) -> (Option<Model>, Vec<ConfigIssue>) {
        Self::parse_single_model("primary", self.primary.as_ref())
    }

    pub fn parse_recovery(&self) -> (Option<Model>, Vec<ConfigIssue>) {
        Self::parse_single_model("recovery", self.recovery.as_ref())
    }

    /// Overlay configured models on the defaults.
    pub fn to_model_config(&self) -> ModelConfig {
        let mut config = ModelConfig::default();
        if let (Some(model), _) = self.parse_primary() {
            config = config.with_primary(model);
        }
        if let (Some(model), _) = self.parse_recovery() {
            config = config.with_recovery(model);
        }
        config
    }
}
