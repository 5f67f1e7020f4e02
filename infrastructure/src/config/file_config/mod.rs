//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly; conversion into domain and application
//! types happens through the `to_*` methods.

mod execution;
mod logging;
mod models;
mod output;
mod providers;
mod repl;
mod retrieval;
mod sources;

pub use execution::FileExecutionConfig;
pub use logging::FileLoggingConfig;
pub use models::FileModelsConfig;
pub use output::FileOutputConfig;
pub use providers::{FileOpenAiConfig, FileProvidersConfig};
pub use repl::FileReplConfig;
pub use retrieval::FileRetrievalConfig;
pub use sources::FileSourceConfig;

use pyhc_application::ExecutionParams;
use pyhc_domain::{ConfigIssue, DomainError, ModelConfig, OutputFormat, SourceRegistry};
use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Primary and recovery model tiers
    pub models: FileModelsConfig,
    /// Timeouts, concurrency, recovery bound, temperatures
    pub execution: FileExecutionConfig,
    /// Model service credentials and endpoint
    pub providers: FileProvidersConfig,
    /// Retrieval backend endpoint
    pub retrieval: FileRetrievalConfig,
    /// Source catalog override (`[[sources]]`); empty means built-in
    pub sources: Vec<FileSourceConfig>,
    pub output: FileOutputConfig,
    pub repl: FileReplConfig,
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// This is the single entry point for config validation. It checks:
    /// 1. Empty model names
    /// 2. Execution bounds (timeouts, concurrency, attempts, temperatures)
    /// 3. The source catalog override
    /// 4. The output format
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        issues.extend(self.models.parse_primary().1);
        issues.extend(self.models.parse_recovery().1);
        issues.extend(self.execution.validate());
        issues.extend(sources::validate_sources(&self.sources));
        issues.extend(self.output.parse_format().1);

        issues
    }

    pub fn to_model_config(&self) -> ModelConfig {
        self.models.to_model_config()
    }

    pub fn to_execution_params(&self) -> ExecutionParams {
        self.execution.to_execution_params()
    }

    pub fn to_registry(&self) -> Result<SourceRegistry, DomainError> {
        sources::to_registry(&self.sources)
    }

    /// Configured output format, or the default when unset or unknown.
    pub fn output_format(&self) -> OutputFormat {
        self.output.parse_format().0.unwrap_or_default()
    }
}
