//! Execution configuration from TOML (`[execution]` section)

use pyhc_application::config::{ExecutionParams, MAX_RECOVERY_ATTEMPTS};
use pyhc_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileExecutionConfig {
    pub llm_timeout_secs: u64,
    pub retrieval_timeout_secs: u64,
    pub max_concurrent_retrievals: usize,
    pub max_recovery_attempts: usize,
    pub selection_temperature: f32,
    pub decomposition_temperature: f32,
    pub synthesis_temperature: f32,
}

impl Default for FileExecutionConfig {
    fn default() -> Self {
        let params = ExecutionParams::default();
        Self {
            llm_timeout_secs: params.llm_timeout.as_secs(),
            retrieval_timeout_secs: params.retrieval_timeout.as_secs(),
            max_concurrent_retrievals: params.max_concurrent_retrievals,
            max_recovery_attempts: params.max_recovery_attempts,
            selection_temperature: params.selection_temperature,
            decomposition_temperature: params.decomposition_temperature,
            synthesis_temperature: params.synthesis_temperature,
        }
    }
}

impl FileExecutionConfig {
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        for (field, secs) in [
            ("llm_timeout_secs", self.llm_timeout_secs),
            ("retrieval_timeout_secs", self.retrieval_timeout_secs),
        ] {
            if secs == 0 {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::ZeroTimeout,
                    format!("execution.{}: timeout must be at least 1 second", field),
                ));
            }
        }

        if self.max_concurrent_retrievals == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroConcurrency,
                "execution.max_concurrent_retrievals: must be at least 1",
            ));
        }

        if !(1..=MAX_RECOVERY_ATTEMPTS).contains(&self.max_recovery_attempts) {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::RecoveryAttemptsClamped,
                format!(
                    "execution.max_recovery_attempts: {} is outside 1..={}, clamped to {}",
                    self.max_recovery_attempts,
                    MAX_RECOVERY_ATTEMPTS,
                    self.max_recovery_attempts.clamp(1, MAX_RECOVERY_ATTEMPTS)
                ),
            ));
        }

        for (field, t) in [
            ("selection_temperature", self.selection_temperature),
            ("decomposition_temperature", self.decomposition_temperature),
            ("synthesis_temperature", self.synthesis_temperature),
        ] {
            if !(0.0..=2.0).contains(&t) {
                issues.push(ConfigIssue::warning(
                    ConfigIssueCode::TemperatureOutOfRange,
                    format!("execution.{}: {} is outside 0.0..=2.0", field, t),
                ));
            }
        }

        issues
    }

    pub fn to_execution_params(&self) -> ExecutionParams {
        ExecutionParams::default()
            .with_llm_timeout(Duration::from_secs(self.llm_timeout_secs.max(1)))
            .with_retrieval_timeout(Duration::from_secs(self.retrieval_timeout_secs.max(1)))
            .with_max_concurrent_retrievals(self.max_concurrent_retrievals)
            .with_max_recovery_attempts(self.max_recovery_attempts)
            .with_selection_temperature(self.selection_temperature.clamp(0.0, 2.0))
            .with_decomposition_temperature(self.decomposition_temperature.clamp(0.0, 2.0))
            .with_synthesis_temperature(self.synthesis_temperature.clamp(0.0, 2.0))
    }
}
