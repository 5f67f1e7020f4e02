//! Execution parameters: timeouts, concurrency and recovery bounds.
//!
//! [`ExecutionParams`] groups the static parameters that control how the
//! [`ChatOrchestrator`](crate::use_cases::run_chat::ChatOrchestrator) drives
//! remote calls. These are application-layer concerns, not domain policy.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Hard ceiling on model-assisted recovery attempts.
pub const MAX_RECOVERY_ATTEMPTS: usize = 2;

/// Temperature used for every recovery-tier call.
pub const RECOVERY_TEMPERATURE: f32 = 0.0;

/// Execution control parameters.
///
/// | Call | Timeout | Temperature |
/// |------|---------|-------------|
/// | Selection | `llm_timeout` | `selection_temperature` |
/// | Decomposition | `llm_timeout` | `decomposition_temperature` |
/// | Synthesis | `llm_timeout` | `synthesis_temperature` |
/// | Recovery | `llm_timeout` | [`RECOVERY_TEMPERATURE`] |
/// | Retrieval | `retrieval_timeout` | n/a |
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionParams {
    /// Timeout for each language-model call.
    pub llm_timeout: Duration,
    /// Timeout for each retrieval call (search plus completion).
    pub retrieval_timeout: Duration,
    /// Upper bound on concurrent retrievals in the multi-source path.
    pub max_concurrent_retrievals: usize,
    /// Model-assisted recovery attempts, within `1..=MAX_RECOVERY_ATTEMPTS`.
    pub max_recovery_attempts: usize,
    pub selection_temperature: f32,
    pub decomposition_temperature: f32,
    pub synthesis_temperature: f32,
}

impl Default for ExecutionParams {
    fn default() -> Self {
        Self {
            llm_timeout: Duration::from_secs(60),
            retrieval_timeout: Duration::from_secs(180),
            max_concurrent_retrievals: 4,
            max_recovery_attempts: MAX_RECOVERY_ATTEMPTS,
            selection_temperature: 0.0,
            decomposition_temperature: 0.3,
            synthesis_temperature: 0.7,
        }
    }
}

impl ExecutionParams {
    // ==================== Builder Methods ====================

    pub fn with_llm_timeout(mut self, timeout: Duration) -> Self {
        self.llm_timeout = timeout;
        self
    }

    pub fn with_retrieval_timeout(mut self, timeout: Duration) -> Self {
        self.retrieval_timeout = timeout;
        self
    }

    /// Zero is raised to one.
    pub fn with_max_concurrent_retrievals(mut self, max: usize) -> Self {
        self.max_concurrent_retrievals = max.max(1);
        self
    }

    /// Clamped to `1..=MAX_RECOVERY_ATTEMPTS`.
    pub fn with_max_recovery_attempts(mut self, max: usize) -> Self {
        self.max_recovery_attempts = max.clamp(1, MAX_RECOVERY_ATTEMPTS);
        self
    }

    pub fn with_selection_temperature(mut self, temperature: f32) -> Self {
        self.selection_temperature = temperature;
        self
    }

    pub fn with_decomposition_temperature(mut self, temperature: f32) -> Self {
        self.decomposition_temperature = temperature;
        self
    }

    pub fn with_synthesis_temperature(mut self, temperature: f32) -> Self {
        self.synthesis_temperature = temperature;
        self
    }

    /// Attempt bound actually honored, even if the field was set directly.
    pub fn recovery_attempts(&self) -> usize {
        self.max_recovery_attempts.clamp(1, MAX_RECOVERY_ATTEMPTS)
    }
}
