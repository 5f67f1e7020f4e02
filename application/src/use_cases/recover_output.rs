//! Structured output recovery use case
//!
//! Turns free-form model text into a validated [`SelectionResult`] or
//! [`QuestionMap`]. The deterministic parser runs first; only when it
//! rejects the text is the recovery-tier model asked to reformat it, at
//! temperature 0, for a bounded number of attempts.

use crate::config::{ExecutionParams, RECOVERY_TEMPERATURE};
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::llm_gateway::{CompletionRequest, LlmGateway};
use crate::use_cases::shared::complete_with_timeout;
use pyhc_domain::core::string::truncate;
use pyhc_domain::{
    AttemptOutcome, Message, ModelConfig, ModelTier, OutputShape, ParseFailure, PromptTemplate,
    QuestionMap, RecoveryLog, RecoveryStage, SelectionResult, SourceId, SourceRegistry,
    parse_question_map, parse_source_set,
};
use serde_json::json;
use std::collections::BTreeSet;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Recovery gave up
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecoveryError {
    #[error("could not recover a {shape} after {attempts} attempts")]
    Unrecoverable {
        shape: OutputShape,
        attempts: usize,
        /// Last text that was examined, for diagnostics
        last_raw: String,
    },
}

impl RecoveryError {
    pub fn last_raw(&self) -> &str {
        match self {
            RecoveryError::Unrecoverable { last_raw, .. } => last_raw,
        }
    }

    pub fn shape(&self) -> OutputShape {
        match self {
            RecoveryError::Unrecoverable { shape, .. } => *shape,
        }
    }
}

/// Two-tier parser for model output that must become structured data.
pub struct StructuredOutputRecovery {
    gateway: Arc<dyn LlmGateway>,
    registry: Arc<SourceRegistry>,
    models: ModelConfig,
    params: ExecutionParams,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl StructuredOutputRecovery {
    pub fn new(
        gateway: Arc<dyn LlmGateway>,
        registry: Arc<SourceRegistry>,
        models: ModelConfig,
        params: ExecutionParams,
    ) -> Self {
        Self {
            gateway,
            registry,
            models,
            params,
            conversation_logger: Arc::new(NoConversationLogger),
        }
    }

    /// Create with a conversation logger.
    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    /// Recover a set of catalog sources, or the sentinel.
    pub async fn recover_source_set(&self, text: &str) -> Result<SelectionResult, RecoveryError> {
        let instruction = PromptTemplate::recovery_set_instruction(&self.registry);
        self.recover(OutputShape::SourceSet, text, instruction, |candidate| {
            parse_source_set(candidate, &self.registry)
        })
        .await
    }

    /// Recover one question per source in `required`, and no others.
    pub async fn recover_question_map(
        &self,
        text: &str,
        required: &BTreeSet<SourceId>,
    ) -> Result<QuestionMap, RecoveryError> {
        let instruction = PromptTemplate::recovery_map_instruction(required);
        self.recover(OutputShape::QuestionMap, text, instruction, |candidate| {
            parse_question_map(candidate, required, &self.registry)
        })
        .await
    }

    async fn recover<T, F>(
        &self,
        shape: OutputShape,
        text: &str,
        instruction: String,
        parse: F,
    ) -> Result<T, RecoveryError>
    where
        F: Fn(&str) -> Result<T, ParseFailure>,
    {
        let mut log = RecoveryLog::new();

        match parse(text) {
            Ok(value) => {
                log.record(RecoveryStage::Deterministic, text, AttemptOutcome::Parsed);
                debug!("Recovered {} deterministically", shape);
                return Ok(value);
            }
            Err(failure) => {
                debug!("Deterministic {} parse rejected: {}", shape, failure);
                log.record(
                    RecoveryStage::Deterministic,
                    text,
                    AttemptOutcome::Rejected(failure.to_string()),
                );
            }
        }

        let request = CompletionRequest::new(
            ModelTier::Recovery,
            self.models.model_for(ModelTier::Recovery).clone(),
            vec![
                Message::system(instruction),
                Message::user(PromptTemplate::recovery_input(text)),
            ],
        )
        .with_temperature(RECOVERY_TEMPERATURE);

        for attempt in 1..=self.params.recovery_attempts() {
            let stage = RecoveryStage::ModelAssisted { attempt };
            info!("Escalating {} recovery ({})", shape, stage);
            self.conversation_logger.log(ConversationEvent::new(
                "recovery_escalated",
                json!({
                    "shape": shape.as_str(),
                    "attempt": attempt,
                    "raw": truncate(text, 2000),
                }),
            ));

            match complete_with_timeout(self.gateway.as_ref(), &request, self.params.llm_timeout)
                .await
            {
                Ok(reply) => match parse(&reply) {
                    Ok(value) => {
                        log.record(stage, reply, AttemptOutcome::Parsed);
                        info!("Recovered {} on {}", shape, stage);
                        return Ok(value);
                    }
                    Err(failure) => {
                        warn!("{} reply rejected: {}", stage, failure);
                        log.record(stage, reply, AttemptOutcome::Rejected(failure.to_string()));
                    }
                },
                Err(e) => {
                    warn!("{} call failed: {}", stage, e);
                    log.record(stage, "", AttemptOutcome::ServiceFailed(e.to_string()));
                }
            }
        }

        Err(RecoveryError::Unrecoverable {
            shape,
            attempts: log.len(),
            last_raw: log.last_raw().unwrap_or(text).to_string(),
        })
    }
}
