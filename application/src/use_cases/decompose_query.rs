//! Decompose Query use case
//!
//! Produces one targeted sub-question per selected source.

use crate::config::ExecutionParams;
use crate::ports::llm_gateway::{CompletionRequest, GatewayError, LlmGateway};
use crate::use_cases::recover_output::{RecoveryError, StructuredOutputRecovery};
use crate::use_cases::shared::{complete_with_timeout, conversation};
use pyhc_domain::{
    ConversationTurn, ModelConfig, ModelTier, PromptTemplate, Query, QuestionMap, SourceId,
    SourceRegistry,
};
use std::collections::BTreeSet;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur during query decomposition
#[derive(Error, Debug)]
pub enum DecomposeQueryError {
    #[error("No sources to decompose for")]
    NoSources,

    #[error("Gateway error: {0}")]
    GatewayError(#[from] GatewayError),

    #[error(transparent)]
    Recovery(#[from] RecoveryError),
}

/// Use case for splitting a query across a fixed set of sources
pub struct DecomposeQueryUseCase {
    gateway: Arc<dyn LlmGateway>,
    registry: Arc<SourceRegistry>,
    recovery: Arc<StructuredOutputRecovery>,
    models: ModelConfig,
    params: ExecutionParams,
}

impl DecomposeQueryUseCase {
    pub fn new(
        gateway: Arc<dyn LlmGateway>,
        registry: Arc<SourceRegistry>,
        recovery: Arc<StructuredOutputRecovery>,
        models: ModelConfig,
        params: ExecutionParams,
    ) -> Self {
        Self {
            gateway,
            registry,
            recovery,
            models,
            params,
        }
    }

    /// The returned map's key set equals `sources` exactly.
    pub async fn execute(
        &self,
        history: &[ConversationTurn],
        query: &Query,
        sources: &BTreeSet<SourceId>,
    ) -> Result<QuestionMap, DecomposeQueryError> {
        if sources.is_empty() {
            return Err(DecomposeQueryError::NoSources);
        }

        let request = CompletionRequest::new(
            ModelTier::Primary,
            self.models.primary.clone(),
            conversation(
                PromptTemplate::decomposer_system(sources, &self.registry),
                history,
                query.content(),
            ),
        )
        .with_temperature(self.params.decomposition_temperature);

        let reply =
            complete_with_timeout(self.gateway.as_ref(), &request, self.params.llm_timeout).await?;
        debug!("Decomposer replied: {}", reply);

        let questions = self.recovery.recover_question_map(&reply, sources).await?;
        info!("Decomposed query into {} sub-questions", questions.len());
        Ok(questions)
    }
}
