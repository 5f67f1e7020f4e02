//! Synthesize Answer use case
//!
//! Produces the final reply, either from the model's own knowledge or from
//! the retrieved per-source answers. The output is free text, so nothing
//! here goes through recovery and nothing is retried.

use crate::config::ExecutionParams;
use crate::ports::llm_gateway::{CompletionRequest, GatewayError, LlmGateway};
use crate::use_cases::shared::{complete_with_timeout, conversation};
use pyhc_domain::{
    AnswerMap, ConversationTurn, ModelConfig, ModelTier, PromptTemplate, Query, SourceRegistry,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur during synthesis
#[derive(Error, Debug)]
pub enum SynthesizeAnswerError {
    #[error("Gateway error: {0}")]
    GatewayError(#[from] GatewayError),

    #[error("No response from model")]
    EmptyResponse,
}

/// Use case for writing the final answer
pub struct SynthesizeAnswerUseCase {
    gateway: Arc<dyn LlmGateway>,
    registry: Arc<SourceRegistry>,
    models: ModelConfig,
    params: ExecutionParams,
}

impl SynthesizeAnswerUseCase {
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
        }
    }

    /// Answer from history and the model's background knowledge only.
    pub async fn no_context(
        &self,
        history: &[ConversationTurn],
        query: &Query,
    ) -> Result<String, SynthesizeAnswerError> {
        info!("Synthesizing without retrieved context");
        self.complete(history, query.content().to_string()).await
    }

    /// Answer using each source's retrieved text.
    pub async fn with_context(
        &self,
        history: &[ConversationTurn],
        query: &Query,
        answers: &AnswerMap,
    ) -> Result<String, SynthesizeAnswerError> {
        info!("Synthesizing from {} retrieved answers", answers.len());
        let prompt = PromptTemplate::synthesis_with_context(query.content(), answers);
        self.complete(history, prompt).await
    }

    async fn complete(
        &self,
        history: &[ConversationTurn],
        user: String,
    ) -> Result<String, SynthesizeAnswerError> {
        let request = CompletionRequest::new(
            ModelTier::Primary,
            self.models.primary.clone(),
            conversation(PromptTemplate::persona_system(&self.registry), history, user),
        )
        .with_temperature(self.params.synthesis_temperature);

        let answer =
            complete_with_timeout(self.gateway.as_ref(), &request, self.params.llm_timeout).await?;
        if answer.trim().is_empty() {
            return Err(SynthesizeAnswerError::EmptyResponse);
        }
        debug!("Synthesized {} chars", answer.len());
        Ok(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::test_support::ScriptedGateway;
    use pyhc_domain::SourceId;

    fn use_case(gateway: Arc<ScriptedGateway>) -> SynthesizeAnswerUseCase {
        SynthesizeAnswerUseCase::new(
            gateway,
            Arc::new(SourceRegistry::builtin()),
            ModelConfig::default(),
            ExecutionParams::default(),
        )
    }

    #[tokio::test]
    async fn test_no_context_sends_query_verbatim() {
        let gateway = Arc::new(ScriptedGateway::new().primary("Hello! How can I help?"));
        let query = Query::try_new("Hi there").unwrap();
        let answer = use_case(gateway.clone())
            .no_context(&[], &query)
            .await
            .unwrap();

        assert_eq!(answer, "Hello! How can I help?");
        let request = &gateway.requests()[0];
        assert!(request.messages[0].content.contains("You are PyHC-Chat"));
        assert_eq!(request.last_user_content(), Some("Hi there"));
        assert_eq!(request.temperature, 0.7);
    }

    #[tokio::test]
    async fn test_with_context_labels_answers() {
        let gateway = Arc::new(ScriptedGateway::new().primary("Monday at 10am."));
        let query = Query::try_new("When is the next PyHC meeting?").unwrap();
        let answers = AnswerMap::single(SourceId::new("pyhc").unwrap(), "The telecon is Monday.");
        use_case(gateway.clone())
            .with_context(&[], &query, &answers)
            .await
            .unwrap();

        let prompt = gateway.requests()[0]
            .last_user_content()
            .unwrap()
            .to_string();
        assert!(prompt.contains("1. (from pyhc): `The telecon is Monday.`"));
        assert!(prompt.contains("When is the next PyHC meeting?"));
    }

    #[tokio::test]
    async fn test_blank_answer_is_an_error() {
        let gateway = Arc::new(ScriptedGateway::new().primary("  "));
        let query = Query::try_new("q").unwrap();
        let err = use_case(gateway).no_context(&[], &query).await.unwrap_err();
        assert!(matches!(err, SynthesizeAnswerError::EmptyResponse));
    }
}
