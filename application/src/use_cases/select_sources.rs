//! Select Sources use case
//!
//! Asks the primary model which sources (if any) the latest query needs and
//! recovers a validated [`SelectionResult`] from its reply.

use crate::config::ExecutionParams;
use crate::ports::llm_gateway::{CompletionRequest, GatewayError, LlmGateway};
use crate::use_cases::recover_output::{RecoveryError, StructuredOutputRecovery};
use crate::use_cases::shared::{complete_with_timeout, conversation};
use pyhc_domain::{
    ConversationTurn, ModelConfig, ModelTier, PromptTemplate, Query, SelectionResult,
    SourceRegistry,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur during source selection
#[derive(Error, Debug)]
pub enum SelectSourcesError {
    #[error("Gateway error: {0}")]
    GatewayError(#[from] GatewayError),

    #[error(transparent)]
    Recovery(#[from] RecoveryError),
}

/// Use case for choosing the sources relevant to a query
pub struct SelectSourcesUseCase {
    gateway: Arc<dyn LlmGateway>,
    registry: Arc<SourceRegistry>,
    recovery: Arc<StructuredOutputRecovery>,
    models: ModelConfig,
    params: ExecutionParams,
}

impl SelectSourcesUseCase {
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

    pub async fn execute(
        &self,
        history: &[ConversationTurn],
        query: &Query,
    ) -> Result<SelectionResult, SelectSourcesError> {
        let request = CompletionRequest::new(
            ModelTier::Primary,
            self.models.primary.clone(),
            conversation(
                PromptTemplate::selector_system(&self.registry),
                history,
                query.content(),
            ),
        )
        .with_temperature(self.params.selection_temperature);

        let reply =
            complete_with_timeout(self.gateway.as_ref(), &request, self.params.llm_timeout).await?;
        debug!("Selector replied: {}", reply);

        let selection = self.recovery.recover_source_set(&reply).await?;
        info!("Selected sources: {}", selection);
        Ok(selection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::test_support::ScriptedGateway;
    use pyhc_domain::{Role, SourceId};

    fn use_case(gateway: Arc<ScriptedGateway>) -> SelectSourcesUseCase {
        let registry = Arc::new(SourceRegistry::builtin());
        let recovery = Arc::new(StructuredOutputRecovery::new(
            gateway.clone(),
            registry.clone(),
            ModelConfig::default(),
            ExecutionParams::default(),
        ));
        SelectSourcesUseCase::new(
            gateway,
            registry,
            recovery,
            ModelConfig::default(),
            ExecutionParams::default(),
        )
    }

    #[tokio::test]
    async fn test_community_question_selects_pyhc() {
        let gateway = Arc::new(ScriptedGateway::new().primary("pyhc"));
        let query = Query::try_new("When is the next PyHC meeting?").unwrap();
        let selection = use_case(gateway.clone()).execute(&[], &query).await.unwrap();

        assert_eq!(selection.single(), Some(&SourceId::new("pyhc").unwrap()));
        assert_eq!(gateway.primary_calls(), 1);
        assert_eq!(gateway.recovery_calls(), 0);
    }

    #[tokio::test]
    async fn test_request_carries_history_and_query() {
        let gateway = Arc::new(ScriptedGateway::new().primary("N/A"));
        let history = vec![
            ConversationTurn::User("What is SunPy?".into()),
            ConversationTurn::Assistant("A solar data package.".into()),
        ];
        let query = Query::try_new("Thanks!").unwrap();
        use_case(gateway.clone())
            .execute(&history, &query)
            .await
            .unwrap();

        let request = &gateway.requests()[0];
        assert_eq!(request.tier, ModelTier::Primary);
        assert_eq!(request.temperature, 0.0);
        assert_eq!(request.messages.len(), 4);
        assert_eq!(request.messages[0].role, Role::System);
        assert_eq!(request.messages[3].content, "Thanks!");
    }

    #[tokio::test]
    async fn test_unrecoverable_reply_propagates() {
        let gateway = Arc::new(
            ScriptedGateway::new()
                .primary("Let me think about that...")
                .recovery("still thinking")
                .recovery("almost there"),
        );
        let query = Query::try_new("How do I plot a map?").unwrap();
        let err = use_case(gateway.clone())
            .execute(&[], &query)
            .await
            .unwrap_err();
        assert!(matches!(err, SelectSourcesError::Recovery(_)));
        assert_eq!(gateway.recovery_calls(), 2);
    }

    #[tokio::test]
    async fn test_gateway_failure_propagates_without_recovery() {
        let gateway = Arc::new(
            ScriptedGateway::new().primary_result(Err(GatewayError::ConnectionError("down".into()))),
        );
        let query = Query::try_new("anything").unwrap();
        let err = use_case(gateway.clone())
            .execute(&[], &query)
            .await
            .unwrap_err();
        assert!(matches!(err, SelectSourcesError::GatewayError(_)));
        assert_eq!(gateway.recovery_calls(), 0);
    }
}
