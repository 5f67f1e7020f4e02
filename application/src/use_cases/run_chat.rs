//! Run Chat use case
//!
//! Drives one chat session: source selection, routing on the selection's
//! cardinality, retrieval, synthesis, and the append-only conversation
//! history.
//!
//! ```text
//! Idle -> SelectingSources -+-> NoContext ----+
//!                           +-> SingleSource -+-> Synthesizing -> Idle
//!                           +-> MultiSource --+
//! ```
//!
//! Any failure or cancellation returns to `Idle` without touching history.

use crate::config::ExecutionParams;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::llm_gateway::{GatewayError, LlmGateway};
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::ports::retriever::{RetrievalError, SourceRetriever};
use crate::use_cases::decompose_query::{DecomposeQueryError, DecomposeQueryUseCase};
use crate::use_cases::recover_output::{RecoveryError, StructuredOutputRecovery};
use crate::use_cases::select_sources::{SelectSourcesError, SelectSourcesUseCase};
use crate::use_cases::shared::retrieve_with_timeout;
use crate::use_cases::synthesize_answer::{SynthesizeAnswerError, SynthesizeAnswerUseCase};
use pyhc_domain::core::string::truncate;
use pyhc_domain::{
    AnswerMap, ConversationHistory, ConversationTurn, ExchangeReport, ModelConfig,
    OrchestratorState, Query, QuestionMap, Route, SelectionResult, SourceId, SourceRegistry,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// A remote collaborator failed
#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Retrieval(#[from] RetrievalError),

    #[error("Model returned an empty answer")]
    EmptyAnswer,
}

/// Errors surfaced at the orchestrator boundary
///
/// Every error is scoped to one exchange; the session stays usable.
#[derive(Error, Debug)]
pub enum ChatError {
    #[error("Could not interpret model output: {0}")]
    UnrecoverableOutput(#[from] RecoveryError),

    #[error("Upstream service failed: {0}")]
    UpstreamService(#[from] UpstreamError),

    #[error("Invariant violated: {0}")]
    InvariantViolation(String),

    #[error("Query is empty")]
    EmptyQuery,

    #[error("Cancelled")]
    Cancelled,
}

impl ChatError {
    /// Stable category name for logs.
    pub fn category(&self) -> &'static str {
        match self {
            ChatError::UnrecoverableOutput(_) => "unrecoverable_output",
            ChatError::UpstreamService(_) => "upstream_service",
            ChatError::InvariantViolation(_) => "invariant_violation",
            ChatError::EmptyQuery => "empty_query",
            ChatError::Cancelled => "cancelled",
        }
    }

    /// Message safe to show the user. Never contains model output.
    pub fn user_message(&self) -> &'static str {
        match self {
            ChatError::UnrecoverableOutput(_)
            | ChatError::UpstreamService(_)
            | ChatError::InvariantViolation(_) => {
                "Sorry, I could not process that request. Please try again or rephrase your question."
            }
            ChatError::EmptyQuery => "Please enter a question.",
            ChatError::Cancelled => "Request cancelled.",
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ChatError::Cancelled)
    }
}

impl From<SelectSourcesError> for ChatError {
    fn from(e: SelectSourcesError) -> Self {
        match e {
            SelectSourcesError::GatewayError(e) => UpstreamError::Gateway(e).into(),
            SelectSourcesError::Recovery(e) => e.into(),
        }
    }
}

impl From<DecomposeQueryError> for ChatError {
    fn from(e: DecomposeQueryError) -> Self {
        match e {
            DecomposeQueryError::NoSources => {
                ChatError::InvariantViolation("decomposition requested for no sources".into())
            }
            DecomposeQueryError::GatewayError(e) => UpstreamError::Gateway(e).into(),
            DecomposeQueryError::Recovery(e) => e.into(),
        }
    }
}

impl From<SynthesizeAnswerError> for ChatError {
    fn from(e: SynthesizeAnswerError) -> Self {
        match e {
            SynthesizeAnswerError::GatewayError(e) => UpstreamError::Gateway(e).into(),
            SynthesizeAnswerError::EmptyResponse => UpstreamError::EmptyAnswer.into(),
        }
    }
}

impl From<RetrievalError> for ChatError {
    fn from(e: RetrievalError) -> Self {
        UpstreamError::Retrieval(e).into()
    }
}

/// One chat session.
///
/// Owns the [`ConversationHistory`]; every other component only ever sees a
/// read-only snapshot of it.
pub struct ChatOrchestrator {
    gateway: Arc<dyn LlmGateway>,
    retriever: Arc<dyn SourceRetriever>,
    registry: Arc<SourceRegistry>,
    models: ModelConfig,
    params: ExecutionParams,
    conversation_logger: Arc<dyn ConversationLogger>,
    history: ConversationHistory,
    state: OrchestratorState,
}

impl ChatOrchestrator {
    pub fn new(
        gateway: Arc<dyn LlmGateway>,
        retriever: Arc<dyn SourceRetriever>,
        registry: Arc<SourceRegistry>,
        models: ModelConfig,
        params: ExecutionParams,
    ) -> Self {
        Self {
            gateway,
            retriever,
            registry,
            models,
            params,
            conversation_logger: Arc::new(NoConversationLogger),
            history: ConversationHistory::new(),
            state: OrchestratorState::Idle,
        }
    }

    /// Create with a conversation logger.
    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    pub fn state(&self) -> OrchestratorState {
        self.state
    }

    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    pub fn models(&self) -> &ModelConfig {
        &self.models
    }

    /// Forget every exchange of this session.
    pub fn reset(&mut self) {
        info!("Resetting session ({} turns dropped)", self.history.len());
        self.history.clear();
        self.state = OrchestratorState::Idle;
    }

    /// Answer `query` with no progress reporting and no cancellation.
    pub async fn submit(&mut self, query: &str) -> Result<ExchangeReport, ChatError> {
        self.submit_with_progress(query, &NoProgress, &CancellationToken::new())
            .await
    }

    /// Answer `query`, reporting progress and honoring `cancellation`.
    ///
    /// On success the exchange is appended to history (user turn, then
    /// assistant turn). On any error, including cancellation, history is
    /// left exactly as it was.
    pub async fn submit_with_progress(
        &mut self,
        query: &str,
        progress: &dyn ProgressNotifier,
        cancellation: &CancellationToken,
    ) -> Result<ExchangeReport, ChatError> {
        let Some(query) = Query::try_new(query) else {
            return Err(ChatError::EmptyQuery);
        };
        info!("Starting exchange: {}", truncate(query.content(), 100));

        let result = tokio::select! {
            biased;
            _ = cancellation.cancelled() => Err(ChatError::Cancelled),
            result = self.run_exchange(&query, progress) => result,
        };

        match &result {
            Ok(report) => {
                self.history
                    .append_exchange(query.content(), report.answer.clone());
                self.conversation_logger.log(ConversationEvent::new(
                    "exchange_completed",
                    json!({
                        "query": query.content(),
                        "route": report.route,
                        "answer": report.answer,
                    }),
                ));
            }
            Err(e) => {
                warn!("Exchange failed ({}): {}", e.category(), e);
                self.conversation_logger.log(ConversationEvent::new(
                    "exchange_failed",
                    json!({
                        "query": query.content(),
                        "category": e.category(),
                        "error": e.to_string(),
                    }),
                ));
            }
        }

        self.transition(OrchestratorState::Idle, progress);
        result
    }

    async fn run_exchange(
        &mut self,
        query: &Query,
        progress: &dyn ProgressNotifier,
    ) -> Result<ExchangeReport, ChatError> {
        self.transition(OrchestratorState::SelectingSources, progress);
        let history = self.history.turns().to_vec();
        let recovery = Arc::new(
            StructuredOutputRecovery::new(
                Arc::clone(&self.gateway),
                Arc::clone(&self.registry),
                self.models.clone(),
                self.params.clone(),
            )
            .with_conversation_logger(Arc::clone(&self.conversation_logger)),
        );

        let selection = self
            .selector(Arc::clone(&recovery))
            .execute(&history, query)
            .await?;
        progress.on_sources_selected(&selection);
        self.conversation_logger.log(ConversationEvent::new(
            "sources_selected",
            json!({
                "query": query.content(),
                "sources": selection.sources().map(SourceId::as_str).collect::<Vec<_>>(),
            }),
        ));

        let synthesizer = self.synthesizer();

        match selection {
            SelectionResult::None => {
                self.transition(OrchestratorState::NoContext, progress);
                self.transition(OrchestratorState::Synthesizing, progress);
                let answer = synthesizer.no_context(&history, query).await?;
                Ok(ExchangeReport::no_context(answer))
            }
            SelectionResult::Sources(sources) if sources.len() == 1 => {
                let Some(source) = sources.into_iter().next() else {
                    return Err(ChatError::InvariantViolation("empty source set".into()));
                };
                self.transition(OrchestratorState::SingleSource, progress);

                let answer = self
                    .retrieve_one(&source, query.content(), &history, progress)
                    .await?;
                let answers = AnswerMap::single(source.clone(), answer);
                progress.on_answers_retrieved(&answers);

                self.transition(OrchestratorState::Synthesizing, progress);
                let answer = synthesizer.with_context(&history, query, &answers).await?;
                Ok(ExchangeReport {
                    answer,
                    route: Route::SingleSource(source),
                    questions: None,
                    answers,
                })
            }
            SelectionResult::Sources(sources) => {
                self.transition(OrchestratorState::MultiSource, progress);

                let questions = self
                    .decomposer(recovery)
                    .execute(&history, query, &sources)
                    .await?;
                if !questions.covers_exactly(&sources) {
                    return Err(ChatError::InvariantViolation(format!(
                        "sub-questions cover [{}], selected [{}]",
                        join(questions.keys().iter()),
                        join(sources.iter()),
                    )));
                }
                progress.on_questions_decomposed(&questions);
                self.conversation_logger.log(ConversationEvent::new(
                    "questions_decomposed",
                    json!({ "questions": questions }),
                ));

                let answers = self.retrieve_many(&questions, &history, progress).await?;
                progress.on_answers_retrieved(&answers);

                self.transition(OrchestratorState::Synthesizing, progress);
                let answer = synthesizer.with_context(&history, query, &answers).await?;
                Ok(ExchangeReport {
                    answer,
                    route: Route::MultiSource,
                    questions: Some(questions),
                    answers,
                })
            }
        }
    }

    /// Single-source path: the original query goes to the source verbatim.
    async fn retrieve_one(
        &self,
        source: &SourceId,
        question: &str,
        history: &[ConversationTurn],
        progress: &dyn ProgressNotifier,
    ) -> Result<String, ChatError> {
        progress.on_retrieval_start(source);
        let result = retrieve_with_timeout(
            self.retriever.as_ref(),
            source,
            question,
            history,
            self.params.retrieval_timeout,
        )
        .await;
        progress.on_retrieval_complete(source, result.is_ok());

        let answer = result?;
        self.log_source_answer(source, question, &answer);
        Ok(answer)
    }

    /// Multi-source path: one bounded-concurrency retrieval per sub-question.
    async fn retrieve_many(
        &self,
        questions: &QuestionMap,
        history: &[ConversationTurn],
        progress: &dyn ProgressNotifier,
    ) -> Result<AnswerMap, ChatError> {
        info!("Retrieving from {} sources", questions.len());
        let permits = Arc::new(Semaphore::new(self.params.max_concurrent_retrievals.max(1)));
        let history: Arc<[ConversationTurn]> = history.into();
        let mut join_set = JoinSet::new();

        for (source, question) in questions.iter() {
            let retriever = Arc::clone(&self.retriever);
            let permits = Arc::clone(&permits);
            let history = Arc::clone(&history);
            let source = source.clone();
            let question = question.to_string();
            let timeout = self.params.retrieval_timeout;

            progress.on_retrieval_start(&source);
            join_set.spawn(async move {
                let _permit = permits.acquire_owned().await;
                let result =
                    retrieve_with_timeout(retriever.as_ref(), &source, &question, &history, timeout)
                        .await;
                (source, question, result)
            });
        }

        let mut answers = AnswerMap::new();
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((source, question, Ok(answer))) => {
                    debug!("Source {} answered", source);
                    progress.on_retrieval_complete(&source, true);
                    self.log_source_answer(&source, &question, &answer);
                    answers.insert(source, answer);
                }
                Ok((source, _, Err(e))) => {
                    warn!("Source {} failed: {}", source, e);
                    progress.on_retrieval_complete(&source, false);
                    return Err(e.into());
                }
                Err(e) => {
                    return Err(ChatError::InvariantViolation(format!(
                        "retrieval task aborted: {}",
                        e
                    )));
                }
            }
        }

        Ok(answers)
    }

    fn log_source_answer(&self, source: &SourceId, question: &str, answer: &str) {
        self.conversation_logger.log(ConversationEvent::new(
            "source_answer",
            json!({
                "source": source.as_str(),
                "question": question,
                "answer": answer,
            }),
        ));
    }

    fn transition(&mut self, next: OrchestratorState, progress: &dyn ProgressNotifier) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal transition {} -> {}",
            self.state,
            next
        );
        debug!("State: {} -> {}", self.state, next);
        self.state = next;
        progress.on_state_change(next);
    }

    fn selector(&self, recovery: Arc<StructuredOutputRecovery>) -> SelectSourcesUseCase {
        SelectSourcesUseCase::new(
            Arc::clone(&self.gateway),
            Arc::clone(&self.registry),
            recovery,
            self.models.clone(),
            self.params.clone(),
        )
    }

    fn decomposer(&self, recovery: Arc<StructuredOutputRecovery>) -> DecomposeQueryUseCase {
        DecomposeQueryUseCase::new(
            Arc::clone(&self.gateway),
            Arc::clone(&self.registry),
            recovery,
            self.models.clone(),
            self.params.clone(),
        )
    }

    fn synthesizer(&self) -> SynthesizeAnswerUseCase {
        SynthesizeAnswerUseCase::new(
            Arc::clone(&self.gateway),
            Arc::clone(&self.registry),
            self.models.clone(),
            self.params.clone(),
        )
    }
}

fn join<'a>(ids: impl Iterator<Item = &'a SourceId>) -> String {
    ids.map(SourceId::as_str).collect::<Vec<_>>().join(", ")
}
