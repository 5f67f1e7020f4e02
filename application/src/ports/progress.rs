//! Progress notification port
//!
//! Defines the interface for reporting progress while an exchange runs.

use pyhc_domain::{AnswerMap, OrchestratorState, QuestionMap, SelectionResult, SourceId};

/// Callback for progress updates during an exchange
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (spinners, verbose routing output, etc.)
pub trait ProgressNotifier: Send + Sync {
    /// Called on every orchestrator state transition
    fn on_state_change(&self, state: OrchestratorState);

    /// Called once the selection has been recovered
    fn on_sources_selected(&self, _selection: &SelectionResult) {}

    /// Called once the multi-source sub-questions have been recovered
    fn on_questions_decomposed(&self, _questions: &QuestionMap) {}

    /// Called when a retrieval for `source` is dispatched
    fn on_retrieval_start(&self, _source: &SourceId) {}

    /// Called when a retrieval for `source` finishes
    fn on_retrieval_complete(&self, _source: &SourceId, _success: bool) {}

    /// Called with every retrieved answer before synthesis
    fn on_answers_retrieved(&self, _answers: &AnswerMap) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_state_change(&self, _state: OrchestratorState) {}
}
