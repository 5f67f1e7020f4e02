//! Result of one completed exchange

use crate::orchestration::state::Route;
use crate::source::maps::{AnswerMap, QuestionMap};
use serde::Serialize;

/// What the orchestrator returns for a completed exchange.
///
/// `questions` is present only on the multi-source route; `answers` is
/// empty on the no-context route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExchangeReport {
    pub answer: String,
    pub route: Route,
    pub questions: Option<QuestionMap>,
    pub answers: AnswerMap,
}

impl ExchangeReport {
    pub fn no_context(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            route: Route::NoContext,
            questions: None,
            answers: AnswerMap::new(),
        }
    }

    pub fn retrieval_count(&self) -> usize {
        self.answers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_context_report() {
        let report = ExchangeReport::no_context("Hello!");
        assert_eq!(report.route, Route::NoContext);
        assert_eq!(report.retrieval_count(), 0);
        assert!(report.questions.is_none());
    }

    #[test]
    fn test_serializes_route_tag() {
        let json = serde_json::to_value(ExchangeReport::no_context("hi")).unwrap();
        assert_eq!(json["route"]["kind"], "no_context");
        assert_eq!(json["answer"], "hi");
    }
}
