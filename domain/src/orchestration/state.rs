//! Orchestrator state machine

use crate::source::id::SourceId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where an exchange currently is.
///
/// `Idle -> SelectingSources -> {NoContext | SingleSource | MultiSource}
/// -> Synthesizing -> Idle`. Any failure returns straight to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrchestratorState {
    #[default]
    Idle,
    SelectingSources,
    NoContext,
    SingleSource,
    MultiSource,
    Synthesizing,
}

impl OrchestratorState {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrchestratorState::Idle => "idle",
            OrchestratorState::SelectingSources => "selecting_sources",
            OrchestratorState::NoContext => "no_context",
            OrchestratorState::SingleSource => "single_source",
            OrchestratorState::MultiSource => "multi_source",
            OrchestratorState::Synthesizing => "synthesizing",
        }
    }

    /// Whether `next` is a legal successor of `self`.
    pub fn can_transition_to(&self, next: OrchestratorState) -> bool {
        use OrchestratorState::*;
        match (self, next) {
            (_, Idle) => true,
            (Idle, SelectingSources) => true,
            (SelectingSources, NoContext | SingleSource | MultiSource) => true,
            (NoContext | SingleSource | MultiSource, Synthesizing) => true,
            _ => false,
        }
    }
}

impl fmt::Display for OrchestratorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The branch an exchange took after source selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "source", rename_all = "snake_case")]
pub enum Route {
    NoContext,
    SingleSource(SourceId),
    MultiSource,
}

impl Route {
    /// State entered when this route is taken.
    pub fn state(&self) -> OrchestratorState {
        match self {
            Route::NoContext => OrchestratorState::NoContext,
            Route::SingleSource(_) => OrchestratorState::SingleSource,
            Route::MultiSource => OrchestratorState::MultiSource,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use OrchestratorState::*;

    #[test]
    fn test_happy_paths_are_legal() {
        for branch in [NoContext, SingleSource, MultiSource] {
            assert!(Idle.can_transition_to(SelectingSources));
            assert!(SelectingSources.can_transition_to(branch));
            assert!(branch.can_transition_to(Synthesizing));
            assert!(Synthesizing.can_transition_to(Idle));
        }
    }

    #[test]
    fn test_failure_returns_to_idle_from_anywhere() {
        for state in [SelectingSources, NoContext, SingleSource, MultiSource, Synthesizing] {
            assert!(state.can_transition_to(Idle));
        }
    }

    #[test]
    fn test_skipping_states_is_illegal() {
        assert!(!Idle.can_transition_to(Synthesizing));
        assert!(!SelectingSources.can_transition_to(Synthesizing));
        assert!(!NoContext.can_transition_to(MultiSource));
    }

    #[test]
    fn test_route_state() {
        let route = Route::SingleSource(SourceId::new("pyhc").unwrap());
        assert_eq!(route.state(), SingleSource);
        assert_eq!(Route::MultiSource.state(), MultiSource);
    }
}
