//! Orchestration domain
//!
//! - [`state::OrchestratorState`]: per-exchange state machine
//! - [`state::Route`]: branch chosen from the selection cardinality
//! - [`report::ExchangeReport`]: answer plus routing detail

pub mod report;
pub mod state;
