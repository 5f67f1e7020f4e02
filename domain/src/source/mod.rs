//! Knowledge sources and the values routed between them.
//!
//! - [`id::SourceId`]: validated, lowercase source identifier
//! - [`registry::SourceRegistry`]: read-only catalog plus community id and sentinel
//! - [`selection::SelectionResult`]: sentinel or a non-empty id set
//! - [`maps::QuestionMap`] / [`maps::AnswerMap`]: per-source questions and answers

pub mod id;
pub mod maps;
pub mod registry;
pub mod selection;
