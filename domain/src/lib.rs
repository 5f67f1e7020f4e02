//! Domain layer for pyhc-chat
//!
//! This crate contains the core routing concepts, value objects and the
//! deterministic half of structured output recovery. It has no
//! dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Sources
//!
//! A source is one knowledge corpus (a package's repository, or the
//! community website) that can be queried for context. The
//! [`SourceRegistry`] is the read-only catalog of them.
//!
//! ## Routing
//!
//! Each exchange selects zero, one or several sources
//! ([`SelectionResult`]), optionally decomposes the query into one
//! sub-question per source ([`QuestionMap`]), collects answers
//! ([`AnswerMap`]) and synthesizes a final reply.
//!
//! ## Recovery
//!
//! Model output that must become structured data goes through
//! [`recovery::parsing`] first; only rejected text is escalated to a
//! reformatting model call.

pub mod config;
pub mod core;
pub mod orchestration;
pub mod prompt;
pub mod recovery;
pub mod session;
pub mod source;

// Re-export commonly used types
pub use config::{
    ConfigIssue, ConfigIssueCode, ModelConfig, ModelTier, OutputFormat, Severity,
};
pub use core::{error::DomainError, model::Model, query::Query};
pub use orchestration::{
    report::ExchangeReport,
    state::{OrchestratorState, Route},
};
pub use prompt::PromptTemplate;
pub use recovery::{
    attempt::{AttemptOutcome, OutputShape, RecoveryAttempt, RecoveryLog, RecoveryStage},
    parsing::{ParseFailure, parse_question_map, parse_source_set},
};
pub use session::entities::{
    ConversationHistory, ConversationTurn, Message, Role, turns_to_messages,
};
pub use source::{
    id::SourceId,
    maps::{AnswerMap, QuestionMap, QuestionMapError},
    registry::{NO_SOURCE_SENTINEL, SourceDescriptor, SourceRegistry},
    selection::SelectionResult,
};
