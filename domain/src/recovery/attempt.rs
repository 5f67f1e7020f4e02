//! Recovery bookkeeping
//!
//! Attempts live only for the duration of one recovery call and are used to
//! bound escalation and to report what was tried when recovery gives up.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Target shape being recovered from free text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputShape {
    /// Comma-separated source names, or the sentinel
    SourceSet,
    /// One `source: question` line per requested source
    QuestionMap,
}

impl OutputShape {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputShape::SourceSet => "source_set",
            OutputShape::QuestionMap => "question_map",
        }
    }
}

impl fmt::Display for OutputShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which tier examined the text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "tier", rename_all = "snake_case")]
pub enum RecoveryStage {
    Deterministic,
    ModelAssisted { attempt: usize },
}

impl RecoveryStage {
    pub fn is_model_assisted(&self) -> bool {
        matches!(self, RecoveryStage::ModelAssisted { .. })
    }
}

impl fmt::Display for RecoveryStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecoveryStage::Deterministic => write!(f, "deterministic"),
            RecoveryStage::ModelAssisted { attempt } => write!(f, "model-assisted #{}", attempt),
        }
    }
}

/// What happened on one attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum AttemptOutcome {
    Parsed,
    /// The text was examined but did not satisfy the target shape
    Rejected(String),
    /// The reformatting call itself failed; no text was produced
    ServiceFailed(String),
}

impl AttemptOutcome {
    pub fn is_parsed(&self) -> bool {
        matches!(self, AttemptOutcome::Parsed)
    }
}

/// One examined piece of text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoveryAttempt {
    /// 1-based
    pub ordinal: usize,
    pub stage: RecoveryStage,
    pub raw: String,
    pub outcome: AttemptOutcome,
}

/// Ordered record of the attempts made by one recovery call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecoveryLog {
    attempts: Vec<RecoveryAttempt>,
}

impl RecoveryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an attempt; the ordinal is assigned here.
    pub fn record(
        &mut self,
        stage: RecoveryStage,
        raw: impl Into<String>,
        outcome: AttemptOutcome,
    ) -> &RecoveryAttempt {
        let ordinal = self.attempts.len() + 1;
        self.attempts.push(RecoveryAttempt {
            ordinal,
            stage,
            raw: raw.into(),
            outcome,
        });
        &self.attempts[ordinal - 1]
    }

    pub fn attempts(&self) -> &[RecoveryAttempt] {
        &self.attempts
    }

    pub fn len(&self) -> usize {
        self.attempts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attempts.is_empty()
    }

    pub fn model_assisted_count(&self) -> usize {
        self.attempts
            .iter()
            .filter(|a| a.stage.is_model_assisted())
            .count()
    }

    /// Raw text of the last attempt that actually produced text.
    pub fn last_raw(&self) -> Option<&str> {
        self.attempts
            .iter()
            .rev()
            .find(|a| !matches!(a.outcome, AttemptOutcome::ServiceFailed(_)))
            .map(|a| a.raw.as_str())
    }
}
