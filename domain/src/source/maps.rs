//! Per-source question and answer maps

use crate::source::id::SourceId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

/// Why a candidate question map failed validation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuestionMapError {
    #[error("missing questions for: {}", join_ids(.0))]
    Missing(Vec<SourceId>),

    #[error("unrequested sources present: {}", join_ids(.0))]
    Unrequested(Vec<SourceId>),

    #[error("empty question for '{0}'")]
    EmptyQuestion(SourceId),
}

fn join_ids(ids: &[SourceId]) -> String {
    ids.iter().map(SourceId::as_str).collect::<Vec<_>>().join(", ")
}

/// One targeted sub-question per source.
///
/// Invariant: the key set equals the set it was validated against, and
/// every question is non-empty. Only [`QuestionMap::validated`] builds one,
/// so the type is serialize-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionMap(BTreeMap<SourceId, String>);

impl QuestionMap {
    /// Validate `entries` against `required`.
    ///
    /// Fails on any missing key, any extra key, or any blank question.
    pub fn validated(
        entries: BTreeMap<SourceId, String>,
        required: &BTreeSet<SourceId>,
    ) -> Result<Self, QuestionMapError> {
        let extra: Vec<SourceId> = entries
            .keys()
            .filter(|k| !required.contains(*k))
            .cloned()
            .collect();
        if !extra.is_empty() {
            return Err(QuestionMapError::Unrequested(extra));
        }

        let missing: Vec<SourceId> = required
            .iter()
            .filter(|k| !entries.contains_key(*k))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(QuestionMapError::Missing(missing));
        }

        let mut normalized = BTreeMap::new();
        for (id, question) in entries {
            let question = question.trim();
            if question.is_empty() {
                return Err(QuestionMapError::EmptyQuestion(id));
            }
            normalized.insert(id, question.to_string());
        }

        Ok(Self(normalized))
    }

    pub fn get(&self, id: &SourceId) -> Option<&str> {
        self.0.get(id).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SourceId, &str)> {
        self.0.iter().map(|(k, v)| (k, v.as_str()))
    }

    pub fn keys(&self) -> BTreeSet<SourceId> {
        self.0.keys().cloned().collect()
    }

    /// Whether the key set is exactly `sources`.
    pub fn covers_exactly(&self, sources: &BTreeSet<SourceId>) -> bool {
        self.0.len() == sources.len() && sources.iter().all(|s| self.0.contains_key(s))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl IntoIterator for QuestionMap {
    type Item = (SourceId, String);
    type IntoIter = std::collections::btree_map::IntoIter<SourceId, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Retrieved answer text per source, as produced by the retrieval service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerMap(BTreeMap<SourceId, String>);

impl AnswerMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// A map holding a single source's answer.
    pub fn single(id: SourceId, answer: impl Into<String>) -> Self {
        let mut map = Self::new();
        map.insert(id, answer);
        map
    }

    pub fn insert(&mut self, id: SourceId, answer: impl Into<String>) {
        self.0.insert(id, answer.into());
    }

    pub fn get(&self, id: &SourceId) -> Option<&str> {
        self.0.get(id).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SourceId, &str)> {
        self.0.iter().map(|(k, v)| (k, v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(SourceId, String)> for AnswerMap {
    fn from_iter<I: IntoIterator<Item = (SourceId, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
