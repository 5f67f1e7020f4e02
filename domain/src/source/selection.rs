//! Source selection result

use crate::source::id::SourceId;
use crate::source::registry::NO_SOURCE_SENTINEL;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Outcome of deciding which sources a query needs.
///
/// Either the "no source" sentinel, or a non-empty, duplicate-free set of
/// registry ids. The set variant can only be built through
/// [`SelectionResult::from_sources`], which rejects an empty set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "sources", rename_all = "snake_case")]
pub enum SelectionResult {
    /// No retrieval is needed.
    None,
    /// One or more sources to retrieve from.
    Sources(BTreeSet<SourceId>),
}

impl SelectionResult {
    /// Build a selection from ids, collapsing duplicates.
    ///
    /// Returns `None` when the iterator yields nothing.
    pub fn from_sources(ids: impl IntoIterator<Item = SourceId>) -> Option<Self> {
        let set: BTreeSet<SourceId> = ids.into_iter().collect();
        if set.is_empty() {
            None
        } else {
            Some(SelectionResult::Sources(set))
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, SelectionResult::None)
    }

    /// Selected ids (empty for the sentinel).
    pub fn sources(&self) -> impl Iterator<Item = &SourceId> {
        match self {
            SelectionResult::None => None,
            SelectionResult::Sources(set) => Some(set.iter()),
        }
        .into_iter()
        .flatten()
    }

    pub fn source_set(&self) -> Option<&BTreeSet<SourceId>> {
        match self {
            SelectionResult::None => None,
            SelectionResult::Sources(set) => Some(set),
        }
    }

    pub fn len(&self) -> usize {
        self.source_set().map_or(0, BTreeSet::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The only selected source, when exactly one was selected.
    pub fn single(&self) -> Option<&SourceId> {
        match self.source_set() {
            Some(set) if set.len() == 1 => set.iter().next(),
            _ => None,
        }
    }
}

impl std::fmt::Display for SelectionResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SelectionResult::None => f.write_str(NO_SOURCE_SENTINEL),
            SelectionResult::Sources(set) => {
                let names: Vec<&str> = set.iter().map(SourceId::as_str).collect();
                f.write_str(&names.join(", "))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sid(s: &str) -> SourceId {
        SourceId::new(s).unwrap()
    }

    #[test]
    fn test_from_sources_collapses_duplicates() {
        let sel = SelectionResult::from_sources([sid("sunpy"), sid("pysat"), sid("sunpy")]).unwrap();
        assert_eq!(sel.len(), 2);
        assert!(sel.single().is_none());
        assert_eq!(sel.to_string(), "pysat, sunpy");
    }

    #[test]
    fn test_from_sources_rejects_empty() {
        assert!(SelectionResult::from_sources(Vec::new()).is_none());
    }

    #[test]
    fn test_single() {
        let sel = SelectionResult::from_sources([sid("pyhc")]).unwrap();
        assert_eq!(sel.single(), Some(&sid("pyhc")));
        assert!(!sel.is_none());
    }

    #[test]
    fn test_sentinel() {
        let sel = SelectionResult::None;
        assert!(sel.is_none());
        assert!(sel.is_empty());
        assert_eq!(sel.sources().count(), 0);
        assert_eq!(sel.to_string(), "N/A");
    }
}
