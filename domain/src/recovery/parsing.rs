//! Deterministic parsing of free-form model output.
//!
//! These functions are the cheap tier of structured output recovery: pure
//! text handling with no model calls. They either produce a value that
//! already satisfies its structural invariant, or report why the text was
//! rejected so the caller can escalate.
//!
//! # Functions
//!
//! | Function | Target shape | Accepted input |
//! |----------|--------------|----------------|
//! | [`parse_source_set`] | [`SelectionResult`] | `a, b`, `["a", "b"]`, one id per line, `N/A` |
//! | [`parse_question_map`] | [`QuestionMap`] | `a: question` lines, JSON object (optionally fenced) |

use crate::source::id::SourceId;
use crate::source::maps::{QuestionMap, QuestionMapError};
use crate::source::registry::SourceRegistry;
use crate::source::selection::SelectionResult;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;
use thiserror::Error;

/// Why the deterministic tier rejected a piece of text
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseFailure {
    #[error("text is empty")]
    EmptyText,

    #[error("no known source names found")]
    NoKnownSources,

    #[error("no `source: question` entries found")]
    NoEntries,

    #[error("question map rejected: {0}")]
    InvalidMap(#[from] QuestionMapError),
}

/// Characters removed before splitting a source list.
const LIST_PUNCTUATION: &[char] = &['[', ']', '{', '}', '(', ')', '"', '\'', '`', '*'];

/// `<identifier>: <text>`, tolerating list markers, quotes and a trailing comma.
static ENTRY_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^\s*(?:[-*•]\s+|\d+[.)]\s+)?["'`*]*([A-Za-z0-9_.\-]+)["'`*]*\s*:\s*(.*?)\s*,?\s*$"#,
    )
    .expect("entry line pattern is valid")
});

/// Leading `1.` / `2)` numbering. `)` is already gone by the time set
/// tokens are normalized, so the marker punctuation is optional.
static NUMBER_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+[.)]?\s+").expect("number marker pattern is valid"));

/// Parse a list of source names.
///
/// Bracket, brace and quote punctuation is stripped, the text is split on
/// commas (and newlines/semicolons), and each token is matched
/// case-insensitively against the registry. Unknown tokens are dropped.
/// If any token is the sentinel, the result is exactly
/// [`SelectionResult::None`] regardless of other tokens.
///
/// # Examples
///
/// ```
/// use pyhc_domain::recovery::parsing::parse_source_set;
/// use pyhc_domain::{SelectionResult, SourceRegistry};
///
/// let registry = SourceRegistry::builtin();
/// let sel = parse_source_set("['SunPy', 'pysat']", &registry).unwrap();
/// assert_eq!(sel.len(), 2);
/// assert_eq!(parse_source_set("sunpy, N/A", &registry).unwrap(), SelectionResult::None);
/// ```
pub fn parse_source_set(
    text: &str,
    registry: &SourceRegistry,
) -> Result<SelectionResult, ParseFailure> {
    if text.trim().is_empty() {
        return Err(ParseFailure::EmptyText);
    }

    let cleaned: String = text
        .chars()
        .filter(|c| !LIST_PUNCTUATION.contains(c))
        .collect::<String>()
        .to_lowercase();

    let tokens: Vec<&str> = cleaned
        .split([',', '\n', ';'])
        .map(normalize_token)
        .filter(|t| !t.is_empty())
        .collect();

    if tokens.iter().any(|t| SourceRegistry::is_sentinel(t)) {
        return Ok(SelectionResult::None);
    }

    let known = tokens
        .iter()
        .filter_map(|t| registry.resolve(t))
        .cloned()
        .collect::<Vec<SourceId>>();

    SelectionResult::from_sources(known).ok_or(ParseFailure::NoKnownSources)
}

/// Trim whitespace, list markers, a leading `label:` and trailing periods.
fn normalize_token(token: &str) -> &str {
    let token = token.trim();
    let token = match token.rfind(':') {
        Some(idx) => &token[idx + 1..],
        None => token,
    };
    let token = token.trim().trim_start_matches(['-', '•']).trim();
    let token = match NUMBER_MARKER.find(token) {
        Some(m) => &token[m.end()..],
        None => token,
    };
    token.trim_end_matches('.').trim()
}

/// Parse one sub-question per required source.
///
/// A JSON object of strings (raw, or inside a ```` ```json ```` fence) is
/// tried first; otherwise every `identifier: question` line is collected.
/// Identifiers that are not catalog sources are treated as prose and
/// ignored. A catalog source that was not requested makes the whole result
/// invalid, as does any missing or blank question. When an identifier
/// appears more than once, the first occurrence wins.
///
/// # Examples
///
/// ```
/// use pyhc_domain::recovery::parsing::parse_question_map;
/// use pyhc_domain::{SourceId, SourceRegistry};
/// use std::collections::BTreeSet;
///
/// let registry = SourceRegistry::builtin();
/// let required: BTreeSet<SourceId> =
///     ["hapiclient", "pysat"].iter().map(|s| SourceId::new(s).unwrap()).collect();
/// let map = parse_question_map(
///     "hapiclient: what is HAPI?\npysat: how does pysat work?",
///     &required,
///     &registry,
/// )
/// .unwrap();
/// assert_eq!(map.len(), 2);
/// ```
pub fn parse_question_map(
    text: &str,
    required: &BTreeSet<SourceId>,
    registry: &SourceRegistry,
) -> Result<QuestionMap, ParseFailure> {
    if text.trim().is_empty() {
        return Err(ParseFailure::EmptyText);
    }

    let entries = match json_entries(text, registry) {
        Some(entries) if !entries.is_empty() => entries,
        _ => line_entries(text, registry),
    };

    if entries.is_empty() {
        return Err(ParseFailure::NoEntries);
    }

    Ok(QuestionMap::validated(entries, required)?)
}

fn line_entries(text: &str, registry: &SourceRegistry) -> BTreeMap<SourceId, String> {
    let mut entries = BTreeMap::new();
    for line in text.lines() {
        let Some(caps) = ENTRY_LINE.captures(line) else {
            continue;
        };
        let Some(id) = registry.resolve(&caps[1]) else {
            continue;
        };
        let question = strip_quotes(&caps[2]);
        entries
            .entry(id.clone())
            .or_insert_with(|| question.to_string());
    }
    entries
}

fn json_entries(text: &str, registry: &SourceRegistry) -> Option<BTreeMap<SourceId, String>> {
    let candidate = fenced_json(text).or_else(|| outer_braces(text))?;
    let object: serde_json::Map<String, serde_json::Value> =
        serde_json::from_str(candidate).ok()?;

    let mut entries = BTreeMap::new();
    for (key, value) in object {
        let Some(id) = registry.resolve(&key) else {
            continue;
        };
        let question = match value {
            serde_json::Value::String(s) => s,
            _ => continue,
        };
        entries.entry(id.clone()).or_insert(question);
    }
    Some(entries)
}

/// Body of the first ```` ```json ```` fence, if any.
fn fenced_json(text: &str) -> Option<&str> {
    let start = text.find("```json")? + "```json".len();
    let rest = &text[start..];
    let end = rest.find("```")?;
    Some(rest[..end].trim())
}

/// Span from the first `{` to the last `}`.
fn outer_braces(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

fn strip_quotes(s: &str) -> &str {
    s.trim().trim_matches(['"', '\'', '`']).trim()
}
