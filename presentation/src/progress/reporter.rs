//! Progress reporting for an exchange

use colored::Colorize;
use pyhc_domain::core::string::collapse_whitespace;
use indicatif::{ProgressBar, ProgressStyle};
use pyhc_application::ports::progress::ProgressNotifier;
use pyhc_domain::{
    AnswerMap, OrchestratorState, QuestionMap, SelectionResult, SourceId, SourceRegistry,
};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;
use std::time::Duration;

/// Answers longer than this are cut in the routing display
const ROUTING_ANSWER_CHARS: usize = 400;

/// Spinner plus optional routing detail, drawn on stderr.
pub struct ProgressReporter {
    spinner: ProgressBar,
    names: BTreeMap<SourceId, String>,
    in_flight: Mutex<BTreeSet<SourceId>>,
    show_routing: bool,
}

impl ProgressReporter {
    pub fn new(registry: &SourceRegistry) -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(Self::spinner_style());
        spinner.enable_steady_tick(Duration::from_millis(100));

        Self {
            spinner,
            names: display_names(registry),
            in_flight: Mutex::new(BTreeSet::new()),
            show_routing: false,
        }
    }

    /// Also print selected sources, sub-questions and retrieved answers.
    pub fn with_routing(mut self, show: bool) -> Self {
        self.show_routing = show;
        self
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn searching_message(&self) -> String {
        let Ok(in_flight) = self.in_flight.lock() else {
            return "Searching…".to_string();
        };
        let names: Vec<&str> = in_flight
            .iter()
            .map(|id| display_name(&self.names, id))
            .collect();
        format!("Searching {} contents…", names.join(", "))
    }

    fn println(&self, line: String) {
        self.spinner.println(line);
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_state_change(&self, state: OrchestratorState) {
        match state {
            OrchestratorState::Idle => self.spinner.finish_and_clear(),
            other => {
                if let Some(message) = state_message(other) {
                    self.spinner.set_message(message);
                }
            }
        }
    }

    fn on_sources_selected(&self, selection: &SelectionResult) {
        if self.show_routing {
            self.println(routing_sources_line(selection));
        }
    }

    fn on_questions_decomposed(&self, questions: &QuestionMap) {
        if self.show_routing {
            for line in routing_question_lines(questions) {
                self.println(line);
            }
        }
    }

    fn on_retrieval_start(&self, source: &SourceId) {
        if let Ok(mut in_flight) = self.in_flight.lock() {
            in_flight.insert(source.clone());
        }
        self.spinner.set_message(self.searching_message());
    }

    fn on_retrieval_complete(&self, source: &SourceId, success: bool) {
        let remaining = match self.in_flight.lock() {
            Ok(mut in_flight) => {
                in_flight.remove(source);
                in_flight.len()
            }
            Err(_) => 0,
        };
        if self.show_routing {
            let mark = if success { "v".green() } else { "x".red() };
            self.println(format!("  {} {}", mark, display_name(&self.names, source)));
        }
        if remaining > 0 {
            self.spinner.set_message(self.searching_message());
        }
    }

    fn on_answers_retrieved(&self, answers: &AnswerMap) {
        if self.show_routing {
            for line in routing_answer_lines(answers) {
                self.println(line);
            }
        }
    }
}

impl Drop for ProgressReporter {
    fn drop(&mut self) {
        if !self.spinner.is_finished() {
            self.spinner.finish_and_clear();
        }
    }
}

/// Plain-text progress for non-interactive stderr (no spinner escapes)
pub struct SimpleProgress {
    show_routing: bool,
}

impl SimpleProgress {
    pub fn new(show_routing: bool) -> Self {
        Self { show_routing }
    }
}

impl ProgressNotifier for SimpleProgress {
    fn on_state_change(&self, state: OrchestratorState) {
        if let Some(message) = state_message(state) {
            eprintln!("{} {}", "->".cyan(), message);
        }
    }

    fn on_sources_selected(&self, selection: &SelectionResult) {
        if self.show_routing {
            eprintln!("{}", routing_sources_line(selection));
        }
    }

    fn on_questions_decomposed(&self, questions: &QuestionMap) {
        if self.show_routing {
            for line in routing_question_lines(questions) {
                eprintln!("{}", line);
            }
        }
    }

    fn on_retrieval_complete(&self, source: &SourceId, success: bool) {
        if success {
            eprintln!("  {} {}", "v".green(), source);
        } else {
            eprintln!("  {} {} (failed)", "x".red(), source);
        }
    }

    fn on_answers_retrieved(&self, answers: &AnswerMap) {
        if self.show_routing {
            for line in routing_answer_lines(answers) {
                eprintln!("{}", line);
            }
        }
    }
}

/// Spinner text for each phase. Retrieval text is driven by retrieval callbacks.
fn state_message(state: OrchestratorState) -> Option<&'static str> {
    match state {
        OrchestratorState::SelectingSources => Some("Thinking…"),
        OrchestratorState::NoContext | OrchestratorState::Synthesizing => {
            Some("Writing response…")
        }
        OrchestratorState::Idle
        | OrchestratorState::SingleSource
        | OrchestratorState::MultiSource => None,
    }
}

fn display_names(registry: &SourceRegistry) -> BTreeMap<SourceId, String> {
    registry
        .sources()
        .iter()
        .map(|s| (s.id.clone(), s.display_name.clone()))
        .collect()
}

fn display_name<'a>(names: &'a BTreeMap<SourceId, String>, id: &'a SourceId) -> &'a str {
    names.get(id).map(String::as_str).unwrap_or(id.as_str())
}

fn routing_sources_line(selection: &SelectionResult) -> String {
    let sources = match selection {
        SelectionResult::None => "none".dimmed().to_string(),
        SelectionResult::Sources(ids) => ids
            .iter()
            .map(SourceId::as_str)
            .collect::<Vec<_>>()
            .join(", "),
    };
    format!("{} {}", "Sources:".cyan().bold(), sources)
}

fn routing_question_lines(questions: &QuestionMap) -> Vec<String> {
    let mut lines = vec![format!("{}", "Sub-questions:".cyan().bold())];
    lines.extend(
        questions
            .iter()
            .map(|(id, q)| format!("  {} {}", format!("{}:", id).yellow(), q)),
    );
    lines
}

fn routing_answer_lines(answers: &AnswerMap) -> Vec<String> {
    let mut lines = vec![format!("{}", "Retrieved:".cyan().bold())];
    lines.extend(answers.iter().map(|(id, a)| {
        format!(
            "  {} {}",
            format!("{}:", id).yellow(),
            truncate_chars(a, ROUTING_ANSWER_CHARS)
        )
    }));
    lines
}

fn truncate_chars(text: &str, max: usize) -> String {
    let flat = collapse_whitespace(text);
    match flat.char_indices().nth(max) {
        Some((cut, _)) => format!("{}…", &flat[..cut]),
        None => flat,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sid(s: &str) -> SourceId {
        SourceId::new(s).unwrap()
    }

    #[test]
    fn test_state_messages() {
        assert_eq!(
            state_message(OrchestratorState::SelectingSources),
            Some("Thinking…")
        );
        assert_eq!(
            state_message(OrchestratorState::Synthesizing),
            Some("Writing response…")
        );
        assert_eq!(state_message(OrchestratorState::MultiSource), None);
    }

    #[test]
    fn test_searching_message_uses_display_names() {
        let reporter = ProgressReporter::new(&SourceRegistry::builtin());
        reporter.on_retrieval_start(&sid("sunpy"));
        reporter.on_retrieval_start(&sid("pyspedas"));
        assert_eq!(reporter.searching_message(), "Searching pySPEDAS, SunPy contents…");

        reporter.on_retrieval_complete(&sid("pyspedas"), true);
        assert_eq!(reporter.searching_message(), "Searching SunPy contents…");
    }

    #[test]
    fn test_routing_lines() {
        colored::control::set_override(false);
        let selection = SelectionResult::from_sources([sid("sunpy"), sid("pysat")]).unwrap();
        assert_eq!(routing_sources_line(&selection), "Sources: pysat, sunpy");
        assert_eq!(routing_sources_line(&SelectionResult::None), "Sources: none");

        let mut answers = AnswerMap::new();
        answers.insert(sid("sunpy"), "line one\nline two");
        let lines = routing_answer_lines(&answers);
        assert_eq!(lines[1], "  sunpy: line one line two");
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("abc", 5), "abc");
        assert_eq!(truncate_chars("abcdef", 3), "abc…");
        assert_eq!(truncate_chars("ééééé", 2), "éé…");
    }
}
