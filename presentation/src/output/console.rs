//! Console output formatter for exchange reports

use colored::Colorize;
use pyhc_application::ChatError;
use pyhc_domain::{ExchangeReport, OutputFormat, Route};

/// Formats exchange reports for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Render a report in the requested format
    pub fn render(format: OutputFormat, query: &str, report: &ExchangeReport) -> String {
        match format {
            OutputFormat::Answer => Self::format_answer(report),
            OutputFormat::Full => Self::format(query, report),
            OutputFormat::Json => Self::format_json(query, report),
        }
    }

    /// Only the answer text
    pub fn format_answer(report: &ExchangeReport) -> String {
        report.answer.trim_end().to_string()
    }

    /// Answer preceded by the routing detail
    pub fn format(query: &str, report: &ExchangeReport) -> String {
        let mut output = String::new();

        output.push_str(&format!("{} {}\n", "Q:".cyan().bold(), query));
        output.push_str(&format!(
            "{} {}\n",
            "Route:".cyan().bold(),
            Self::describe_route(report)
        ));

        if let Some(questions) = &report.questions {
            output.push_str(&Self::section_header("Sub-questions"));
            for (id, question) in questions.iter() {
                output.push_str(&format!("{} {}\n", format!("{}:", id).yellow(), question));
            }
        }

        if !report.answers.is_empty() {
            output.push_str(&Self::section_header("Retrieved"));
            for (id, answer) in report.answers.iter() {
                output.push_str(&format!(
                    "\n{}\n{}\n",
                    format!("── {} ──", id).yellow().bold(),
                    Self::indent(answer.trim(), "  ")
                ));
            }
        }

        output.push_str(&Self::section_header("Answer"));
        output.push_str(report.answer.trim_end());
        output.push('\n');
        output
    }

    /// Query and report as pretty JSON
    pub fn format_json(query: &str, report: &ExchangeReport) -> String {
        let value = serde_json::json!({
            "query": query,
            "report": report,
        });
        serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
    }

    /// User-facing error line (never includes model output)
    pub fn format_error(error: &ChatError) -> String {
        if error.is_cancelled() {
            format!("{}", error.user_message().yellow())
        } else {
            format!("{} {}", "Error:".red().bold(), error.user_message())
        }
    }

    /// Error as a JSON object for `--output json`
    pub fn format_error_json(error: &ChatError) -> String {
        let value = serde_json::json!({
            "error": {
                "category": error.category(),
                "message": error.user_message(),
            }
        });
        serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
    }

    fn describe_route(report: &ExchangeReport) -> String {
        match &report.route {
            Route::NoContext => "no retrieval".to_string(),
            Route::SingleSource(id) => format!("single source ({})", id),
            Route::MultiSource => format!(
                "multiple sources ({})",
                report
                    .answers
                    .iter()
                    .map(|(id, _)| id.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        }
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pyhc_application::UpstreamError;
    use pyhc_domain::{AnswerMap, QuestionMap, SourceId};
    use std::collections::BTreeMap;

    fn sid(s: &str) -> SourceId {
        SourceId::new(s).unwrap()
    }

    fn multi_report() -> ExchangeReport {
        let required = [sid("pysat"), sid("sunpy")].into_iter().collect();
        let mut entries = BTreeMap::new();
        entries.insert(sid("pysat"), "How are instruments loaded?".to_string());
        entries.insert(sid("sunpy"), "How are maps loaded?".to_string());
        let questions = QuestionMap::validated(entries, &required).unwrap();

        let mut answers = AnswerMap::new();
        answers.insert(sid("pysat"), "With pysat.Instrument.");
        answers.insert(sid("sunpy"), "With sunpy.map.Map.");

        ExchangeReport {
            answer: "Use pysat.Instrument and sunpy.map.Map.\n".into(),
            route: Route::MultiSource,
            questions: Some(questions),
            answers,
        }
    }

    #[test]
    fn test_format_answer_only() {
        let report = ExchangeReport::no_context("Hello!\n\n");
        assert_eq!(ConsoleFormatter::format_answer(&report), "Hello!");
    }

    #[test]
    fn test_format_full_includes_routing() {
        colored::control::set_override(false);
        let output = ConsoleFormatter::format("How do I load data?", &multi_report());
        assert!(output.contains("Q: How do I load data?"));
        assert!(output.contains("Route: multiple sources (pysat, sunpy)"));
        assert!(output.contains("sunpy: How are maps loaded?"));
        assert!(output.contains("── pysat ──\n  With pysat.Instrument."));
        assert!(output.ends_with("Use pysat.Instrument and sunpy.map.Map.\n"));
    }

    #[test]
    fn test_format_json_is_parseable() {
        let output = ConsoleFormatter::render(OutputFormat::Json, "q", &multi_report());
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["query"], "q");
        assert_eq!(value["report"]["route"]["kind"], "multi_source");
        assert_eq!(value["report"]["answers"]["sunpy"], "With sunpy.map.Map.");
    }

    #[test]
    fn test_format_error_hides_details() {
        colored::control::set_override(false);
        let error = ChatError::UpstreamService(UpstreamError::EmptyAnswer);
        let line = ConsoleFormatter::format_error(&error);
        assert!(line.starts_with("Error: Sorry"));

        let json: serde_json::Value =
            serde_json::from_str(&ConsoleFormatter::format_error_json(&error)).unwrap();
        assert_eq!(json["error"]["category"], "upstream_service");
    }

    #[test]
    fn test_indent() {
        assert_eq!(ConsoleFormatter::indent("a\nb", "> "), "> a\n> b");
    }
}
