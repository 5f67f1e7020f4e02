//! Output configuration from TOML (`[output]` section)

use pyhc_domain::{ConfigIssue, ConfigIssueCode, OutputFormat};
use serde::{Deserialize, Serialize};

/// Raw output configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    /// `answer`, `full` or `json`
    pub format: Option<String>,
    /// Enable colored terminal output
    pub color: bool,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self {
            format: None,
            color: true,
        }
    }
}

impl FileOutputConfig {
    /// Unknown values fall back to the default format with a warning.
    pub fn parse_format(&self) -> (Option<OutputFormat>, Vec<ConfigIssue>) {
        match self.format.as_deref() {
            None => (None, Vec::new()),
            Some(raw) => match raw.parse::<OutputFormat>() {
                Ok(format) => (Some(format), Vec::new()),
                Err(e) => (
                    None,
                    vec![ConfigIssue::warning(
                        ConfigIssueCode::UnknownOutputFormat,
                        format!("output.format: {}, using 'answer'", e),
                    )],
                ),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_deserialize() {
        let toml_str = r#"
[output]
format = "json"
"#;
        let config: super::super::FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.output.parse_format().0, Some(OutputFormat::Json));
    }

    #[test]
    fn test_unknown_format_warns() {
        let config = FileOutputConfig {
            format: Some("yaml".into()),
            color: true,
        };
        let (format, issues) = config.parse_format();
        assert!(format.is_none());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, ConfigIssueCode::UnknownOutputFormat);
        assert!(!issues[0].is_error());
    }
}
