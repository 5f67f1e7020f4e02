//! CLI command definitions

use clap::{Parser, ValueEnum};
use pyhc_domain::OutputFormat;
use std::path::PathBuf;

/// `--output` values
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputArg {
    /// Only the final answer
    Answer,
    /// Answer plus routing detail
    Full,
    /// The exchange report as JSON
    Json,
}

impl From<OutputArg> for OutputFormat {
    fn from(arg: OutputArg) -> Self {
        match arg {
            OutputArg::Answer => OutputFormat::Answer,
            OutputArg::Full => OutputFormat::Full,
            OutputArg::Json => OutputFormat::Json,
        }
    }
}

/// CLI arguments for pyhc-chat
#[derive(Parser, Debug)]
#[command(name = "pyhc-chat")]
#[command(author, version, about = "Ask questions about PyHC and its core Python packages")]
#[command(long_about = r#"
PyHC-Chat answers questions about the Python in Heliophysics Community and its
core packages. Each question is routed to zero, one or several package
knowledge sources, and the retrieved context is synthesized into one answer.

Configuration files are loaded from (in priority order):
1. PYHC_CHAT_* environment variables (e.g. PYHC_CHAT_MODELS__PRIMARY)
2. --config <path>                        Explicit config file
3. ./pyhc-chat.toml or ./.pyhc-chat.toml  Project-level config
4. ~/.config/pyhc-chat/config.toml        Global config

Example:
  pyhc-chat "How do I load an AIA image with sunpy?"
  pyhc-chat --show-routing "Compare pysat and pySPEDAS for THEMIS data"
  pyhc-chat --chat
"#)]
pub struct Cli {
    /// The question to ask (not required in chat mode)
    pub question: Option<String>,

    /// Start interactive chat mode
    #[arg(short, long)]
    pub chat: bool,

    /// Primary model (selection, decomposition, synthesis)
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Model used to reformat malformed structured output
    #[arg(long, value_name = "MODEL")]
    pub recovery_model: Option<String>,

    /// Print selected sources, sub-questions and retrieved answers
    #[arg(long)]
    pub show_routing: bool,

    /// Output format (overrides [output] format)
    #[arg(short, long, value_enum)]
    pub output: Option<OutputArg>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

impl Cli {
    /// `tracing` filter directive for the `-v` count.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_question() {
        let cli = Cli::try_parse_from(["pyhc-chat", "What is HAPI?"]).unwrap();
        assert_eq!(cli.question.as_deref(), Some("What is HAPI?"));
        assert!(!cli.chat);
        assert!(cli.output.is_none());
        assert_eq!(cli.log_level(), "warn");
    }

    #[test]
    fn test_flags() {
        let cli = Cli::try_parse_from([
            "pyhc-chat",
            "--chat",
            "-m",
            "gpt-4.1",
            "--recovery-model",
            "gpt-4.1-mini",
            "--show-routing",
            "-o",
            "json",
            "-vv",
        ])
        .unwrap();
        assert!(cli.chat);
        assert_eq!(cli.model.as_deref(), Some("gpt-4.1"));
        assert_eq!(cli.recovery_model.as_deref(), Some("gpt-4.1-mini"));
        assert!(cli.show_routing);
        assert_eq!(cli.output.map(OutputFormat::from), Some(OutputFormat::Json));
        assert_eq!(cli.log_level(), "debug");
    }

    #[test]
    fn test_unknown_output_rejected() {
        assert!(Cli::try_parse_from(["pyhc-chat", "-o", "yaml", "q"]).is_err());
    }
}
