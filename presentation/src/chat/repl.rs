//! REPL (Read-Eval-Print Loop) for interactive chat

use crate::chat::exchange::run_exchange;
use crate::config::{OutputConfig, ReplConfig};
use crate::output::console::ConsoleFormatter;
use colored::Colorize;
use pyhc_application::ChatOrchestrator;
use pyhc_domain::{ConversationTurn, OutputFormat};
use reedline::{DefaultPrompt, DefaultPromptSegment, FileBackedHistory, Reedline, Signal};
use tracing::warn;

const HISTORY_CAPACITY: usize = 1000;

/// Slash commands understood by the REPL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplCommand {
    Help,
    Reset,
    Sources,
    History,
    Quit,
    Unknown,
}

impl ReplCommand {
    /// `None` when the line is a question rather than a command.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if !line.starts_with('/') {
            return None;
        }
        let name = line.split_whitespace().next().unwrap_or(line);
        Some(match name {
            "/help" | "/h" | "/?" => ReplCommand::Help,
            "/reset" | "/clear" => ReplCommand::Reset,
            "/sources" => ReplCommand::Sources,
            "/history" => ReplCommand::History,
            "/quit" | "/exit" | "/q" => ReplCommand::Quit,
            _ => ReplCommand::Unknown,
        })
    }
}

/// Interactive chat REPL over one session
pub struct ChatRepl {
    orchestrator: ChatOrchestrator,
    output: OutputConfig,
    config: ReplConfig,
}

impl ChatRepl {
    pub fn new(orchestrator: ChatOrchestrator) -> Self {
        Self {
            orchestrator,
            output: OutputConfig::default(),
            config: ReplConfig::default(),
        }
    }

    pub fn with_output(mut self, output: OutputConfig) -> Self {
        self.output = output;
        self
    }

    pub fn with_config(mut self, config: ReplConfig) -> Self {
        self.config = config;
        self
    }

    /// Run the interactive REPL
    pub async fn run(&mut self) -> std::io::Result<()> {
        let mut editor = Reedline::create();

        if let Some(path) = self.config.history_path() {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            match FileBackedHistory::with_file(HISTORY_CAPACITY, path.clone()) {
                Ok(history) => editor = editor.with_history(Box::new(history)),
                Err(e) => warn!("Could not open history file {}: {}", path.display(), e),
            }
        }

        let prompt = DefaultPrompt::new(
            DefaultPromptSegment::Basic("pyhc".to_string()),
            DefaultPromptSegment::Empty,
        );

        self.print_welcome();

        loop {
            match editor.read_line(&prompt)? {
                Signal::Success(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }

                    if let Some(command) = ReplCommand::parse(line) {
                        if self.handle_command(command, line) {
                            break;
                        }
                        continue;
                    }

                    self.process_question(line).await;
                }
                Signal::CtrlC => {
                    println!("^C");
                    continue;
                }
                Signal::CtrlD => {
                    println!("Bye!");
                    break;
                }
            }
        }

        Ok(())
    }

    fn print_welcome(&self) {
        let models = self.orchestrator.models();
        println!();
        println!("╭─────────────────────────────────────────────╮");
        println!("│              PyHC-Chat - Chat Mode          │");
        println!("╰─────────────────────────────────────────────╯");
        println!();
        println!(
            "{} {} (recovery: {})",
            "Model:".dimmed(),
            models.primary,
            models.recovery
        );
        println!();
        Self::print_help();
    }

    fn print_help() {
        println!("Commands:");
        println!("  {}     - Show this help", "/help".cyan());
        println!("  {}    - Start a new session (forget history)", "/reset".cyan());
        println!("  {}  - List knowledge sources", "/sources".cyan());
        println!("  {}  - Show this session's exchanges", "/history".cyan());
        println!("  {}     - Exit chat", "/quit".cyan());
        println!();
        println!("Press Ctrl-C while an answer is being prepared to cancel it.");
        println!();
    }

    /// Handle slash commands. Returns true if should exit.
    fn handle_command(&mut self, command: ReplCommand, line: &str) -> bool {
        match command {
            ReplCommand::Quit => {
                println!("Bye!");
                return true;
            }
            ReplCommand::Help => Self::print_help(),
            ReplCommand::Reset => {
                self.orchestrator.reset();
                println!("{}", "Session reset.".green());
            }
            ReplCommand::Sources => {
                let registry = self.orchestrator.registry();
                println!();
                for source in registry.sources() {
                    let marker = if source.community { " (community)" } else { "" };
                    println!(
                        "  {} {}{} - {}",
                        source.id.as_str().cyan(),
                        source.display_name,
                        marker.dimmed(),
                        source.description
                    );
                }
                println!();
            }
            ReplCommand::History => {
                let history = self.orchestrator.history();
                println!();
                if history.is_empty() {
                    println!("{}", "No exchanges yet.".dimmed());
                }
                for turn in history.turns() {
                    let (label, text) = match turn {
                        ConversationTurn::User(t) => ("You:".bold(), t),
                        ConversationTurn::Assistant(t) => ("PyHC-Chat:".green().bold(), t),
                    };
                    println!("{} {}", label, text);
                }
                println!();
            }
            ReplCommand::Unknown => {
                println!("Unknown command: {}", line);
                println!("Type /help for available commands");
            }
        }
        false
    }

    async fn process_question(&mut self, question: &str) {
        println!();
        match run_exchange(&mut self.orchestrator, question, &self.config).await {
            Ok(report) => {
                println!(
                    "{}",
                    ConsoleFormatter::render(self.output.format, question, &report)
                );
            }
            Err(e) if self.output.format == OutputFormat::Json => {
                println!("{}", ConsoleFormatter::format_error_json(&e));
            }
            Err(e) => eprintln!("{}", ConsoleFormatter::format_error(&e)),
        }
        println!();
    }
}
