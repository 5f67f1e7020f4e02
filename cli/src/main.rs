//! CLI entrypoint for PyHC-Chat
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use pyhc_application::{ChatOrchestrator, ConversationLogger, LlmGateway, SourceRetriever};
use pyhc_domain::{Model, OutputFormat};
use pyhc_infrastructure::{
    ConfigLoader, FileConfig, HttpSourceRetriever, JsonlConversationLogger, OpenAiLlmGateway,
};
use pyhc_presentation::{ChatRepl, Cli, ConsoleFormatter, OutputConfig, ReplConfig, run_exchange};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(ExitCode::SUCCESS);
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).context("Failed to load configuration")?
    };

    // Kept alive so the file writer flushes on exit
    let _log_guard = init_tracing(&cli, config.logging.dir.as_ref());

    info!("Starting PyHC-Chat");

    let issues = config.validate();
    for issue in &issues {
        if issue.is_error() {
            eprintln!("config {}", issue);
        } else {
            warn!("config {}", issue);
        }
    }
    if issues.iter().any(|i| i.is_error()) {
        bail!("Invalid configuration");
    }

    // === Dependency Injection ===
    let orchestrator = build_orchestrator(&cli, &config)?;

    let output = OutputConfig {
        format: cli
            .output
            .map(OutputFormat::from)
            .unwrap_or_else(|| config.output_format()),
        color: config.output.color,
    };
    pyhc_presentation::output::set_color(output.color);

    let repl_config = ReplConfig {
        show_progress: config.repl.show_progress && !cli.quiet,
        show_routing: config.repl.show_routing || cli.show_routing,
        history_file: config.repl.history_file.as_ref().map(PathBuf::from),
    };

    // Chat mode
    if cli.chat {
        let mut repl = ChatRepl::new(orchestrator)
            .with_output(output)
            .with_config(repl_config);
        repl.run().await?;
        return Ok(ExitCode::SUCCESS);
    }

    // Single question mode - question is required
    let Some(question) = cli.question.as_deref() else {
        bail!("Question is required. Use --chat for interactive mode.");
    };

    let mut orchestrator = orchestrator;
    match run_exchange(&mut orchestrator, question, &repl_config).await {
        Ok(report) => {
            println!("{}", ConsoleFormatter::render(output.format, question, &report));
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            if output.format == OutputFormat::Json {
                println!("{}", ConsoleFormatter::format_error_json(&e));
            } else {
                eprintln!("{}", ConsoleFormatter::format_error(&e));
            }
            Ok(if e.is_cancelled() {
                ExitCode::from(130)
            } else {
                ExitCode::FAILURE
            })
        }
    }
}

/// stderr logging filtered by `-v` (or `RUST_LOG`), plus a daily file when configured.
fn init_tracing(cli: &Cli, log_dir: Option<&PathBuf>) -> Option<WorkerGuard> {
    let filter =
        || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(filter());

    match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "pyhc-chat.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let file_layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_filter(filter());
            tracing_subscriber::registry()
                .with(stderr_layer)
                .with(file_layer)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry().with(stderr_layer).init();
            None
        }
    }
}

fn build_orchestrator(cli: &Cli, config: &FileConfig) -> Result<ChatOrchestrator> {
    let registry = Arc::new(
        config
            .to_registry()
            .context("Invalid [[sources]] catalog")?,
    );

    let mut models = config.to_model_config();
    if let Some(name) = non_empty(cli.model.as_deref()) {
        models = models.with_primary(parse_model(name));
    }
    if let Some(name) = non_empty(cli.recovery_model.as_deref()) {
        models = models.with_recovery(parse_model(name));
    }
    info!("Models: primary {}, recovery {}", models.primary, models.recovery);

    let gateway: Arc<dyn LlmGateway> = Arc::new(
        OpenAiLlmGateway::from_config(&config.providers.openai)
            .context("Failed to configure the model service")?,
    );
    let retriever: Arc<dyn SourceRetriever> =
        Arc::new(HttpSourceRetriever::from_config(&config.retrieval));

    let mut orchestrator = ChatOrchestrator::new(
        gateway,
        retriever,
        registry,
        models,
        config.to_execution_params(),
    );

    if let Some(path) = &config.logging.conversation_log
        && let Some(logger) = JsonlConversationLogger::new(path)
    {
        info!("Conversation log: {}", logger.path().display());
        let logger: Arc<dyn ConversationLogger> = Arc::new(logger);
        orchestrator = orchestrator.with_conversation_logger(logger);
    }

    Ok(orchestrator)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_model(name: &str) -> Model {
    match name.parse::<Model>() {
        Ok(model) => model,
        Err(never) => match never {},
    }
}
