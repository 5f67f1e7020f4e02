//! One exchange run from the terminal: progress display plus Ctrl-C.

use crate::config::ReplConfig;
use crate::progress::reporter::{ProgressReporter, SimpleProgress};
use pyhc_application::{ChatError, ChatOrchestrator, NoProgress, ProgressNotifier};
use pyhc_domain::{ExchangeReport, SourceRegistry};
use std::io::IsTerminal;
use tokio_util::sync::CancellationToken;

/// Pick the progress display for the current terminal and settings.
pub fn progress_for(registry: &SourceRegistry, config: &ReplConfig) -> Box<dyn ProgressNotifier> {
    match (config.show_progress, std::io::stderr().is_terminal()) {
        (true, true) => {
            Box::new(ProgressReporter::new(registry).with_routing(config.show_routing))
        }
        (true, false) => Box::new(SimpleProgress::new(config.show_routing)),
        (false, _) if config.show_routing => Box::new(SimpleProgress::new(true)),
        (false, _) => Box::new(NoProgress),
    }
}

/// Submit `query`, cancelling the exchange if the user presses Ctrl-C.
pub async fn run_exchange(
    orchestrator: &mut ChatOrchestrator,
    query: &str,
    config: &ReplConfig,
) -> Result<ExchangeReport, ChatError> {
    let progress = progress_for(orchestrator.registry(), config);

    let cancellation = CancellationToken::new();
    let watcher = tokio::spawn({
        let token = cancellation.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                token.cancel();
            }
        }
    });

    let result = orchestrator
        .submit_with_progress(query, progress.as_ref(), &cancellation)
        .await;
    watcher.abort();
    result
}
