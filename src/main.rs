use std::sync::Arc;
use std::time::Instant;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use prime::config::DispatchConfig;
use prime::dispatch::{DispatchError, DispatchResult};
use prime::Dispatcher;
use prime::extract::{EntityExtractor, PatternExtractor};
use prime::outputs::{ActionExecutor, TemplateRealizer, REJECTED_LINE, UNRECOGNIZED_LINE};
use prime::registry::IntentRegistry;
use prime::session::Session;
use prime::time::Timestamp;
use prime::utterance::{normalize, Utterance};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Optional first argument: path to a registry snapshot. Anything
    // wrong with it falls back to the stock set rather than aborting.
    let registry = match std::env::args().nth(1) {
        Some(path) => match IntentRegistry::from_json_file(&path) {
            Ok(registry) => {
                tracing::info!(%path, intents = registry.len(), "loaded intent registry");
                registry
            }
            Err(err) => {
                tracing::warn!(%path, %err, "falling back to built-in registry");
                IntentRegistry::builtin()
            }
        },
        None => IntentRegistry::builtin(),
    };

    let dispatcher = Dispatcher::new(Arc::new(registry), DispatchConfig::default());
    let extractor = PatternExtractor::from_registry(dispatcher.registry());
    let mut session = Session::new(dispatcher);
    let mut realizer = TemplateRealizer;
    let started = Instant::now();

    tracing::info!(session = %session.id(), "console session ready");
    println!("Say something (Ctrl+D to quit).");

    // Stdin runs in its own task; the channel serializes utterances
    // into the single session.
    let (tx_input, mut rx_input) = mpsc::channel::<String>(100);
    tokio::spawn(async move {
        let stdin = tokio::io::stdin();
        let reader = BufReader::new(stdin);
        let mut lines = reader.lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if tx_input.send(line).await.is_err() {
                break;
            }
        }
    });

    while let Some(line) = rx_input.recv().await {
        let text = normalize(&line);
        let now = Timestamp::new(started.elapsed().as_millis() as u64);
        // Typed input carries full speech confidence.
        let utterance = Utterance::new(text, now, 1.0);
        let entities = extractor.extract(&utterance);
        match session.handle_utterance(utterance, &entities) {
            Ok(DispatchResult::Resolved(resolution)) => {
                let report = realizer.execute(&resolution);
                println!("{}", report.message);
            }
            Ok(DispatchResult::Clarifying(clarification)) => {
                println!("{}", clarification.prompt);
            }
            Ok(DispatchResult::Unrecognized) => {
                println!("{UNRECOGNIZED_LINE}");
            }
            Err(DispatchError::InvalidInput(_)) => {
                println!("{REJECTED_LINE}");
            }
        }
    }

    let snapshot = session.telemetry().snapshot();
    tracing::info!(
        dispatches = snapshot.dispatch_stats.total,
        resolved = snapshot.dispatch_stats.resolved,
        clarifying = snapshot.dispatch_stats.clarifying,
        unrecognized = snapshot.dispatch_stats.unrecognized,
        rejected = snapshot.dispatch_stats.rejected,
        "session ended"
    );
    Ok(())
}
