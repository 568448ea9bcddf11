use std::path::Path;
use std::sync::Arc;

use tokio::io::{BufReader, BufWriter, Stdout};
use tokio_util::sync::CancellationToken;
use walletpay::app::{logging, seed_ledger, spawn_event_sink};
use walletpay::prelude::*;

#[tokio::main]
async fn main() {
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = logging::init(&config) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    let app = CliApp::new("walletpay").with_grace_period(config.shutdown_grace());
    let args: Vec<String> = std::env::args().collect();
    let input_file = match app.input_path(&args) {
        Ok(path) => path,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    app.run(|writer, shutdown| run_transfer_service(config, input_file, writer, shutdown))
        .await
}

/// Seed the ledger, then answer requests from stdin until it closes
async fn run_transfer_service(
    config: AppConfig,
    input_file: String,
    mut writer: BufWriter<Stdout>,
    shutdown: CancellationToken,
) -> Result<(), AppError> {
    if !Path::new(&input_file).exists() {
        return Err(AppError::FileNotFound(input_file));
    }

    let ledger = Arc::new(InMemoryLedger::new());
    let accounts = CsvAccountStream::from_file(&input_file).await?;
    if config.abort_on_seed_error {
        seed_ledger(&ledger, accounts, &AbortOnError).await?;
    } else {
        seed_ledger(&ledger, accounts, &SkipErrors).await?;
    }

    let getter = RetryingGetter::new(
        ReqwestGetter::new(config.authorizer.timeout())?,
        config.authorizer.retry_policy(),
    );
    let authorizer = HttpAuthorizer::new(getter, config.authorizer.uri.clone())
        .with_approval_message(config.authorizer.approval_message.clone());

    let (publisher, events) = ChannelPublisher::new(config.notifier.capacity);
    let sink = spawn_event_sink(events);

    let orchestrator = TransferOrchestrator::new(
        Arc::clone(&ledger),
        Arc::clone(&ledger),
        authorizer,
        QueueNotifier::new(publisher, config.notifier.queue.clone()),
    )
    .with_default_currency(config.default_currency()?);
    let handler = RequestHandler::new(orchestrator, AccountService::new(Arc::clone(&ledger)));

    let stdin = BufReader::new(tokio::io::stdin());
    handler
        .run(stdin, &mut writer, config.concurrency, &shutdown)
        .await?;

    // Dropping the handler releases the last publisher once pending
    // notifications finish, which lets the sink drain and stop.
    drop(handler);
    if tokio::time::timeout(config.shutdown_grace(), sink).await.is_err() {
        tracing::warn!("Event sink did not drain before shutdown");
    }

    Ok(())
}
