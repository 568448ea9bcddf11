use std::future::Future;
use std::time::Duration;

use tokio::io::{BufWriter, Stdout};
use tokio_util::sync::CancellationToken;
use tracing::{error, warn};

use super::error::AppError;

/// Reusable CLI application runner that handles:
/// - Signal handling (SIGINT, SIGTERM, SIGHUP)
/// - Stdout buffering
/// - Exit codes (0 = success, 1 = error, 130 = SIGINT, 143 = SIGTERM)
/// - Graceful shutdown through a cancellation token
pub struct CliApp {
    name: String,
    grace_period: Duration,
}

impl CliApp {
    /// Create a new CLI application runner
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            grace_period: Duration::from_secs(5),
        }
    }

    /// How long in-flight work may finish after a signal
    pub fn with_grace_period(mut self, grace_period: Duration) -> Self {
        self.grace_period = grace_period;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Validate the positional arguments: exactly one input path
    pub fn input_path(&self, args: &[String]) -> Result<String, AppError> {
        match args {
            [_, path] => Ok(path.clone()),
            _ => Err(AppError::InvalidArguments(format!(
                "Usage: {} <accounts.csv>",
                self.name
            ))),
        }
    }

    /// Run the application with signal handling and exit codes
    ///
    /// On a signal the token handed to `main_fn` is cancelled: transfers that
    /// have not reached their commit abort, commits in progress finish within
    /// the grace period.
    ///
    /// This function never returns - it calls std::process::exit with the appropriate code
    pub async fn run<F, Fut>(self, main_fn: F) -> !
    where
        F: FnOnce(BufWriter<Stdout>, CancellationToken) -> Fut,
        Fut: Future<Output = Result<(), AppError>>,
    {
        let writer = BufWriter::new(tokio::io::stdout());
        let shutdown = CancellationToken::new();

        let main_fut = main_fn(writer, shutdown.clone());
        tokio::pin!(main_fut);

        let signal_code = tokio::select! {
            result = &mut main_fut => std::process::exit(exit_code(&self.name, result)),
            signal_code = wait_for_signal() => signal_code,
        };

        shutdown.cancel();
        match tokio::time::timeout(self.grace_period, &mut main_fut).await {
            Ok(result) => {
                exit_code(&self.name, result);
            }
            Err(_) => warn!(grace = ?self.grace_period, "Shutdown grace period elapsed"),
        }

        std::process::exit(signal_code);
    }
}

fn exit_code(name: &str, result: Result<(), AppError>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(e) => {
            error!(app = name, error = %e, "Fatal error");
            eprintln!("Error: {}", e);
            1
        }
    }
}

/// Wait for any Unix signal (SIGINT, SIGTERM, SIGHUP) or Ctrl+C
/// Returns the exit code to use (130 for SIGINT, 143 for SIGTERM, etc.)
async fn wait_for_signal() -> i32 {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let handlers = (
            signal(SignalKind::terminate()),
            signal(SignalKind::interrupt()),
            signal(SignalKind::hangup()),
        );
        let (mut sigterm, mut sigint, mut sighup) = match handlers {
            (Ok(term), Ok(int), Ok(hup)) => (term, int, hup),
            _ => {
                error!("Failed to install signal handlers");
                return std::future::pending().await;
            }
        };

        tokio::select! {
            _ = sigterm.recv() => {
                warn!("Received SIGTERM");
                143 // 128 + 15
            }
            _ = sigint.recv() => {
                warn!("Received SIGINT");
                130 // 128 + 2
            }
            _ = sighup.recv() => {
                warn!("Received SIGHUP");
                129 // 128 + 1
            }
        }
    }

    #[cfg(not(unix))]
    {
        if tokio::signal::ctrl_c().await.is_err() {
            error!("Failed to install Ctrl+C handler");
            return std::future::pending().await;
        }
        warn!("Received Ctrl+C");
        130
    }
}
