use futures::{StreamExt, stream};
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::error::AppError;
use crate::authorization::Authorizer;
use crate::engine::{AccountService, EngineError, TransferOrchestrator};
use crate::io::{AccountView, CreateTransferRequest, ErrorOutput, IoError, TransferOutput};
use crate::notify::{Notifier, QueueMessage};
use crate::storage::{AccountLookup, LedgerStore};

/// One line of newline-delimited JSON input
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Command {
    Account { account_id: String },
    Transfer(CreateTransferRequest),
}

/// One line of output, mirroring [`Command`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Reply {
    Transfer(TransferOutput),
    Account(AccountView),
    Error(ErrorOutput),
}

impl Reply {
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub completed: usize,
    pub failed: usize,
}

/// Answers transfer and account commands read line by line
pub struct RequestHandler<L, S, A, N> {
    transfers: TransferOrchestrator<L, S, A, N>,
    accounts: AccountService<L>,
}

impl<L, S, A, N> RequestHandler<L, S, A, N>
where
    L: AccountLookup,
    S: LedgerStore,
    A: Authorizer,
    N: Notifier + 'static,
{
    pub fn new(transfers: TransferOrchestrator<L, S, A, N>, accounts: AccountService<L>) -> Self {
        Self {
            transfers,
            accounts,
        }
    }

    /// `None` for blank lines
    pub async fn handle_line(&self, line: &str, cancel: &CancellationToken) -> Option<Reply> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let command = match serde_json::from_str::<Command>(line) {
            Ok(command) => command,
            Err(e) => {
                debug!(error = %e, "Malformed request line");
                return Some(Reply::Error(ErrorOutput::new(
                    "validation_error",
                    format!("Malformed request: {e}"),
                )));
            }
        };

        let reply = match command {
            Command::Transfer(request) => {
                match self.transfers.create_transfer(&request, cancel).await {
                    Ok(transfer) => Reply::Transfer(TransferOutput::from(&transfer)),
                    Err(e) => Reply::Error(rejection(&e)),
                }
            }
            Command::Account { account_id } => match self.accounts.find_by_id(&account_id).await {
                Ok(view) => Reply::Account(view),
                Err(e) => Reply::Error(rejection(&e)),
            },
        };
        Some(reply)
    }

    /// Process `input` until it ends or `cancel` fires
    ///
    /// Up to `concurrency` commands run at once; replies are written in input
    /// order, one JSON document per line.
    pub async fn run<R, W>(
        &self,
        input: R,
        output: &mut W,
        concurrency: usize,
        cancel: &CancellationToken,
    ) -> Result<RunSummary, AppError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let lines = stream::unfold(input.lines(), |mut lines| async move {
            match lines.next_line().await {
                Ok(Some(line)) => Some((Ok(line), lines)),
                Ok(None) => None,
                Err(e) => Some((Err(e), lines)),
            }
        });

        let replies = lines
            .take_until(cancel.cancelled())
            .map(|line| async move {
                match line {
                    Ok(line) => Ok(self.handle_line(&line, cancel).await),
                    Err(e) => Err(e),
                }
            })
            .buffered(concurrency.max(1));
        let mut replies = std::pin::pin!(replies);

        let mut summary = RunSummary::default();
        while let Some(reply) = replies.next().await {
            let Some(reply) = reply? else {
                continue;
            };

            if reply.is_error() {
                summary.failed += 1;
            } else {
                summary.completed += 1;
            }

            let mut encoded = serde_json::to_vec(&reply).map_err(IoError::from)?;
            encoded.push(b'\n');
            output.write_all(&encoded).await?;
        }

        output.flush().await?;
        info!(completed = summary.completed, failed = summary.failed, "Input processed");
        Ok(summary)
    }
}

/// Error reply for a failed command; server-side faults are logged louder
fn rejection(error: &EngineError) -> ErrorOutput {
    if error.is_client_error() {
        debug!(kind = error.kind(), %error, "Request rejected");
    } else {
        warn!(kind = error.kind(), %error, "Request failed");
    }
    ErrorOutput::from(error)
}

/// Drain published events, logging each one
///
/// Stands in for the downstream consumer. Finishes once every publisher is gone.
pub fn spawn_event_sink(mut events: mpsc::Receiver<QueueMessage>) -> JoinHandle<usize> {
    tokio::spawn(async move {
        let mut delivered = 0;
        while let Some(message) = events.recv().await {
            delivered += 1;
            info!(
                queue = %message.queue,
                payload = %String::from_utf8_lossy(&message.payload),
                "Event delivered"
            );
        }
        delivered
    })
}
