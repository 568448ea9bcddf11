use std::sync::Arc;

use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, info, instrument, warn};

use super::error::EngineError;
use super::rules::check_rules;
use super::stage::TransferStage;
use crate::authorization::{AuthorizationError, Authorizer};
use crate::domain::{Account, Currency, Identifier, Transfer};
use crate::io::CreateTransferRequest;
use crate::notify::Notifier;
use crate::storage::{AccountLookup, LedgerStore, StorageError};

/// Tracks the current stage and stops at the first cancelled checkpoint
struct Progress<'a> {
    stage: TransferStage,
    cancel: &'a CancellationToken,
}

impl<'a> Progress<'a> {
    fn new(cancel: &'a CancellationToken) -> Self {
        Self {
            stage: TransferStage::Validating,
            cancel,
        }
    }

    fn advance(&mut self, next: TransferStage) -> Result<(), EngineError> {
        if next.accepts_cancellation() && self.cancel.is_cancelled() {
            return Err(EngineError::Cancelled);
        }

        debug!(from = %self.stage, to = %next, "Stage transition");
        self.stage = next;
        Ok(())
    }
}

/// Drives a transfer request through validation, authorization and commit
///
/// Each call is an independent unit of work; the orchestrator holds no
/// per-transfer state and can be shared behind an `Arc`.
pub struct TransferOrchestrator<L, S, A, N> {
    accounts: L,
    ledger: S,
    authorizer: A,
    notifier: Arc<N>,
    default_currency: Currency,
}

impl<L, S, A, N> TransferOrchestrator<L, S, A, N>
where
    L: AccountLookup,
    S: LedgerStore,
    A: Authorizer,
    N: Notifier + 'static,
{
    pub fn new(accounts: L, ledger: S, authorizer: A, notifier: N) -> Self {
        Self {
            accounts,
            ledger,
            authorizer,
            notifier: Arc::new(notifier),
            default_currency: Currency::Ngn,
        }
    }

    /// Currency used when a request does not name one
    pub fn with_default_currency(mut self, currency: Currency) -> Self {
        self.default_currency = currency;
        self
    }

    pub fn default_currency(&self) -> Currency {
        self.default_currency
    }

    /// Run one transfer request to completion or to the first failure
    ///
    /// Failures up to and including authorization leave no side effects. Once
    /// the ledger write has started it is not interrupted by `cancel`.
    #[instrument(
        name = "create_transfer",
        skip_all,
        fields(payer = %request.payer_id, payee = %request.payee_id, value = ?request.value)
    )]
    pub async fn create_transfer(
        &self,
        request: &CreateTransferRequest,
        cancel: &CancellationToken,
    ) -> Result<Transfer, EngineError> {
        let mut progress = Progress::new(cancel);
        let result = self.run(request, &mut progress).await;

        match &result {
            Ok(transfer) => info!(transfer_id = %transfer.id(), "Transfer completed"),
            Err(e) => {
                info!(stage = %progress.stage, kind = e.kind(), error = %e, "Transfer aborted")
            }
        }

        result
    }

    /// Fetch a committed transfer by id
    pub async fn find_transfer(&self, id: &Identifier) -> Result<Transfer, EngineError> {
        self.ledger.find_transfer(id).await.map_err(|e| match e {
            StorageError::NotFound => EngineError::TransferNotFound(*id),
            other => EngineError::Persistence(other),
        })
    }

    async fn run(
        &self,
        request: &CreateTransferRequest,
        progress: &mut Progress<'_>,
    ) -> Result<Transfer, EngineError> {
        progress.advance(TransferStage::Validating)?;
        let command = request.validate(self.default_currency)?;

        progress.advance(TransferStage::Resolving)?;
        let (payer, payee) =
            tokio::try_join!(self.resolve(command.payer()), self.resolve(command.payee()))?;

        progress.advance(TransferStage::RuleChecking)?;
        check_rules(&payer, &payee, &command.value())?;
        let transfer = Transfer::new(
            Identifier::generate(),
            payer.id(),
            payee.id(),
            command.value(),
            Utc::now(),
        )?;

        progress.advance(TransferStage::Authorizing)?;
        let approved = tokio::select! {
            biased;
            _ = progress.cancel.cancelled() => return Err(EngineError::Cancelled),
            decision = self.authorizer.authorize(&transfer) => decision?,
        };
        if !approved {
            return Err(AuthorizationError::Denied("authorizer declined".to_string()).into());
        }

        progress.advance(TransferStage::Committing)?;
        self.ledger
            .record_transfer(&transfer, &transfer.payer(), &transfer.payee(), &transfer.value())
            .await
            .map_err(EngineError::from_commit)?;

        progress.advance(TransferStage::Notifying)?;
        self.dispatch_notification(&transfer);

        progress.advance(TransferStage::Done)?;
        Ok(transfer)
    }

    async fn resolve(&self, id: Identifier) -> Result<Account, EngineError> {
        self.accounts
            .find_by_id(&id)
            .await
            .map_err(|e| EngineError::from_lookup(id, e))
    }

    /// Hand the event to the notifier without waiting for it
    fn dispatch_notification(&self, transfer: &Transfer) {
        let notifier = Arc::clone(&self.notifier);
        let transfer = transfer.clone();

        tokio::spawn(
            async move {
                if let Err(e) = notifier.notify_transfer_completed(&transfer).await {
                    warn!(transfer_id = %transfer.id(), error = %e, "Notification fault");
                }
            }
            .in_current_span(),
        );
    }
}
