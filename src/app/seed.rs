use futures::{Stream, StreamExt};
use tracing::{error, info, warn};

use super::error::AppError;
use crate::domain::Account;
use crate::io::IoError;
use crate::storage::InMemoryLedger;

/// Policy for handling bad rows while seeding accounts
pub trait ErrorPolicy: Send + Sync {
    /// Return true to continue seeding, false to abort
    fn handle_seed_error(&self, error: &IoError) -> bool;
}

/// Skip bad rows and keep going (logged)
#[derive(Debug, Clone, Copy, Default)]
pub struct SkipErrors;

impl ErrorPolicy for SkipErrors {
    fn handle_seed_error(&self, error: &IoError) -> bool {
        warn!(%error, "Skipping account row");
        true
    }
}

/// Abort on first bad row
#[derive(Debug, Clone, Copy, Default)]
pub struct AbortOnError;

impl ErrorPolicy for AbortOnError {
    fn handle_seed_error(&self, error: &IoError) -> bool {
        error!(%error, "Aborting account seeding");
        false
    }
}

/// Outcome of a seeding run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub inserted: usize,
    pub skipped: usize,
}

/// Load every account from `accounts` into the ledger
///
/// Duplicate ids count as bad rows.
pub async fn seed_ledger<S, P>(
    ledger: &InMemoryLedger,
    accounts: S,
    policy: &P,
) -> Result<SeedSummary, AppError>
where
    S: Stream<Item = Result<Account, IoError>>,
    P: ErrorPolicy + ?Sized,
{
    let mut accounts = std::pin::pin!(accounts);
    let mut summary = SeedSummary::default();

    while let Some(row) = accounts.next().await {
        let outcome =
            row.and_then(|account| ledger.insert_account(&account).map_err(IoError::from));

        match outcome {
            Ok(()) => summary.inserted += 1,
            Err(e) => {
                if !policy.handle_seed_error(&e) {
                    return Err(e.into());
                }
                summary.skipped += 1;
            }
        }
    }

    info!(inserted = summary.inserted, skipped = summary.skipped, "Accounts seeded");
    Ok(summary)
}
