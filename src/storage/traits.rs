use std::sync::Arc;

use async_trait::async_trait;

use super::error::StorageError;
use crate::domain::{Account, Identifier, Money, Transfer};

/// Resolves identifiers to accounts
///
/// Pure read; implementations must be safe to call concurrently and repeatedly.
#[async_trait]
pub trait AccountLookup: Send + Sync {
    /// `StorageError::NotFound` when no account matches
    async fn find_by_id(&self, id: &Identifier) -> Result<Account, StorageError>;
}

/// Atomic ledger writes
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Debit `debit`, credit `credit` and insert `transfer` as one unit
    ///
    /// Either all three effects become visible or none do. No internal retry:
    /// the write is not naturally idempotent.
    async fn record_transfer(
        &self,
        transfer: &Transfer,
        debit: &Identifier,
        credit: &Identifier,
        amount: &Money,
    ) -> Result<(), StorageError>;

    /// Fetch a committed transfer
    async fn find_transfer(&self, id: &Identifier) -> Result<Transfer, StorageError>;
}

// Shared handles delegate to the inner store so one ledger can back both
// the lookup and the write side of an orchestrator.
#[async_trait]
impl<T: AccountLookup + ?Sized> AccountLookup for Arc<T> {
    async fn find_by_id(&self, id: &Identifier) -> Result<Account, StorageError> {
        (**self).find_by_id(id).await
    }
}

#[async_trait]
impl<T: LedgerStore + ?Sized> LedgerStore for Arc<T> {
    async fn record_transfer(
        &self,
        transfer: &Transfer,
        debit: &Identifier,
        credit: &Identifier,
        amount: &Money,
    ) -> Result<(), StorageError> {
        (**self).record_transfer(transfer, debit, credit, amount).await
    }

    async fn find_transfer(&self, id: &Identifier) -> Result<Transfer, StorageError> {
        (**self).find_transfer(id).await
    }
}
