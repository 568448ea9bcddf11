use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use dashmap::{DashMap, Entry};
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, trace};

use super::error::StorageError;
use super::record::{AccountRecord, TransferRecord, WalletRecord};
use super::traits::{AccountLookup, LedgerStore};
use crate::domain::{Account, Currency, DomainError, Identifier, Money, Role, Transfer};

/// Concurrent in-memory ledger using DashMap
///
/// Writers to the same account are serialised by a per-account async mutex;
/// locks are always taken in ascending id order so two transfers touching the
/// same pair of accounts cannot deadlock. Staged effects are published under a
/// short exclusive visibility gate, so readers see either none or all of a
/// transaction's effects.
pub struct InMemoryLedger {
    accounts: DashMap<Identifier, AccountRecord>,
    transfers: DashMap<Identifier, TransferRecord>,
    account_locks: DashMap<Identifier, Arc<Mutex<()>>>,
    visibility: RwLock<()>,
}

impl InMemoryLedger {
    /// Create a new empty ledger
    pub fn new() -> Self {
        Self {
            accounts: DashMap::new(),
            transfers: DashMap::new(),
            account_locks: DashMap::new(),
            visibility: RwLock::new(()),
        }
    }

    /// Seed an account (registration itself lives elsewhere)
    pub fn insert_account(&self, account: &Account) -> Result<(), StorageError> {
        match self.accounts.entry(account.id()) {
            Entry::Occupied(_) => Err(StorageError::Persistence(format!(
                "account {} already exists",
                account.id()
            ))),
            Entry::Vacant(e) => {
                e.insert(AccountRecord::from(account));
                Ok(())
            }
        }
    }

    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }

    pub fn transfer_count(&self) -> usize {
        self.transfers.len()
    }

    /// Sum of every wallet held in `currency`, taken as one consistent snapshot
    pub fn total_balance(&self, currency: Currency) -> Result<u128, StorageError> {
        let _visible = self.visibility.read().map_err(gate_poisoned)?;

        let mut total = 0u128;
        for entry in self.accounts.iter() {
            if let Some(wallet) = &entry.value().wallet {
                let money = wallet.to_money()?;
                if money.currency() == currency {
                    total += u128::from(money.amount().value());
                }
            }
        }
        Ok(total)
    }

    /// Run `work` as one atomic unit over the given accounts
    ///
    /// Only accounts listed in `accounts` may be touched by the transaction.
    /// Staged effects are applied when `work` returns `Ok`; any error discards
    /// them all.
    pub async fn with_transaction<F, T>(
        &self,
        accounts: &[Identifier],
        work: F,
    ) -> Result<T, StorageError>
    where
        F: FnOnce(&mut LedgerTxn<'_>) -> Result<T, StorageError> + Send,
        T: Send,
    {
        let locked: BTreeSet<Identifier> = accounts.iter().copied().collect();
        let _guards = self.lock_accounts(&locked).await;

        let mut txn = LedgerTxn {
            ledger: self,
            locked,
            wallets: HashMap::new(),
            transfers: Vec::new(),
        };

        match work(&mut txn) {
            Ok(value) => {
                self.publish(txn)?;
                Ok(value)
            }
            Err(error) => {
                debug!(%error, "Ledger transaction rolled back");
                Err(error)
            }
        }
    }

    async fn lock_accounts(&self, ids: &BTreeSet<Identifier>) -> Vec<OwnedMutexGuard<()>> {
        let mut guards = Vec::with_capacity(ids.len());
        // BTreeSet iterates in ascending order
        for id in ids {
            let lock = Arc::clone(
                self.account_locks
                    .entry(*id)
                    .or_insert_with(|| Arc::new(Mutex::new(())))
                    .value(),
            );
            guards.push(lock.lock_owned().await);
        }
        guards
    }

    fn publish(&self, txn: LedgerTxn<'_>) -> Result<(), StorageError> {
        let LedgerTxn {
            wallets, transfers, ..
        } = txn;

        let _visible = self.visibility.write().map_err(gate_poisoned)?;

        // Validate every target before the first write
        if let Some(missing) = wallets.keys().find(|id| !self.accounts.contains_key(id)) {
            trace!(account = %missing, "Account vanished before publish");
            return Err(StorageError::NotFound);
        }

        for (id, money) in &wallets {
            if let Some(mut record) = self.accounts.get_mut(id) {
                record.wallet = Some(WalletRecord::from(money));
            }
        }
        for (id, record) in transfers {
            self.transfers.insert(id, record);
        }

        Ok(())
    }

    fn read_account(&self, id: &Identifier) -> Result<AccountRecord, StorageError> {
        let _visible = self.visibility.read().map_err(gate_poisoned)?;
        self.accounts
            .get(id)
            .map(|r| r.value().clone())
            .ok_or(StorageError::NotFound)
    }

    fn read_transfer(&self, id: &Identifier) -> Result<TransferRecord, StorageError> {
        let _visible = self.visibility.read().map_err(gate_poisoned)?;
        self.transfers
            .get(id)
            .map(|r| r.value().clone())
            .ok_or(StorageError::NotFound)
    }
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

fn gate_poisoned<T>(_: PoisonError<T>) -> StorageError {
    StorageError::Persistence("ledger visibility gate poisoned".to_string())
}

/// Staged writes of one ledger transaction
pub struct LedgerTxn<'a> {
    ledger: &'a InMemoryLedger,
    locked: BTreeSet<Identifier>,
    wallets: HashMap<Identifier, Money>,
    transfers: Vec<(Identifier, TransferRecord)>,
}

impl LedgerTxn<'_> {
    /// Current wallet as seen by this transaction (staged writes included)
    pub fn wallet(&self, id: &Identifier) -> Result<Option<Money>, StorageError> {
        Ok(self.current(id)?.1)
    }

    /// Take `amount` from the account's wallet
    ///
    /// The balance check happens here, under the account lock, so two
    /// concurrent debits of the same wallet can never both pass it.
    pub fn debit(&mut self, id: &Identifier, amount: &Money) -> Result<Money, StorageError> {
        let (role, wallet) = self.current(id)?;
        if !role.can_fund_transfers() {
            return Err(DomainError::CannotFund.into());
        }

        let current = wallet.ok_or(DomainError::InsufficientFunds)?;
        let updated = current.subtract(amount)?;
        self.wallets.insert(*id, updated);

        trace!(account = %id, balance = %updated, "Staged debit");
        Ok(updated)
    }

    /// Add `amount` to the account's wallet, opening one if absent
    pub fn credit(&mut self, id: &Identifier, amount: &Money) -> Result<Money, StorageError> {
        let (_, wallet) = self.current(id)?;
        let updated = match wallet {
            Some(current) => current.add(amount)?,
            None => *amount,
        };
        self.wallets.insert(*id, updated);

        trace!(account = %id, balance = %updated, "Staged credit");
        Ok(updated)
    }

    /// Stage the transfer record; ids are write-once
    pub fn insert_transfer(&mut self, transfer: &Transfer) -> Result<(), StorageError> {
        let id = transfer.id();
        let staged = self.transfers.iter().any(|(staged, _)| *staged == id);
        if staged || self.ledger.transfers.contains_key(&id) {
            return Err(StorageError::Persistence(format!(
                "transfer {} already recorded",
                id
            )));
        }

        self.transfers.push((id, TransferRecord::from(transfer)));
        Ok(())
    }

    fn current(&self, id: &Identifier) -> Result<(Role, Option<Money>), StorageError> {
        if !self.locked.contains(id) {
            return Err(StorageError::Persistence(format!(
                "account {} is not part of this transaction",
                id
            )));
        }

        let record = self.ledger.read_account(id)?;
        let role = record
            .role
            .parse::<Role>()
            .map_err(|e| StorageError::CorruptRecord(e.to_string()))?;
        let wallet = match self.wallets.get(id) {
            Some(staged) => Some(*staged),
            None => record.wallet.as_ref().map(WalletRecord::to_money).transpose()?,
        };

        Ok((role, wallet))
    }
}

#[async_trait]
impl AccountLookup for InMemoryLedger {
    async fn find_by_id(&self, id: &Identifier) -> Result<Account, StorageError> {
        let record = self.read_account(id)?;
        Account::try_from(&record)
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedger {
    async fn record_transfer(
        &self,
        transfer: &Transfer,
        debit: &Identifier,
        credit: &Identifier,
        amount: &Money,
    ) -> Result<(), StorageError> {
        self.with_transaction(&[*debit, *credit], |txn| {
            txn.debit(debit, amount)?;
            txn.credit(credit, amount)?;
            txn.insert_transfer(transfer)
        })
        .await?;

        debug!(transfer_id = %transfer.id(), "Transfer committed");
        Ok(())
    }

    async fn find_transfer(&self, id: &Identifier) -> Result<Transfer, StorageError> {
        let record = self.read_transfer(id)?;
        Transfer::try_from(&record)
    }
}
