//! Persisted representation of accounts and transfers.
//!
//! These rows are what the store keeps; domain entities are rebuilt from them
//! on every read so the storage schema can change without touching business
//! rules.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::error::StorageError;
use crate::domain::{
    Account, Amount, Credential, Currency, Identifier, Money, Role, Transfer,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletRecord {
    pub currency: String,
    pub amount: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub password: String,
    #[serde(rename = "type")]
    pub role: String,
    pub wallet: Option<WalletRecord>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRecord {
    pub id: String,
    #[serde(rename = "payer")]
    pub payer_id: String,
    #[serde(rename = "payee")]
    pub payee_id: String,
    pub value: u64,
    pub currency: String,
    pub created_at: String,
}

pub(crate) fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, StorageError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|at| at.with_timezone(&Utc))
        .map_err(|e| StorageError::CorruptRecord(format!("created_at '{}': {}", raw, e)))
}

fn parse_id(raw: &str) -> Result<Identifier, StorageError> {
    Identifier::parse(raw).map_err(|e| StorageError::CorruptRecord(format!("id '{}': {}", raw, e)))
}

impl WalletRecord {
    pub fn to_money(&self) -> Result<Money, StorageError> {
        let currency = self
            .currency
            .parse::<Currency>()
            .map_err(|e| StorageError::CorruptRecord(e.to_string()))?;
        Ok(Money::new(currency, Amount::from_minor_units(self.amount)))
    }
}

impl From<&Money> for WalletRecord {
    fn from(money: &Money) -> Self {
        Self {
            currency: money.currency().code().to_string(),
            amount: money.amount().value(),
        }
    }
}

impl From<&Account> for AccountRecord {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id().to_string(),
            full_name: account.full_name().to_string(),
            email: account.email().to_string(),
            password: account.password().expose().to_string(),
            role: account.role().as_str().to_string(),
            wallet: account.wallet().map(WalletRecord::from),
            created_at: format_timestamp(account.created_at()),
        }
    }
}

impl TryFrom<&AccountRecord> for Account {
    type Error = StorageError;

    fn try_from(record: &AccountRecord) -> Result<Self, Self::Error> {
        let role = record
            .role
            .parse::<Role>()
            .map_err(|e| StorageError::CorruptRecord(e.to_string()))?;
        let wallet = record.wallet.as_ref().map(WalletRecord::to_money).transpose()?;

        Ok(Account::new(
            parse_id(&record.id)?,
            record.full_name.clone(),
            record.email.clone(),
            Credential::new(record.password.clone()),
            role,
            wallet,
            parse_timestamp(&record.created_at)?,
        ))
    }
}

impl From<&Transfer> for TransferRecord {
    fn from(transfer: &Transfer) -> Self {
        Self {
            id: transfer.id().to_string(),
            payer_id: transfer.payer().to_string(),
            payee_id: transfer.payee().to_string(),
            value: transfer.value().amount().value(),
            currency: transfer.value().currency().code().to_string(),
            created_at: format_timestamp(transfer.created_at()),
        }
    }
}

impl TryFrom<&TransferRecord> for Transfer {
    type Error = StorageError;

    fn try_from(record: &TransferRecord) -> Result<Self, Self::Error> {
        let value = WalletRecord {
            currency: record.currency.clone(),
            amount: record.value,
        }
        .to_money()?;

        Transfer::new(
            parse_id(&record.id)?,
            parse_id(&record.payer_id)?,
            parse_id(&record.payee_id)?,
            value,
            parse_timestamp(&record.created_at)?,
        )
        .map_err(|e| StorageError::CorruptRecord(e.to_string()))
    }
}
