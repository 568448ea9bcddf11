use thiserror::Error;

use crate::authorization::AuthorizationError;
use crate::domain::{Currency, DomainError, Identifier, ValidationError, ValidationErrors};
use crate::storage::StorageError;

/// Business rule a transfer broke
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleViolation {
    #[error("Payer and payee must be different accounts")]
    SameAccount,

    #[error("Merchant accounts cannot send transfers")]
    MerchantPayer,

    #[error("Payer has no wallet to fund the transfer")]
    NoFundingWallet,

    #[error("Currency mismatch: wallet holds {wallet}, transfer is in {transfer}")]
    CurrencyMismatch { wallet: Currency, transfer: Currency },
}

/// Engine-level errors for transfer orchestration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("Account not found: {0}")]
    AccountNotFound(Identifier),

    #[error("Transfer not found: {0}")]
    TransferNotFound(Identifier),

    #[error("Rule violation: {0}")]
    RuleViolation(#[from] RuleViolation),

    #[error("Insufficient balance")]
    InsufficientBalance,

    #[error("{0}")]
    AuthorizationDenied(#[from] AuthorizationError),

    #[error("Storage error: {0}")]
    Persistence(StorageError),

    #[error("Transfer cancelled before commit")]
    Cancelled,
}

impl EngineError {
    /// Stable machine-readable code, one per error class
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::AccountNotFound(_) | Self::TransferNotFound(_) => "not_found",
            Self::RuleViolation(_) => "rule_violation",
            Self::InsufficientBalance => "insufficient_balance",
            Self::AuthorizationDenied(_) => "authorization_denied",
            Self::Persistence(_) => "persistence_error",
            Self::Cancelled => "cancelled",
        }
    }

    /// Did the caller send something wrong, as opposed to a server-side fault?
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Persistence(_) | Self::Cancelled)
    }

    /// Map a failed ledger write, keeping the business meaning of domain faults
    pub(crate) fn from_commit(error: StorageError) -> Self {
        match error {
            StorageError::DomainError(domain) => Self::from(domain),
            other => Self::Persistence(other),
        }
    }

    /// Map a failed account read
    pub(crate) fn from_lookup(id: Identifier, error: StorageError) -> Self {
        match error {
            StorageError::NotFound => Self::AccountNotFound(id),
            other => Self::Persistence(other),
        }
    }
}

impl From<ValidationErrors> for EngineError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

impl From<ValidationError> for EngineError {
    fn from(error: ValidationError) -> Self {
        Self::Validation(error.into())
    }
}

impl From<DomainError> for EngineError {
    fn from(error: DomainError) -> Self {
        match error {
            DomainError::InsufficientFunds => Self::InsufficientBalance,
            DomainError::SameAccount => RuleViolation::SameAccount.into(),
            DomainError::CannotFund => RuleViolation::MerchantPayer.into(),
            DomainError::CurrencyMismatch { expected, found } => RuleViolation::CurrencyMismatch {
                wallet: expected,
                transfer: found,
            }
            .into(),
            DomainError::ZeroAmount => {
                ValidationError::new("value", "must be greater than zero").into()
            }
            DomainError::Overflow => Self::Persistence(StorageError::DomainError(error)),
        }
    }
}
