use chrono::{DateTime, Utc};

use super::error::DomainError;
use super::identifier::Identifier;
use super::money::Money;

/// Immutable record of a completed movement of funds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transfer {
    id: Identifier,
    payer: Identifier,
    payee: Identifier,
    value: Money,
    created_at: DateTime<Utc>,
}

impl Transfer {
    /// Create a transfer, enforcing payer != payee and a positive value
    pub fn new(
        id: Identifier,
        payer: Identifier,
        payee: Identifier,
        value: Money,
        created_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if payer == payee {
            return Err(DomainError::SameAccount);
        }
        if value.amount().is_zero() {
            return Err(DomainError::ZeroAmount);
        }

        Ok(Self {
            id,
            payer,
            payee,
            value,
            created_at,
        })
    }

    pub fn id(&self) -> Identifier {
        self.id
    }

    pub fn payer(&self) -> Identifier {
        self.payer
    }

    pub fn payee(&self) -> Identifier {
        self.payee
    }

    pub fn value(&self) -> Money {
        self.value
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
