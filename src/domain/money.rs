use std::fmt;

use super::amount::Amount;
use super::currency::Currency;
use super::error::{DomainError, ValidationErrors};

/// An amount tagged with its currency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Money {
    currency: Currency,
    amount: Amount,
}

impl Money {
    pub fn new(currency: Currency, amount: Amount) -> Self {
        Self { currency, amount }
    }

    /// Build from raw input, reporting both fields when both are invalid
    pub fn parse(currency: &str, minor_units: i64) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let currency = errors.collect(currency.parse::<Currency>());
        let amount = errors.collect(Amount::new(minor_units));

        match (currency, amount) {
            (Some(currency), Some(amount)) => Ok(Self::new(currency, amount)),
            _ => Err(errors),
        }
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    /// New value with `other` added; currencies must match
    pub fn add(&self, other: &Money) -> Result<Money, DomainError> {
        self.ensure_same_currency(other)?;
        let amount = self
            .amount
            .checked_add(other.amount)
            .ok_or(DomainError::Overflow)?;
        Ok(Self::new(self.currency, amount))
    }

    /// New value with `other` taken away; never clamps to zero
    pub fn subtract(&self, other: &Money) -> Result<Money, DomainError> {
        self.ensure_same_currency(other)?;
        let amount = self
            .amount
            .checked_sub(other.amount)
            .ok_or(DomainError::InsufficientFunds)?;
        Ok(Self::new(self.currency, amount))
    }

    fn ensure_same_currency(&self, other: &Money) -> Result<(), DomainError> {
        if self.currency != other.currency {
            return Err(DomainError::CurrencyMismatch {
                expected: self.currency,
                found: other.currency,
            });
        }
        Ok(())
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.currency)
    }
}
