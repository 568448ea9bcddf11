use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::error::IoError;
use crate::domain::{
    Account, Credential, Identifier, Money, Role, ValidationError, ValidationErrors,
};

/// Raw CSV record as read from a seed file
#[derive(Debug, Deserialize)]
pub struct RawAccountRecord {
    pub id: String,
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(alias = "type")]
    pub role: String,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub balance: Option<i64>,
}

impl RawAccountRecord {
    /// Parse this raw record into an account, reporting every bad column
    pub fn parse(self, created_at: DateTime<Utc>) -> Result<Account, IoError> {
        let mut errors = ValidationErrors::new();

        let id = errors.collect(Identifier::parse(&self.id).map_err(|e| e.for_field("id")));
        let role = errors.collect(self.role.parse::<Role>());
        if self.full_name.trim().is_empty() {
            errors.push(ValidationError::new("full_name", "is required"));
        }
        if self.email.trim().is_empty() {
            errors.push(ValidationError::new("email", "is required"));
        }

        let wallet = match (non_empty(self.currency), self.balance) {
            (None, None) => Some(None),
            (Some(currency), balance) => match Money::parse(&currency, balance.unwrap_or(0)) {
                Ok(money) => Some(Some(money)),
                Err(wallet_errors) => {
                    for error in wallet_errors.iter() {
                        errors.push(error.clone());
                    }
                    None
                }
            },
            (None, Some(_)) => {
                errors.push(ValidationError::new("currency", "required when balance is set"));
                None
            }
        };

        match (id, role, wallet) {
            (Some(id), Some(role), Some(wallet)) if errors.is_empty() => Ok(Account::new(
                id,
                self.full_name.trim(),
                self.email.trim(),
                Credential::new(self.password),
                role,
                wallet,
                created_at,
            )),
            _ => Err(IoError::InvalidAccount(errors)),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
