use serde::{Deserialize, Serialize};

use crate::domain::{Account, Transfer};
use crate::engine::EngineError;
use crate::storage::record::format_timestamp;

/// Committed transfer as presented to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferOutput {
    pub id: String,
    pub payer_id: String,
    pub payee_id: String,
    pub value: u64,
    pub currency: String,
    pub created_at: String,
}

impl From<&Transfer> for TransferOutput {
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

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletView {
    pub currency: String,
    pub amount: u64,
}

/// Public projection of an account; credentials never leave the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountView {
    pub id: String,
    pub full_name: String,
    pub email: String,
    #[serde(rename = "type")]
    pub role: String,
    pub wallet: Option<WalletView>,
    pub created_at: String,
}

impl From<&Account> for AccountView {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id().to_string(),
            full_name: account.full_name().to_string(),
            email: account.email().to_string(),
            role: account.role().as_str().to_string(),
            wallet: account.wallet().map(|w| WalletView {
                currency: w.currency().code().to_string(),
                amount: w.amount().value(),
            }),
            created_at: format_timestamp(account.created_at()),
        }
    }
}

/// Failure as presented to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorOutput {
    pub kind: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
}

impl ErrorOutput {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
            details: Vec::new(),
        }
    }
}

impl From<&EngineError> for ErrorOutput {
    fn from(error: &EngineError) -> Self {
        let details = match error {
            EngineError::Validation(errors) => errors.iter().map(ToString::to_string).collect(),
            _ => Vec::new(),
        };

        Self {
            kind: error.kind().to_string(),
            message: error.to_string(),
            details,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        Amount, Credential, Currency, Identifier, Money, Role, ValidationError, ValidationErrors,
    };
    use chrono::{TimeZone, Utc};

    #[test]
    fn transfer_output_uses_rfc3339() {
        let transfer = Transfer::new(
            Identifier::generate(),
            Identifier::generate(),
            Identifier::generate(),
            Money::new(Currency::Ngn, Amount::from_minor_units(100)),
            Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap(),
        )
        .unwrap();

        let output = TransferOutput::from(&transfer);
        assert_eq!(output.value, 100);
        assert_eq!(output.currency, "NGN");
        assert_eq!(output.created_at, "2024-03-01T12:30:00Z");
        assert_eq!(output.payer_id, transfer.payer().to_string());
    }

    #[test]
    fn account_view_hides_credential() {
        let account = Account::new(
            Identifier::generate(),
            "Test testing",
            "test@testing.com",
            Credential::new("hunter2"),
            Role::Merchant,
            Some(Money::new(Currency::Usd, Amount::from_minor_units(42))),
            Utc::now(),
        );

        let json = serde_json::to_string(&AccountView::from(&account)).unwrap();
        assert!(!json.contains("hunter2"));
        assert!(json.contains(r#""type":"MERCHANT""#));
        assert!(json.contains(r#""amount":42"#));
    }

    #[test]
    fn validation_error_lists_details() {
        let mut errors = ValidationErrors::new();
        errors.push(ValidationError::new("payer_id", "is required"));
        errors.push(ValidationError::new("value", "must be greater than zero"));

        let output = ErrorOutput::from(&EngineError::Validation(errors));
        assert_eq!(output.kind, "validation_error");
        assert_eq!(
            output.details,
            vec!["payer_id: is required", "value: must be greater than zero"]
        );
    }

    #[test]
    fn other_errors_have_no_details() {
        let output = ErrorOutput::from(&EngineError::InsufficientBalance);
        let json = serde_json::to_value(output).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"kind": "insufficient_balance", "message": "Insufficient balance"})
        );
    }
}
