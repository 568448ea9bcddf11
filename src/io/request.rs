use serde::{Deserialize, Serialize};

use crate::domain::{Amount, Currency, Identifier, Money, ValidationError, ValidationErrors};

/// Transfer request as it arrives from a client
///
/// Every field is optional on the wire so that missing fields are reported
/// alongside malformed ones instead of failing deserialization outright.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTransferRequest {
    #[serde(default, alias = "payer")]
    pub payer_id: String,
    #[serde(default, alias = "payee")]
    pub payee_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

impl CreateTransferRequest {
    pub fn new(payer_id: impl Into<String>, payee_id: impl Into<String>, value: i64) -> Self {
        Self {
            payer_id: payer_id.into(),
            payee_id: payee_id.into(),
            value: Some(value),
            currency: None,
        }
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    /// Turn the raw request into value objects, reporting every bad field
    pub fn validate(
        &self,
        default_currency: Currency,
    ) -> Result<TransferCommand, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let payer = errors.collect(required_id(&self.payer_id, "payer_id"));
        let payee = errors.collect(required_id(&self.payee_id, "payee_id"));
        let amount = errors.collect(positive_amount(self.value));
        let currency = match &self.currency {
            Some(code) => {
                errors.collect(code.parse::<Currency>().map_err(|e| e.for_field("currency")))
            }
            None => Some(default_currency),
        };

        match (payer, payee, amount, currency) {
            (Some(payer), Some(payee), Some(amount), Some(currency)) if errors.is_empty() => {
                Ok(TransferCommand {
                    payer,
                    payee,
                    value: Money::new(currency, amount),
                })
            }
            _ => Err(errors),
        }
    }
}

fn required_id(raw: &str, field: &str) -> Result<Identifier, ValidationError> {
    if raw.trim().is_empty() {
        return Err(ValidationError::new(field, "is required"));
    }
    Identifier::parse(raw).map_err(|e| e.for_field(field))
}

fn positive_amount(value: Option<i64>) -> Result<Amount, ValidationError> {
    let Some(value) = value else {
        return Err(ValidationError::new("value", "is required"));
    };
    let amount = Amount::new(value).map_err(|e| e.for_field("value"))?;
    if amount.is_zero() {
        return Err(ValidationError::new("value", "must be greater than zero"));
    }
    Ok(amount)
}

/// Validated transfer intent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferCommand {
    payer: Identifier,
    payee: Identifier,
    value: Money,
}

impl TransferCommand {
    pub fn payer(&self) -> Identifier {
        self.payer
    }

    pub fn payee(&self) -> Identifier {
        self.payee
    }

    pub fn value(&self) -> Money {
        self.value
    }
}
