use serde::{Deserialize, Serialize};

use crate::domain::Transfer;
use crate::storage::record::format_timestamp;

/// Payload published once a transfer has been committed
///
/// Field names are part of the downstream contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferCompletedEvent {
    pub id: String,
    pub payer_id: String,
    pub payee_id: String,
    pub value: u64,
    pub currency: String,
    pub created_at: String,
}

impl From<&Transfer> for TransferCompletedEvent {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Amount, Currency, Identifier, Money};
    use chrono::{TimeZone, Utc};

    #[test]
    fn serializes_with_stable_field_names() {
        let payer = Identifier::parse("6f1c3a52-8a4e-4d4b-9d4a-1f2e3d4c5b6a").unwrap();
        let payee = Identifier::parse("0b7e2a11-3c5d-4e6f-8a9b-0c1d2e3f4a5b").unwrap();
        let id = Identifier::parse("a1b2c3d4-e5f6-4a7b-8c9d-0e1f2a3b4c5d").unwrap();
        let transfer = Transfer::new(
            id,
            payer,
            payee,
            Money::new(Currency::Ngn, Amount::from_minor_units(100)),
            Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap(),
        )
        .unwrap();

        let json = serde_json::to_value(TransferCompletedEvent::from(&transfer)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "a1b2c3d4-e5f6-4a7b-8c9d-0e1f2a3b4c5d",
                "payer_id": "6f1c3a52-8a4e-4d4b-9d4a-1f2e3d4c5b6a",
                "payee_id": "0b7e2a11-3c5d-4e6f-8a9b-0c1d2e3f4a5b",
                "value": 100,
                "currency": "NGN",
                "created_at": "2024-03-01T12:30:00Z"
            })
        );
    }
}
