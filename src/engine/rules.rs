use super::error::{EngineError, RuleViolation};
use crate::domain::{Account, Money};

/// Business checks run between resolving the accounts and asking the authorizer
///
/// Order matters: structural rules first, then the balance. The ledger repeats
/// the balance check under lock at commit time.
pub fn check_rules(payer: &Account, payee: &Account, value: &Money) -> Result<(), EngineError> {
    if payer.id() == payee.id() {
        return Err(RuleViolation::SameAccount.into());
    }

    if !payer.role().can_fund_transfers() {
        return Err(RuleViolation::MerchantPayer.into());
    }

    let wallet = payer.funding_wallet().ok_or(RuleViolation::NoFundingWallet)?;
    if wallet.currency() != value.currency() {
        return Err(RuleViolation::CurrencyMismatch {
            wallet: wallet.currency(),
            transfer: value.currency(),
        }
        .into());
    }

    if let Some(receiving) = payee.wallet() {
        if receiving.currency() != value.currency() {
            return Err(RuleViolation::CurrencyMismatch {
                wallet: receiving.currency(),
                transfer: value.currency(),
            }
            .into());
        }
    }

    if wallet.amount() < value.amount() {
        return Err(EngineError::InsufficientBalance);
    }

    Ok(())
}
