use tracing::debug;

use super::error::EngineError;
use crate::domain::Identifier;
use crate::io::AccountView;
use crate::storage::AccountLookup;

/// Read-side queries on accounts
pub struct AccountService<L> {
    lookup: L,
}

impl<L: AccountLookup> AccountService<L> {
    pub fn new(lookup: L) -> Self {
        Self { lookup }
    }

    /// Look up an account from an untrusted id
    pub async fn find_by_id(&self, raw: &str) -> Result<AccountView, EngineError> {
        let id = Identifier::parse(raw).map_err(|e| e.for_field("id"))?;
        debug!(account = %id, "Fetching account");

        let account = self
            .lookup
            .find_by_id(&id)
            .await
            .map_err(|e| EngineError::from_lookup(id, e))?;

        Ok(AccountView::from(&account))
    }
}
