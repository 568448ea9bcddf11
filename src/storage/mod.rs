pub mod error;
pub mod memory;
pub mod record;
pub mod traits;

// Re-export commonly used types
pub use error::StorageError;
pub use memory::{InMemoryLedger, LedgerTxn};
pub use record::{AccountRecord, TransferRecord, WalletRecord};
pub use traits::{AccountLookup, LedgerStore};
