pub mod account;
pub mod amount;
pub mod currency;
pub mod error;
pub mod identifier;
pub mod money;
pub mod transfer;

// Re-export commonly used types
pub use account::{Account, Credential, Role};
pub use amount::Amount;
pub use currency::Currency;
pub use error::{DomainError, ValidationError, ValidationErrors};
pub use identifier::Identifier;
pub use money::Money;
pub use transfer::Transfer;
