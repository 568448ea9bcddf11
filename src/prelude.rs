//! Prelude module for convenient imports
//!
//! Import everything you need with: `use walletpay::prelude::*;`

// Domain types
pub use crate::domain::{
    Account, Amount, Credential, Currency, DomainError, Identifier, Money, Role, Transfer,
    ValidationError, ValidationErrors,
};

// Storage types
pub use crate::storage::{AccountLookup, InMemoryLedger, LedgerStore, StorageError};

// Authorization types
pub use crate::authorization::{
    AuthorizationError, Authorizer, Backoff, HttpAuthorizer, ReqwestGetter, RetryPolicy,
    RetryingGetter,
};

// Notification types
pub use crate::notify::{ChannelPublisher, Notifier, NotifyError, QueueNotifier};

// Engine types
pub use crate::engine::{AccountService, EngineError, RuleViolation, TransferOrchestrator};

// IO types
pub use crate::io::{CreateTransferRequest, CsvAccountStream, ErrorOutput, IoError, TransferOutput};

// App types
pub use crate::app::{
    AbortOnError, AppConfig, AppError, CliApp, ErrorPolicy, RequestHandler, SkipErrors,
};
