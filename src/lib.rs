//! Wallet-to-wallet transfer orchestration
//!
//! A transfer request is validated, checked against account rules, approved
//! by an external authorizer, committed atomically to the ledger and then
//! announced to downstream consumers.

pub mod app;
pub mod authorization;
pub mod domain;
pub mod engine;
pub mod io;
pub mod notify;
pub mod prelude;
pub mod storage;
