pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod runner;
pub mod seed;

// Re-export commonly used types
pub use cli::CliApp;
pub use config::{AppConfig, AuthorizerConfig, ConfigError, NotifierConfig};
pub use error::AppError;
pub use runner::{Command, Reply, RequestHandler, RunSummary, spawn_event_sink};
pub use seed::{AbortOnError, ErrorPolicy, SeedSummary, SkipErrors, seed_ledger};
