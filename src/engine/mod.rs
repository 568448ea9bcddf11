pub mod accounts;
pub mod error;
pub mod orchestrator;
pub mod rules;
pub mod stage;

// Re-export commonly used types
pub use accounts::AccountService;
pub use error::{EngineError, RuleViolation};
pub use orchestrator::TransferOrchestrator;
pub use rules::check_rules;
pub use stage::TransferStage;
