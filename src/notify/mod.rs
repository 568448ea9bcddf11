pub mod error;
pub mod event;
pub mod notifier;
pub mod publisher;

// Re-export commonly used types
pub use error::NotifyError;
pub use event::TransferCompletedEvent;
pub use notifier::{DEFAULT_QUEUE, Notifier, QueueNotifier};
pub use publisher::{ChannelPublisher, MessagePublisher, QueueMessage};
