use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::error::NotifyError;
use super::event::TransferCompletedEvent;
use super::publisher::MessagePublisher;
use crate::domain::Transfer;

/// Queue name used when none is configured
pub const DEFAULT_QUEUE: &str = "transfer.completed";

/// Announces committed transfers to downstream consumers
///
/// Delivery is at-least-once; consumers must tolerate duplicates.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify_transfer_completed(&self, transfer: &Transfer) -> Result<(), NotifyError>;
}

#[async_trait]
impl<T: Notifier + ?Sized> Notifier for Arc<T> {
    async fn notify_transfer_completed(&self, transfer: &Transfer) -> Result<(), NotifyError> {
        (**self).notify_transfer_completed(transfer).await
    }
}

/// Publishes a JSON [`TransferCompletedEvent`] to a named queue
pub struct QueueNotifier<P> {
    publisher: P,
    queue: String,
}

impl<P: MessagePublisher> QueueNotifier<P> {
    pub fn new(publisher: P, queue: impl Into<String>) -> Self {
        Self {
            publisher,
            queue: queue.into(),
        }
    }

    pub fn queue(&self) -> &str {
        &self.queue
    }
}

#[async_trait]
impl<P: MessagePublisher> Notifier for QueueNotifier<P> {
    async fn notify_transfer_completed(&self, transfer: &Transfer) -> Result<(), NotifyError> {
        let payload = serde_json::to_vec(&TransferCompletedEvent::from(transfer))?;
        self.publisher.publish(&self.queue, payload).await?;

        debug!(transfer_id = %transfer.id(), queue = %self.queue, "Published transfer event");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Amount, Currency, Identifier, Money};
    use crate::notify::publisher::ChannelPublisher;
    use chrono::Utc;

    fn transfer() -> Transfer {
        Transfer::new(
            Identifier::generate(),
            Identifier::generate(),
            Identifier::generate(),
            Money::new(Currency::Usd, Amount::from_minor_units(250)),
            Utc::now(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn publishes_event_to_configured_queue() {
        let (publisher, mut receiver) = ChannelPublisher::new(4);
        let notifier = QueueNotifier::new(publisher, DEFAULT_QUEUE);
        let transfer = transfer();

        notifier.notify_transfer_completed(&transfer).await.unwrap();

        let message = receiver.recv().await.unwrap();
        assert_eq!(message.queue, DEFAULT_QUEUE);

        let event: TransferCompletedEvent = serde_json::from_slice(&message.payload).unwrap();
        assert_eq!(event.id, transfer.id().to_string());
        assert_eq!(event.value, 250);
        assert_eq!(event.currency, "USD");
    }

    #[tokio::test]
    async fn publish_failure_is_returned() {
        let (publisher, receiver) = ChannelPublisher::new(1);
        drop(receiver);
        let notifier = QueueNotifier::new(publisher, "q");

        assert!(matches!(
            notifier.notify_transfer_completed(&transfer()).await,
            Err(NotifyError::Closed)
        ));
    }
}
