use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::error::NotifyError;

/// Serialized message addressed to a named queue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueMessage {
    pub queue: String,
    pub payload: Vec<u8>,
}

/// Durable queue or topic seam
#[async_trait]
pub trait MessagePublisher: Send + Sync {
    async fn publish(&self, queue: &str, payload: Vec<u8>) -> Result<(), NotifyError>;
}

#[async_trait]
impl<T: MessagePublisher + ?Sized> MessagePublisher for Arc<T> {
    async fn publish(&self, queue: &str, payload: Vec<u8>) -> Result<(), NotifyError> {
        (**self).publish(queue, payload).await
    }
}

/// In-process queue backed by a bounded tokio channel
///
/// The receiving half is handed to whatever consumes the events.
#[derive(Clone)]
pub struct ChannelPublisher {
    sender: mpsc::Sender<QueueMessage>,
}

impl ChannelPublisher {
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<QueueMessage>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self { sender }, receiver)
    }
}

#[async_trait]
impl MessagePublisher for ChannelPublisher {
    async fn publish(&self, queue: &str, payload: Vec<u8>) -> Result<(), NotifyError> {
        self.sender
            .send(QueueMessage {
                queue: queue.to_string(),
                payload,
            })
            .await
            .map_err(|_| NotifyError::Closed)
    }
}
