//! Messaging trait abstractions

use crate::messaging::error::{MessagingError, MessagingResult};
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Fire-and-forget publish/subscribe bus (at-most-once delivery)
#[async_trait]
pub trait MessageBus: Send + Sync {
    /// Publish an already encoded payload on a channel
    async fn publish_raw(&self, channel: &str, payload: Vec<u8>) -> MessagingResult<()>;

    /// Start receiving payloads published on a channel from now on
    async fn subscribe(&self, channel: &str) -> MessagingResult<Subscription>;

    /// Release connections held by the bus
    async fn close(&self) -> MessagingResult<()>;
}

/// Publisher onto a durable exchange, addressed by routing key
#[async_trait]
pub trait ExchangePublisher: Send + Sync {
    /// Publish an encoded payload, requesting persistent delivery
    async fn publish_raw(&self, routing_key: &str, payload: Vec<u8>) -> MessagingResult<()>;

    /// Flush and release the connection
    async fn close(&self) -> MessagingResult<()>;
}

/// JSON helpers for [`MessageBus`]
#[async_trait]
pub trait MessageBusExt {
    async fn publish<T: Serialize + Send + Sync>(
        &self,
        channel: &str,
        message: &T,
    ) -> MessagingResult<()>;
}

#[async_trait]
impl<B: MessageBus + ?Sized> MessageBusExt for B {
    async fn publish<T: Serialize + Send + Sync>(
        &self,
        channel: &str,
        message: &T,
    ) -> MessagingResult<()> {
        let payload = serde_json::to_vec(message)?;
        self.publish_raw(channel, payload).await
    }
}

/// JSON helpers for [`ExchangePublisher`]
#[async_trait]
pub trait ExchangePublisherExt {
    async fn publish<T: Serialize + Send + Sync>(
        &self,
        routing_key: &str,
        message: &T,
    ) -> MessagingResult<()>;
}

#[async_trait]
impl<P: ExchangePublisher + ?Sized> ExchangePublisherExt for P {
    async fn publish<T: Serialize + Send + Sync>(
        &self,
        routing_key: &str,
        message: &T,
    ) -> MessagingResult<()> {
        let payload = serde_json::to_vec(message)?;
        self.publish_raw(routing_key, payload).await
    }
}

/// Buffer between a backend's delivery task and the subscriber
pub(crate) const SUBSCRIPTION_BUFFER: usize = 256;

/// Live subscription to one channel
///
/// Messages are delivered on a dedicated task; dropping the subscription or
/// calling [`Subscription::unsubscribe`] stops that task.
pub struct Subscription {
    channel: String,
    receiver: mpsc::Receiver<Vec<u8>>,
    delivery: JoinHandle<()>,
}

impl Subscription {
    pub(crate) fn new(
        channel: impl Into<String>,
        receiver: mpsc::Receiver<Vec<u8>>,
        delivery: JoinHandle<()>,
    ) -> Self {
        Self {
            channel: channel.into(),
            receiver,
            delivery,
        }
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Next raw payload; `None` once the subscription has ended
    pub async fn next_raw(&mut self) -> Option<Vec<u8>> {
        self.receiver.recv().await
    }

    /// Next payload decoded as JSON
    pub async fn next<T: DeserializeOwned>(&mut self) -> Option<MessagingResult<T>> {
        let payload = self.next_raw().await?;
        Some(
            serde_json::from_slice(&payload)
                .map_err(|e| MessagingError::DeserializationError(e.to_string())),
        )
    }

    /// Stop delivery for this subscription
    pub fn unsubscribe(self) {
        tracing::debug!(channel = %self.channel, "Unsubscribed");
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.delivery.abort();
    }
}
