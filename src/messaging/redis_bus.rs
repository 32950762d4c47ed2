//! Redis pub/sub bus

use crate::messaging::error::{MessagingError, MessagingResult};
use crate::messaging::traits::{MessageBus, Subscription, SUBSCRIPTION_BUFFER};
use async_trait::async_trait;
use futures::{Stream, StreamExt};
use redis::aio::ConnectionManager;
use redis::Client;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};

/// Publish/subscribe over Redis channels
///
/// Publishing shares one managed connection; each subscription opens its own
/// connection, as Redis requires for subscriber mode. [`MessageBus::close`]
/// ends every open subscription and refuses new ones.
#[derive(Clone)]
pub struct RedisBus {
    client: Client,
    publisher: ConnectionManager,
    closed: Arc<watch::Sender<bool>>,
}

impl RedisBus {
    pub async fn new(redis_url: &str) -> MessagingResult<Self> {
        let client = Client::open(redis_url)
            .map_err(|e| MessagingError::ConnectionFailed(format!("Invalid Redis URL: {}", e)))?;

        let publisher = ConnectionManager::new(client.clone())
            .await
            .map_err(|e| MessagingError::ConnectionFailed(format!("Redis connection failed: {}", e)))?;

        tracing::info!("Initialized Redis pub/sub bus");
        Ok(Self {
            client,
            publisher,
            closed: Arc::new(watch::channel(false).0),
        })
    }
}

/// Forward payloads until the stream ends, the subscriber goes away or the bus
/// is closed; the subscriber's connection drops with the stream
async fn forward<S>(
    channel: String,
    mut messages: S,
    sender: mpsc::Sender<Vec<u8>>,
    mut closed: watch::Receiver<bool>,
) where
    S: Stream<Item = Vec<u8>> + Unpin,
{
    loop {
        tokio::select! {
            message = messages.next() => match message {
                Some(payload) => {
                    if sender.send(payload).await.is_err() {
                        break;
                    }
                }
                None => break,
            },
            changed = closed.changed() => {
                if changed.is_err() || *closed.borrow() {
                    break;
                }
            }
        }
    }
    tracing::debug!(channel = %channel, "Redis subscription ended");
}

#[async_trait]
impl MessageBus for RedisBus {
    async fn publish_raw(&self, channel: &str, payload: Vec<u8>) -> MessagingResult<()> {
        let mut conn = self.publisher.clone();
        redis::cmd("PUBLISH")
            .arg(channel)
            .arg(payload)
            .query_async::<_, i64>(&mut conn)
            .await
            .map_err(|e| MessagingError::PublishFailed(format!("Redis publish failed: {}", e)))?;
        Ok(())
    }

    async fn subscribe(&self, channel: &str) -> MessagingResult<Subscription> {
        if *self.closed.borrow() {
            return Err(MessagingError::SubscribeFailed("bus is closed".to_string()));
        }

        let connection = self
            .client
            .get_async_connection()
            .await
            .map_err(|e| MessagingError::SubscribeFailed(format!("Redis connection failed: {}", e)))?;

        let mut pubsub = connection.into_pubsub();
        pubsub
            .subscribe(channel)
            .await
            .map_err(|e| MessagingError::SubscribeFailed(format!("Redis subscribe failed: {}", e)))?;

        let (sender, receiver) = mpsc::channel(SUBSCRIPTION_BUFFER);
        let messages = pubsub
            .into_on_message()
            .map(|message| message.get_payload_bytes().to_vec());
        let delivery = tokio::spawn(forward(
            channel.to_string(),
            Box::pin(messages),
            sender,
            self.closed.subscribe(),
        ));

        Ok(Subscription::new(channel, receiver, delivery))
    }

    async fn close(&self) -> MessagingResult<()> {
        self.closed.send_replace(true);
        tracing::info!("Redis pub/sub bus closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    #[tokio::test]
    async fn test_forward_stops_when_bus_closes() {
        let (closed, closed_rx) = watch::channel(false);
        let (sender, mut receiver) = mpsc::channel(4);
        let messages = stream::iter(vec![b"first".to_vec()]).chain(stream::pending());

        let delivery = tokio::spawn(forward(
            "users.events".to_string(),
            Box::pin(messages),
            sender,
            closed_rx,
        ));

        assert_eq!(receiver.recv().await, Some(b"first".to_vec()));

        closed.send_replace(true);
        tokio::time::timeout(std::time::Duration::from_secs(5), delivery)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(receiver.recv().await, None);
    }

    #[tokio::test]
    async fn test_forward_stops_when_stream_ends() {
        let (_closed, closed_rx) = watch::channel(false);
        let (sender, mut receiver) = mpsc::channel(4);
        let messages = stream::iter(vec![b"a".to_vec(), b"b".to_vec()]);

        forward("users.events".to_string(), messages, sender, closed_rx).await;

        assert_eq!(receiver.recv().await, Some(b"a".to_vec()));
        assert_eq!(receiver.recv().await, Some(b"b".to_vec()));
        assert_eq!(receiver.recv().await, None);
    }
}
