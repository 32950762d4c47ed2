//! In-process bus and exchange (for development and testing)

use crate::messaging::error::MessagingResult;
use crate::messaging::traits::{ExchangePublisher, MessageBus, Subscription, SUBSCRIPTION_BUFFER};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{broadcast, mpsc};

/// Channel-per-name broadcast bus
#[derive(Clone, Default)]
pub struct InMemoryBus {
    channels: Arc<DashMap<String, broadcast::Sender<Vec<u8>>>>,
}

impl InMemoryBus {
    pub fn new() -> Self {
        Self::default()
    }

    fn sender(&self, channel: &str) -> broadcast::Sender<Vec<u8>> {
        self.channels
            .entry(channel.to_string())
            .or_insert_with(|| broadcast::channel(SUBSCRIPTION_BUFFER).0)
            .clone()
    }
}

#[async_trait]
impl MessageBus for InMemoryBus {
    async fn publish_raw(&self, channel: &str, payload: Vec<u8>) -> MessagingResult<()> {
        // No subscribers means the message is dropped
        let _ = self.sender(channel).send(payload);
        Ok(())
    }

    async fn subscribe(&self, channel: &str) -> MessagingResult<Subscription> {
        let mut source = self.sender(channel).subscribe();
        let (sender, receiver) = mpsc::channel(SUBSCRIPTION_BUFFER);
        let name = channel.to_string();

        let delivery = tokio::spawn(async move {
            loop {
                match source.recv().await {
                    Ok(payload) => {
                        if sender.send(payload).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(channel = %name, skipped, "Subscriber lagged; messages dropped");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });

        Ok(Subscription::new(channel, receiver, delivery))
    }

    async fn close(&self) -> MessagingResult<()> {
        self.channels.clear();
        Ok(())
    }
}

/// Exchange that keeps every published message
#[derive(Clone, Default)]
pub struct InMemoryExchange {
    published: Arc<Mutex<Vec<(String, Vec<u8>)>>>,
}

impl InMemoryExchange {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages published so far as `(routing_key, payload)`
    pub fn published(&self) -> Vec<(String, Vec<u8>)> {
        self.published
            .lock()
            .map(|published| published.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ExchangePublisher for InMemoryExchange {
    async fn publish_raw(&self, routing_key: &str, payload: Vec<u8>) -> MessagingResult<()> {
        if let Ok(mut published) = self.published.lock() {
            published.push((routing_key.to_string(), payload));
        }
        Ok(())
    }

    async fn close(&self) -> MessagingResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messaging::traits::{ExchangePublisherExt, MessageBusExt};
    use serde_json::{json, Value};

    #[tokio::test]
    async fn test_publish_reaches_subscriber() {
        let bus = InMemoryBus::new();
        let mut sub = bus.subscribe("users.events").await.unwrap();

        bus.publish("users.events", &json!({ "hello": "world" }))
            .await
            .unwrap();

        let message: Value = sub.next().await.unwrap().unwrap();
        assert_eq!(message["hello"], "world");
        assert_eq!(sub.channel(), "users.events");
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_is_dropped() {
        let bus = InMemoryBus::new();
        bus.publish("nobody", &json!(1)).await.unwrap();

        let mut sub = bus.subscribe("nobody").await.unwrap();
        bus.publish("nobody", &json!(2)).await.unwrap();

        let message: Value = sub.next().await.unwrap().unwrap();
        assert_eq!(message, json!(2));
    }

    #[tokio::test]
    async fn test_channels_are_isolated() {
        let bus = InMemoryBus::new();
        let mut a = bus.subscribe("a").await.unwrap();
        let _b = bus.subscribe("b").await.unwrap();

        bus.publish("b", &json!("for b")).await.unwrap();
        bus.publish("a", &json!("for a")).await.unwrap();

        let message: Value = a.next().await.unwrap().unwrap();
        assert_eq!(message, json!("for a"));
    }

    #[tokio::test]
    async fn test_undecodable_payload_is_reported() {
        let bus = InMemoryBus::new();
        let mut sub = bus.subscribe("raw").await.unwrap();
        bus.publish_raw("raw", b"not json".to_vec()).await.unwrap();

        let decoded: Option<MessagingResult<Value>> = sub.next().await;
        assert!(matches!(decoded, Some(Err(_))));
    }

    #[tokio::test]
    async fn test_exchange_records_routing_keys() {
        let exchange = InMemoryExchange::new();
        exchange
            .publish("user.created", &json!({ "user_id": "u1" }))
            .await
            .unwrap();

        let published = exchange.published();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].0, "user.created");
        let payload: Value = serde_json::from_slice(&published[0].1).unwrap();
        assert_eq!(payload["user_id"], "u1");
    }
}
