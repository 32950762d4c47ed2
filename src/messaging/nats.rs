//! NATS JetStream exchange publisher

use crate::messaging::error::{MessagingError, MessagingResult};
use crate::messaging::traits::ExchangePublisher;
use async_nats::jetstream;
use async_nats::Client;
use async_trait::async_trait;

/// Publishes onto `{exchange}.{routing_key}` through JetStream
///
/// Each publish waits for the stream's acknowledgement, so a message is only
/// reported as sent once it is stored. The stream capturing `{exchange}.>` is
/// provisioned outside this crate.
pub struct NatsExchangePublisher {
    client: Client,
    context: jetstream::Context,
    exchange: String,
}

impl NatsExchangePublisher {
    pub async fn new(url: &str, exchange: impl Into<String>) -> MessagingResult<Self> {
        let client = async_nats::connect(url)
            .await
            .map_err(|e| MessagingError::ConnectionFailed(format!("NATS connection failed: {}", e)))?;

        let context = jetstream::new(client.clone());
        let exchange = exchange.into();
        tracing::info!(exchange = %exchange, "Initialized NATS exchange publisher");

        Ok(Self {
            client,
            context,
            exchange,
        })
    }

    pub fn subject(&self, routing_key: &str) -> String {
        subject_for(&self.exchange, routing_key)
    }
}

pub(crate) fn subject_for(exchange: &str, routing_key: &str) -> String {
    format!("{}.{}", exchange, routing_key)
}

#[async_trait]
impl ExchangePublisher for NatsExchangePublisher {
    async fn publish_raw(&self, routing_key: &str, payload: Vec<u8>) -> MessagingResult<()> {
        tracing::debug!(exchange = %self.exchange, routing_key = %routing_key, "Publishing");

        let ack = self
            .context
            .publish(self.subject(routing_key), payload.into())
            .await
            .map_err(|e| MessagingError::PublishFailed(format!("JetStream publish failed: {}", e)))?;

        ack.await
            .map_err(|e| MessagingError::PublishFailed(format!("JetStream ack failed: {}", e)))?;
        Ok(())
    }

    async fn close(&self) -> MessagingResult<()> {
        self.client
            .flush()
            .await
            .map_err(|e| MessagingError::PublishFailed(format!("NATS flush failed: {}", e)))
    }
}
