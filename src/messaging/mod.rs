//! Messaging collaborators: publish/subscribe bus and durable exchange
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────┐   ┌──────────────────────────┐
//! │  MessageBus (trait)       │   │  ExchangePublisher       │
//! │  - publish / subscribe    │   │  - publish(routing_key)  │
//! │  - at-most-once           │   │  - persistent delivery   │
//! └──────────────────────────┘   └──────────────────────────┘
//!     │               │                │              │
//!     ▼               ▼                ▼              ▼
//!  RedisBus      InMemoryBus   NatsExchangePublisher  InMemoryExchange
//! ```
//!
//! # Example
//!
//! ```no_run
//! use user_directory_search::messaging::{InMemoryBus, MessageBus, MessageBusExt, UserEvent};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let bus = InMemoryBus::new();
//!     let mut events = bus.subscribe("users.events").await?;
//!
//!     bus.publish("users.events", &UserEvent::Deleted { user_id: "u1".into() }).await?;
//!
//!     if let Some(event) = events.next::<UserEvent>().await {
//!         println!("{:?}", event?);
//!     }
//!     events.unsubscribe();
//!     Ok(())
//! }
//! ```

mod error;
mod events;
mod memory;
mod nats;
mod redis_bus;
mod traits;

pub use error::{MessagingError, MessagingResult};
pub use events::{IndexAnnouncement, UserEvent};
pub use memory::{InMemoryBus, InMemoryExchange};
pub use nats::NatsExchangePublisher;
pub use redis_bus::RedisBus;
pub use traits::{
    ExchangePublisher, ExchangePublisherExt, MessageBus, MessageBusExt, Subscription,
};
