//! Keeps the user index in step with user events from the bus

use crate::messaging::{
    ExchangePublisher, ExchangePublisherExt, IndexAnnouncement, MessageBus, MessagingResult,
    Subscription, UserEvent,
};
use crate::search::{self, IndexedUser, UserSearchService};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Counters reported when the worker stops
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncStats {
    pub applied: u64,
    pub failed: u64,
    pub undecodable: u64,
}

/// Applies [`UserEvent`]s to the index, one event at a time
///
/// A failed event is logged and skipped; it is not retried. With an exchange
/// attached, every applied event is announced as an [`IndexAnnouncement`].
pub struct IndexSync {
    search: UserSearchService,
    subscription: Subscription,
    exchange: Option<Arc<dyn ExchangePublisher>>,
}

impl IndexSync {
    /// Subscribe to `channel` on the bus
    pub async fn subscribe(
        bus: &dyn MessageBus,
        channel: &str,
        search: UserSearchService,
    ) -> MessagingResult<Self> {
        let subscription = bus.subscribe(channel).await?;
        info!(channel = %channel, index = %search.index_name(), "Index sync subscribed");
        Ok(Self {
            search,
            subscription,
            exchange: None,
        })
    }

    /// Announce applied events on an exchange
    pub fn with_exchange(mut self, exchange: Arc<dyn ExchangePublisher>) -> Self {
        self.exchange = Some(exchange);
        self
    }

    /// Apply one event to the index
    pub async fn apply(&self, event: &UserEvent) -> search::Result<()> {
        match event {
            UserEvent::Upserted { user } => self.search.index_user(&IndexedUser::from(user)).await,
            UserEvent::Deleted { user_id } => self.search.delete_user(user_id).await,
        }
    }

    /// Process events until the subscription ends or `shutdown` flips to true
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> SyncStats {
        let mut stats = SyncStats::default();

        loop {
            let next = tokio::select! {
                next = self.subscription.next::<UserEvent>() => next,
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                    continue;
                }
            };

            let event = match next {
                Some(Ok(event)) => event,
                Some(Err(e)) => {
                    stats.undecodable += 1;
                    warn!(
                        channel = %self.subscription.channel(),
                        error = %e,
                        "Skipping undecodable user event"
                    );
                    continue;
                }
                None => break,
            };

            match self.apply(&event).await {
                Ok(()) => {
                    stats.applied += 1;
                    debug!(user_id = %event.user_id(), "User event applied");
                    self.announce(&event).await;
                }
                Err(e) => {
                    stats.failed += 1;
                    warn!(user_id = %event.user_id(), error = %e, "Failed to apply user event");
                }
            }
        }

        info!(
            applied = stats.applied,
            failed = stats.failed,
            undecodable = stats.undecodable,
            "Index sync stopped"
        );
        self.subscription.unsubscribe();
        stats
    }

    async fn announce(&self, event: &UserEvent) {
        let Some(exchange) = &self.exchange else {
            return;
        };
        let announcement = IndexAnnouncement::from(event);
        let routing_key = announcement.routing_key();
        if let Err(e) = exchange.publish(routing_key, &announcement).await {
            warn!(
                routing_key,
                user_id = %event.user_id(),
                error = %e,
                "Failed to announce user event"
            );
        }
    }
}
