use anyhow::Context;
use std::sync::Arc;
use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use user_directory_search::{
    config::{Config, ObservabilityConfig},
    messaging::{ExchangePublisher, MessageBus, NatsExchangePublisher, RedisBus},
    IndexSync, UserSearchService,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("Failed to load configuration")?;
    init_tracing(&config.observability);

    tracing::info!("Starting user directory search v{}", env!("CARGO_PKG_VERSION"));

    // Search service; a provisioning failure aborts startup
    let search_config = config.search.to_search_config();
    let search = UserSearchService::new(&search_config)?;
    search.ensure_index().await.map_err(|e| {
        tracing::error!(index = %search.index_name(), error = %e, "Index provisioning failed");
        e
    })?;
    tracing::info!(node = %search_config.node, index = %search.index_name(), "✅ Search index ready");

    let exchange: Option<Arc<dyn ExchangePublisher>> = match &config.messaging.nats_url {
        Some(url) => {
            let publisher = NatsExchangePublisher::new(url, &config.messaging.exchange).await?;
            tracing::info!(exchange = %config.messaging.exchange, "✅ Exchange publisher connected");
            Some(Arc::new(publisher))
        }
        None => {
            tracing::info!("⚠️  No NATS URL configured, events will not be announced");
            None
        }
    };

    let bus: Option<Arc<dyn MessageBus>> = match &config.messaging.pubsub_url {
        Some(url) => Some(Arc::new(RedisBus::new(url).await?)),
        None => {
            tracing::info!("⚠️  No pub/sub URL configured, index sync disabled");
            None
        }
    };

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let worker = match &bus {
        Some(bus) => {
            let mut sync = IndexSync::subscribe(
                bus.as_ref(),
                &config.messaging.user_events_channel,
                search.clone(),
            )
            .await?;
            if let Some(exchange) = &exchange {
                sync = sync.with_exchange(exchange.clone());
            }
            Some(tokio::spawn(sync.run(shutdown_rx)))
        }
        None => None,
    };

    tracing::info!("Press Ctrl+C to shutdown");
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;
    tracing::info!("Shutdown signal received");

    let _ = shutdown_tx.send(true);
    if let Some(worker) = worker {
        match worker.await {
            Ok(stats) => tracing::info!(?stats, "Index sync finished"),
            Err(e) => tracing::error!(error = %e, "Index sync task failed"),
        }
    }

    if let Some(bus) = bus {
        if let Err(e) = bus.close().await {
            tracing::warn!(error = %e, "Failed to close pub/sub bus");
        }
    }
    if let Some(exchange) = exchange {
        if let Err(e) = exchange.close().await {
            tracing::warn!(error = %e, "Failed to close exchange publisher");
        }
    }
    tracing::info!("Shutting down gracefully...");
    Ok(())
}

fn init_tracing(observability: &ObservabilityConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("user_directory_search={}", observability.log_level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if observability.json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
