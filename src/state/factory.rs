use crate::config::CacheConfig;
use crate::error::Result;
use crate::state::{InMemorySessionStore, RedisSessionStore, SessionStore};
use std::sync::Arc;

/// Create a session store based on configuration
///
/// Redis when `redis_url` is set, in-memory otherwise.
pub async fn create_session_store(config: &CacheConfig) -> Result<Arc<dyn SessionStore>> {
    match &config.redis_url {
        Some(redis_url) => {
            tracing::info!(url = %redis_url, "Initializing Redis session store");
            let store = RedisSessionStore::new_with_prefix(redis_url, &config.key_prefix).await?;
            Ok(Arc::new(store))
        }
        None => Ok(create_in_memory_session_store()),
    }
}

/// Create an in-memory session store (for testing and development)
pub fn create_in_memory_session_store() -> Arc<dyn SessionStore> {
    tracing::info!("Initializing in-memory session store");
    Arc::new(InMemorySessionStore::new())
}
