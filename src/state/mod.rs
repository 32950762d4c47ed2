//! Session/cache store used to resolve bearer tokens to user records

pub mod factory;
pub mod redis_store;
pub mod store;

pub use factory::{create_session_store, create_in_memory_session_store};
pub use redis_store::RedisSessionStore;
pub use store::InMemorySessionStore;

use crate::error::{AppError, Result};
use crate::search::UserRecord;
use async_trait::async_trait;
use std::time::Duration;

/// Key-value operations the authentication layer needs
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Get a value; `None` when absent or expired
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Set a value, optionally expiring after `ttl`
    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<()>;

    /// Delete a value; deleting an absent key is not an error
    async fn delete(&self, key: &str) -> Result<()>;

    /// Get several values, one slot per key in order
    async fn multi_get(&self, keys: &[String]) -> Result<Vec<Option<String>>>;
}

/// Key under which a token's user record is cached
pub fn session_key(token: &str) -> String {
    format!("session:{}", token)
}

/// Cache a user record for a token
pub async fn store_session(
    store: &dyn SessionStore,
    token: &str,
    user: &UserRecord,
    ttl: Option<Duration>,
) -> Result<()> {
    let value = serde_json::to_string(user)?;
    store.set(&session_key(token), &value, ttl).await
}

/// Resolve a bearer token to its cached user record
///
/// A blank token or a cache miss is an authentication failure, never an
/// anonymous user.
pub async fn resolve_session(store: &dyn SessionStore, token: &str) -> Result<UserRecord> {
    let token = token.trim();
    if token.is_empty() {
        return Err(AppError::Authentication("missing token".to_string()));
    }

    let cached = store
        .get(&session_key(token))
        .await?
        .ok_or_else(|| AppError::Authentication("unknown or expired session".to_string()))?;

    serde_json::from_str(&cached)
        .map_err(|e| AppError::Authentication(format!("unreadable session: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> UserRecord {
        UserRecord {
            user_id: "u1".into(),
            name: Some("Nguyen Van A".into()),
            email: Some("a@example.com".into()),
            avatar: None,
            status: Some("active".into()),
            phone: None,
            created_at: None,
        }
    }

    #[tokio::test]
    async fn test_resolve_cached_session() {
        let store = InMemorySessionStore::new();
        store_session(&store, "tok", &user(), None).await.unwrap();

        let resolved = resolve_session(&store, "tok").await.unwrap();
        assert_eq!(resolved, user());
    }

    #[tokio::test]
    async fn test_missing_token_is_denied() {
        let store = InMemorySessionStore::new();
        let err = resolve_session(&store, "  ").await.unwrap_err();
        assert!(err.is_access_denied());
    }

    #[tokio::test]
    async fn test_cache_miss_is_denied() {
        let store = InMemorySessionStore::new();
        let err = resolve_session(&store, "unknown").await.unwrap_err();
        assert!(err.is_access_denied());
    }

    #[tokio::test]
    async fn test_corrupt_session_is_denied() {
        let store = InMemorySessionStore::new();
        store.set(&session_key("tok"), "{oops", None).await.unwrap();

        let err = resolve_session(&store, "tok").await.unwrap_err();
        assert!(err.is_access_denied());
    }
}
