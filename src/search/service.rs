//! User search service: schema provisioning, document lifecycle and queries

use crate::search::backend::{ElasticsearchBackend, SearchBackend};
use crate::search::config::{RefreshPolicy, SearchConfig};
use crate::search::document::{IndexedUser, PaginatedResult};
use crate::search::error::{Result, SearchError};
use crate::search::pagination::{PageRequest, Window};
use crate::search::query::{is_blank, QueryBuilder, QueryStrategy};
use crate::search::response;
use crate::search::schema;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info};

/// Search façade over the user index
///
/// Holds no state besides its engine handle; every call is one round-trip.
#[derive(Clone)]
pub struct UserSearchService {
    backend: Arc<dyn SearchBackend>,
    index: String,
    refresh: RefreshPolicy,
}

impl UserSearchService {
    /// Create a service talking to Elasticsearch as configured
    pub fn new(config: &SearchConfig) -> Result<Self> {
        let backend = ElasticsearchBackend::new(config)?;
        Ok(Self::with_backend(Arc::new(backend), config.index.clone())
            .with_refresh(config.refresh))
    }

    /// Create a service over any backend
    pub fn with_backend(backend: Arc<dyn SearchBackend>, index: impl Into<String>) -> Self {
        Self {
            backend,
            index: index.into(),
            refresh: RefreshPolicy::default(),
        }
    }

    /// Visibility policy for upserts
    pub fn with_refresh(mut self, refresh: RefreshPolicy) -> Self {
        self.refresh = refresh;
        self
    }

    pub fn index_name(&self) -> &str {
        &self.index
    }

    /// Create the index with its analysis settings and mappings unless it exists
    ///
    /// An existing index is left untouched, whatever its definition.
    pub async fn ensure_index(&self) -> Result<()> {
        let exists = self
            .backend
            .index_exists(&self.index)
            .await
            .map_err(|e| SearchError::Provisioning(e.to_string()))?;

        if exists {
            debug!(index = %self.index, "Index already exists");
            return Ok(());
        }

        self.backend
            .create_index(&self.index, &schema::index_definition())
            .await
            .map_err(|e| SearchError::Provisioning(e.to_string()))?;

        info!(index = %self.index, "Created user index with edge n-gram mapping");
        Ok(())
    }

    /// Upsert a user document, replacing any previous version
    pub async fn index_user(&self, user: &IndexedUser) -> Result<()> {
        let document = serde_json::to_value(user.to_document(Utc::now()))
            .map_err(|e| SearchError::Indexing(e.to_string()))?;

        self.backend
            .put_document(&self.index, &user.user_id, &document, self.refresh)
            .await
            .map_err(|e| SearchError::Indexing(e.to_string()))?;

        debug!(index = %self.index, user_id = %user.user_id, "User indexed");
        Ok(())
    }

    /// Remove a user document
    pub async fn delete_user(&self, user_id: &str) -> Result<()> {
        self.backend
            .delete_document(&self.index, user_id)
            .await
            .map_err(|e| SearchError::Deletion(e.to_string()))?;

        debug!(index = %self.index, user_id = %user_id, "User removed from index");
        Ok(())
    }

    /// Exact email lookup with an analyzed all-terms fallback
    pub async fn search_email_exact(
        &self,
        query: &str,
        skip: u64,
        limit: u64,
    ) -> Result<PaginatedResult> {
        let strategy = QueryStrategy::EmailExact;
        self.run(strategy, strategy.operation(), query, Window::new(skip, limit))
            .await
    }

    /// Exact, prefix and fuzzy name/email search with highlighting
    pub async fn search_text(&self, query: &str, skip: u64, limit: u64) -> Result<PaginatedResult> {
        let strategy = QueryStrategy::Text;
        self.run(strategy, strategy.operation(), query, Window::new(skip, limit))
            .await
    }

    /// Legacy fuzzy name search, first `limit` matches
    pub async fn search_by_name(&self, query: &str, limit: u64) -> Result<PaginatedResult> {
        let strategy = QueryStrategy::ByName;
        self.run(strategy, strategy.operation(), query, Window::new(0, limit))
            .await
    }

    /// Legacy fuzzy name search by 1-based page; page and limit are clamped
    pub async fn search_by_name_paged(
        &self,
        query: &str,
        page: i64,
        limit: i64,
    ) -> Result<PaginatedResult> {
        let request = PageRequest::new(page, limit);
        self.run(QueryStrategy::ByName, "search by name paged", query, request.window())
            .await
    }

    async fn run(
        &self,
        strategy: QueryStrategy,
        operation: &str,
        query: &str,
        window: Window,
    ) -> Result<PaginatedResult> {
        if is_blank(query) {
            return Ok(PaginatedResult::empty());
        }

        let body = QueryBuilder::new(query, window).build(strategy);
        debug!(
            index = %self.index,
            operation,
            from = window.from,
            size = window.size,
            "Executing search"
        );

        let raw = self
            .backend
            .search(&self.index, &body)
            .await
            .map_err(|e| SearchError::query(operation, e))?;

        response::normalize(raw).map_err(|e| SearchError::query(operation, e))
    }
}
