//! User directory search backed by Elasticsearch
//!
//! This module owns everything between the application and the user index:
//!
//! - **Schema**: analysis pipeline (lowercase normalizer, accent folding that keeps
//!   the original token, 2-20 edge n-grams) and field mappings, created once
//! - **Document Lifecycle**: full-replace upserts keyed by `user_id`, deletes
//! - **Query Strategies**: exact email, exact/prefix/fuzzy text, legacy fuzzy name
//! - **Normalization**: one total and a `{id, name, avatar}` projection per hit
//! - **Pagination**: page/limit clamping before paged queries
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │           UserSearchService                      │
//! ├─────────────────────────────────────────────────┤
//! │  - ensure_index()     - index_user()            │
//! │  - delete_user()      - search_email_exact()    │
//! │  - search_text()      - search_by_name[_paged]()│
//! └─────────────────────────────────────────────────┘
//!          │ QueryBuilder / PageRequest   ▲ normalize()
//!          ▼                              │
//! ┌─────────────────────────────────────────────────┐
//! │           SearchBackend (trait)                  │
//! ├─────────────────────────────────────────────────┤
//! │  ElasticsearchBackend: elasticsearch client     │
//! └─────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use user_directory_search::search::{IndexedUser, SearchConfigBuilder, UserSearchService};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SearchConfigBuilder::new().node("http://localhost:9200").build();
//!     let search = UserSearchService::new(&config)?;
//!     search.ensure_index().await?;
//!
//!     search
//!         .index_user(&IndexedUser::new("u1").with_name("Nguyen Van A"))
//!         .await?;
//!
//!     let page = search.search_text("nguyen", 0, 20).await?;
//!     println!("{} matches", page.total);
//!     Ok(())
//! }
//! ```

mod backend;
mod config;
mod document;
mod error;
mod pagination;
mod query;
mod response;
mod schema;
mod service;

pub use backend::{ElasticsearchBackend, SearchBackend};
pub use config::{Credentials, RefreshPolicy, SearchConfig, SearchConfigBuilder};
pub use document::{CreatedAt, IndexedUser, PaginatedResult, SearchResult, StoredUser, UserRecord};
pub use error::{Result, SearchError};
pub use pagination::{PageRequest, Window, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
pub use query::{is_blank, QueryBuilder, QueryStrategy};
pub use response::{normalize, EngineResponse, Hit, TotalHits};
pub use schema::{fields, index_definition};
pub use service::UserSearchService;
