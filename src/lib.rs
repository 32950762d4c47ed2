//! User directory search
//!
//! Keeps a user index in Elasticsearch and answers exact-email, free-text and
//! by-name lookups over it. The session store and messaging collaborators live
//! alongside so the binary can keep the index in step with user events.

pub mod config;
pub mod error;
pub mod messaging;
pub mod search;
pub mod state;
pub mod sync;

pub use error::{AppError, Result};
pub use search::{
    IndexedUser, PaginatedResult, SearchConfig, SearchError, SearchResult, UserRecord,
    UserSearchService,
};
pub use sync::{IndexSync, SyncStats};
