//! Documents stored in and returned from the user index

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Creation timestamp as handed in by callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CreatedAt {
    /// Already textual; stored as given
    Text(String),
    /// Native time value; serialized as RFC 3339 with millisecond precision
    Time(DateTime<Utc>),
}

impl CreatedAt {
    pub fn to_timestamp(&self) -> String {
        match self {
            CreatedAt::Text(text) => text.clone(),
            CreatedAt::Time(time) => format_timestamp(time),
        }
    }
}

impl From<DateTime<Utc>> for CreatedAt {
    fn from(time: DateTime<Utc>) -> Self {
        CreatedAt::Time(time)
    }
}

impl From<String> for CreatedAt {
    fn from(text: String) -> Self {
        CreatedAt::Text(text)
    }
}

impl From<&str> for CreatedAt {
    fn from(text: &str) -> Self {
        CreatedAt::Text(text.to_string())
    }
}

pub(crate) fn format_timestamp(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// User entity as the rest of the application knows it
///
/// Carries contact data that must never reach the search index. Convert with
/// `IndexedUser::from(&record)` before indexing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub user_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// The document stored in the search index, keyed by `user_id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedUser {
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<CreatedAt>,
}

impl IndexedUser {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            name: None,
            email: None,
            avatar: None,
            status: None,
            created_at: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = Some(avatar.into());
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_created_at(mut self, created_at: impl Into<CreatedAt>) -> Self {
        self.created_at = Some(created_at.into());
        self
    }

    /// Body written to the engine: every field as given, `created_at` always set
    pub fn to_document(&self, now: DateTime<Utc>) -> StoredUser<'_> {
        let created_at = match &self.created_at {
            Some(created_at) => created_at.to_timestamp(),
            None => format_timestamp(&now),
        };

        StoredUser {
            user_id: &self.user_id,
            name: self.name.as_deref(),
            email: self.email.as_deref(),
            avatar: self.avatar.as_deref(),
            status: self.status.as_deref(),
            created_at,
        }
    }
}

impl From<&UserRecord> for IndexedUser {
    fn from(record: &UserRecord) -> Self {
        Self {
            user_id: record.user_id.clone(),
            name: record.name.clone(),
            email: record.email.clone(),
            avatar: record.avatar.clone(),
            status: record.status.clone(),
            created_at: record.created_at.map(CreatedAt::Time),
        }
    }
}

/// Wire form of an [`IndexedUser`]
#[derive(Debug, Serialize)]
pub struct StoredUser<'a> {
    pub user_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<&'a str>,
    pub created_at: String,
}

/// Minimal projection returned to callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Engine document id, never the `user_id` inside the source
    pub id: String,

    /// Stored name, empty when absent
    pub name: String,

    /// Stored avatar, `null` when absent
    pub avatar: Option<String>,

    /// Highlighted fragments per field (only for strategies that request them)
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub highlights: HashMap<String, Vec<String>>,
}

/// One page of results plus the server-side match count
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginatedResult {
    pub data: Vec<SearchResult>,
    pub total: u64,
}

impl PaginatedResult {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.data.iter().map(|hit| hit.id.as_str())
    }
}
