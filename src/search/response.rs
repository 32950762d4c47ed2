//! Normalization of engine search responses
//!
//! Engines report the match total either as a bare integer or as
//! `{ "value": n, "relation": "eq" }`. Both collapse into one number here, and
//! every hit is projected onto [`SearchResult`].

use crate::search::document::{PaginatedResult, SearchResult};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::HashMap;

/// Shapes of `hits.total` understood by the normalizer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TotalHits {
    /// `"total": 5`
    Count(u64),
    /// `"total": { "value": 5, "relation": "eq" }`
    Object { value: u64, relation: Option<String> },
}

impl TotalHits {
    pub fn value(&self) -> u64 {
        match self {
            TotalHits::Count(count) => *count,
            TotalHits::Object { value, .. } => *value,
        }
    }

    fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_u64().map(TotalHits::Count),
            Value::Object(map) => {
                let value = map.get("value")?.as_u64()?;
                let relation = map
                    .get("relation")
                    .and_then(Value::as_str)
                    .map(str::to_string);
                Some(TotalHits::Object { value, relation })
            }
            _ => None,
        }
    }
}

fn lenient_total<'de, D>(deserializer: D) -> Result<Option<TotalHits>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(TotalHits::from_json))
}

/// Missing and `null` both mean "nothing here"
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Top level of a `_search` response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EngineResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub hits: HitsEnvelope,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HitsEnvelope {
    #[serde(default, deserialize_with = "lenient_total")]
    pub total: Option<TotalHits>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub hits: Vec<Hit>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Hit {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_source", default)]
    pub source: Option<HitSource>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub highlight: HashMap<String, Vec<String>>,
}

/// Only the projected fields are read from `_source`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HitSource {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
}

impl Hit {
    fn into_result(self) -> SearchResult {
        let source = self.source.unwrap_or_default();
        SearchResult {
            id: self.id,
            name: source.name.unwrap_or_default(),
            avatar: source.avatar,
            highlights: self.highlight,
        }
    }
}

impl EngineResponse {
    /// Total matches server-side
    ///
    /// Falls back to the number of returned hits when the response carries no
    /// usable total; that fallback can understate the real count.
    pub fn total(&self) -> u64 {
        match &self.hits.total {
            Some(total) => total.value(),
            None => {
                let returned = self.hits.hits.len() as u64;
                tracing::warn!(
                    returned,
                    "Search response has no usable total; using returned hit count"
                );
                returned
            }
        }
    }

    pub fn into_paginated(self) -> PaginatedResult {
        let total = self.total();
        let data = self.hits.hits.into_iter().map(Hit::into_result).collect();
        PaginatedResult { data, total }
    }
}

/// Normalize a raw JSON response body
pub fn normalize(body: Value) -> serde_json::Result<PaginatedResult> {
    let response: EngineResponse = serde_json::from_value(body)?;
    Ok(response.into_paginated())
}
