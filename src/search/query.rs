//! Request bodies for the ranked query strategies

use crate::search::pagination::Window;
use crate::search::schema::fields;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub const HIGHLIGHT_PRE_TAG: &str = "<em>";
pub const HIGHLIGHT_POST_TAG: &str = "</em>";

/// Cap on terms a phrase-prefix clause may expand to
pub const MAX_PREFIX_EXPANSIONS: u32 = 50;

/// The ranked query shapes the service can issue
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum QueryStrategy {
    /// Exact email term with an all-terms analyzed fallback
    EmailExact,
    /// Exact name, name prefix, fuzzy name/email
    Text,
    /// Legacy fuzzy match over name and its exact subfield
    ByName,
}

impl QueryStrategy {
    /// Operation name used in logs and errors
    pub fn operation(&self) -> &'static str {
        match self {
            QueryStrategy::EmailExact => "search email",
            QueryStrategy::Text => "search text",
            QueryStrategy::ByName => "search by name",
        }
    }
}

/// Empty and whitespace-only queries never reach the engine
pub fn is_blank(query: &str) -> bool {
    query.trim().is_empty()
}

/// Builds engine request bodies for each [`QueryStrategy`]
pub struct QueryBuilder<'a> {
    query: &'a str,
    window: Window,
}

impl<'a> QueryBuilder<'a> {
    pub fn new(query: &'a str, window: Window) -> Self {
        Self {
            query: query.trim(),
            window,
        }
    }

    pub fn build(&self, strategy: QueryStrategy) -> Value {
        match strategy {
            QueryStrategy::EmailExact => self.email_exact(),
            QueryStrategy::Text => self.text(),
            QueryStrategy::ByName => self.by_name(),
        }
    }

    fn email_exact(&self) -> Value {
        json!({
            "from": self.window.from,
            "size": self.window.size,
            "query": {
                "bool": {
                    "should": [
                        { "term": { (fields::EMAIL_RAW): self.query.to_lowercase() } },
                        { "match": { (fields::EMAIL): { "query": self.query, "operator": "and" } } }
                    ],
                    "minimum_should_match": 1
                }
            },
            "sort": relevance_then_newest()
        })
    }

    fn text(&self) -> Value {
        json!({
            "from": self.window.from,
            "size": self.window.size,
            "query": {
                "bool": {
                    "should": [
                        { "term": { (fields::NAME_RAW): self.query.to_lowercase() } },
                        {
                            "match_phrase_prefix": {
                                (fields::NAME_NGRAM): {
                                    "query": self.query,
                                    "max_expansions": MAX_PREFIX_EXPANSIONS
                                }
                            }
                        },
                        {
                            "multi_match": {
                                "query": self.query,
                                "type": "best_fields",
                                "fields": ["name^3", "email^2"],
                                "operator": "or",
                                "fuzziness": "AUTO"
                            }
                        }
                    ],
                    "minimum_should_match": 1
                }
            },
            "sort": relevance_then_newest(),
            "highlight": {
                "pre_tags": [HIGHLIGHT_PRE_TAG],
                "post_tags": [HIGHLIGHT_POST_TAG],
                "fields": { (fields::NAME): {}, (fields::EMAIL): {} }
            }
        })
    }

    fn by_name(&self) -> Value {
        json!({
            "from": self.window.from,
            "size": self.window.size,
            "query": {
                "multi_match": {
                    "query": self.query,
                    "type": "best_fields",
                    "fields": ["name^3", "name.raw^5"],
                    "operator": "or",
                    "fuzziness": "AUTO"
                }
            }
        })
    }
}

fn relevance_then_newest() -> Value {
    json!([
        { "_score": { "order": "desc" } },
        { (fields::CREATED_AT): { "order": "desc" } }
    ])
}
