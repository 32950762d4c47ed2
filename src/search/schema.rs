//! Index settings and mappings for the user index
//!
//! The definition is applied once, when the index is created. Analysis settings
//! cannot be changed on a live index, so a different definition needs a new
//! index name.

use serde_json::{json, Value};

/// Field paths used by the mapping and by queries
pub mod fields {
    pub const USER_ID: &str = "user_id";
    pub const NAME: &str = "name";
    pub const NAME_RAW: &str = "name.raw";
    pub const NAME_NGRAM: &str = "name.ngram";
    pub const EMAIL: &str = "email";
    pub const EMAIL_RAW: &str = "email.raw";
    pub const EMAIL_NGRAM: &str = "email.ngram";
    pub const AVATAR: &str = "avatar";
    pub const STATUS: &str = "status";
    pub const CREATED_AT: &str = "created_at";
}

pub const LOWERCASE_NORMALIZER: &str = "lowercase_normalizer";
pub const FOLDING_FILTER: &str = "folding";
pub const EDGE_NGRAM_FILTER: &str = "edge_ngram_filter";
pub const TEXT_ANALYZER: &str = "folded_text";
pub const PREFIX_ANALYZER: &str = "edge_ngram_analyzer";

pub const EDGE_NGRAM_MIN: u32 = 2;
pub const EDGE_NGRAM_MAX: u32 = 20;

/// Analysis settings: normalizer, filters and the two analyzers
pub fn analysis_settings() -> Value {
    json!({
        "normalizer": {
            LOWERCASE_NORMALIZER: { "type": "custom", "filter": ["lowercase"] }
        },
        "filter": {
            FOLDING_FILTER: {
                "type": "asciifolding",
                "preserve_original": true
            },
            EDGE_NGRAM_FILTER: {
                "type": "edge_ngram",
                "min_gram": EDGE_NGRAM_MIN,
                "max_gram": EDGE_NGRAM_MAX
            }
        },
        "analyzer": {
            TEXT_ANALYZER: {
                "type": "custom",
                "tokenizer": "standard",
                "filter": ["lowercase", FOLDING_FILTER]
            },
            PREFIX_ANALYZER: {
                "type": "custom",
                "tokenizer": "standard",
                "filter": ["lowercase", FOLDING_FILTER, EDGE_NGRAM_FILTER]
            }
        }
    })
}

/// Analyzed text with an exact `raw` keyword and an edge-n-gram `ngram` subfield
fn searchable_text() -> Value {
    json!({
        "type": "text",
        "analyzer": TEXT_ANALYZER,
        "search_analyzer": TEXT_ANALYZER,
        "fields": {
            "raw": { "type": "keyword", "normalizer": LOWERCASE_NORMALIZER },
            "ngram": {
                "type": "text",
                "analyzer": PREFIX_ANALYZER,
                "search_analyzer": TEXT_ANALYZER
            }
        }
    })
}

/// Field mappings; contact fields are deliberately absent
pub fn mappings() -> Value {
    json!({
        "properties": {
            (fields::USER_ID): { "type": "keyword" },
            (fields::NAME): searchable_text(),
            (fields::EMAIL): searchable_text(),
            (fields::AVATAR): { "type": "keyword", "index": false },
            (fields::STATUS): { "type": "keyword" },
            (fields::CREATED_AT): { "type": "date" }
        }
    })
}

/// Full body for the create-index request
pub fn index_definition() -> Value {
    json!({
        "settings": { "analysis": analysis_settings() },
        "mappings": mappings()
    })
}
