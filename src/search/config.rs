//! Search configuration

use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;

/// How soon a write becomes visible to searches
///
/// Deserializes from `"false"`, `"wait_for"`, `"true"` or a plain boolean.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RefreshPolicy {
    /// Visible after the engine's next periodic refresh
    #[default]
    False,
    /// Block the write until a refresh has made it visible
    WaitFor,
    /// Force an immediate refresh
    True,
}

impl RefreshPolicy {
    /// Value of the `refresh` query parameter
    pub fn as_param(&self) -> &'static str {
        match self {
            RefreshPolicy::False => "false",
            RefreshPolicy::WaitFor => "wait_for",
            RefreshPolicy::True => "true",
        }
    }
}

impl<'de> Deserialize<'de> for RefreshPolicy {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Flag(bool),
            Name(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Flag(true) => Ok(RefreshPolicy::True),
            Raw::Flag(false) => Ok(RefreshPolicy::False),
            Raw::Name(name) => match name.as_str() {
                "false" => Ok(RefreshPolicy::False),
                "wait_for" => Ok(RefreshPolicy::WaitFor),
                "true" => Ok(RefreshPolicy::True),
                other => Err(de::Error::unknown_variant(
                    other,
                    &["false", "wait_for", "true"],
                )),
            },
        }
    }
}

/// Credentials sent with every engine request
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Credentials {
    ApiKey(String),
    Basic { username: String, password: String },
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::ApiKey(_) => f.write_str("ApiKey(***)"),
            Credentials::Basic { username, .. } => {
                write!(f, "Basic {{ username: {:?}, password: *** }}", username)
            }
        }
    }
}

/// Search service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Engine base URL, e.g. `http://localhost:9200`
    pub node: String,

    /// Index (or alias) holding user documents
    pub index: String,

    /// Optional credentials
    pub credentials: Option<Credentials>,

    /// Transport timeout for a single request
    pub request_timeout_secs: u64,

    /// Visibility policy for upserts
    pub refresh: RefreshPolicy,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            node: "http://localhost:9200".to_string(),
            index: "users".to_string(),
            credentials: None,
            request_timeout_secs: 10,
            refresh: RefreshPolicy::False,
        }
    }
}

/// Builder for SearchConfig
pub struct SearchConfigBuilder {
    config: SearchConfig,
}

impl SearchConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: SearchConfig::default(),
        }
    }

    pub fn node(mut self, node: impl Into<String>) -> Self {
        self.config.node = node.into();
        self
    }

    pub fn index(mut self, index: impl Into<String>) -> Self {
        self.config.index = index.into();
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.credentials = Some(Credentials::ApiKey(key.into()));
        self
    }

    pub fn basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.config.credentials = Some(Credentials::Basic {
            username: username.into(),
            password: password.into(),
        });
        self
    }

    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.config.request_timeout_secs = secs;
        self
    }

    pub fn refresh(mut self, refresh: RefreshPolicy) -> Self {
        self.config.refresh = refresh;
        self
    }

    pub fn build(self) -> SearchConfig {
        self.config
    }
}

impl Default for SearchConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
