use crate::search::{Credentials, RefreshPolicy, SearchConfig};
use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Search engine configuration
    pub search: SearchSettings,

    /// Session/cache store configuration
    #[serde(default)]
    pub cache: CacheConfig,

    /// Messaging configuration
    #[serde(default)]
    pub messaging: MessagingConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Load configuration from file and environment
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_with(environment())
    }

    fn load_with(environment: config::Environment) -> Result<Self, config::ConfigError> {
        let config_path =
            std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config/default.toml".to_string());

        config::Config::builder()
            // Start with default values
            .add_source(config::File::from_str(
                include_str!("../config/default.toml"),
                config::FileFormat::Toml,
            ))
            // Override with config file if it exists
            .add_source(config::File::with_name(&config_path).required(false))
            // Override with environment variables
            .add_source(environment)
            .build()?
            .try_deserialize()
    }
}

/// `UDS_<SECTION>__<KEY>`, e.g. `UDS_SEARCH__NODE`
fn environment() -> config::Environment {
    config::Environment::with_prefix("UDS")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchSettings {
    /// Elasticsearch node URL
    pub node: String,

    /// Index or alias holding user documents
    #[serde(default = "default_index")]
    pub index: String,

    /// Environment variable holding an API key
    pub api_key_env: Option<String>,

    /// Basic auth username (alternative to an API key)
    pub username: Option<String>,

    /// Environment variable holding the basic auth password
    pub password_env: Option<String>,

    /// Request timeout (seconds)
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Refresh policy for upserts
    #[serde(default)]
    pub refresh: RefreshPolicy,
}

impl SearchSettings {
    /// Resolve secrets from the environment into a [`SearchConfig`]
    ///
    /// An API key wins over basic auth when both are configured.
    pub fn to_search_config(&self) -> SearchConfig {
        let api_key = self
            .api_key_env
            .as_deref()
            .and_then(|var| std::env::var(var).ok())
            .filter(|key| !key.is_empty());

        let credentials = match (api_key, &self.username) {
            (Some(key), _) => Some(Credentials::ApiKey(key)),
            (None, Some(username)) => {
                let password = self
                    .password_env
                    .as_deref()
                    .and_then(|var| std::env::var(var).ok())
                    .unwrap_or_default();
                Some(Credentials::Basic {
                    username: username.clone(),
                    password,
                })
            }
            (None, None) => None,
        };

        SearchConfig {
            node: self.node.clone(),
            index: self.index.clone(),
            credentials,
            request_timeout_secs: self.request_timeout_secs,
            refresh: self.refresh,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Redis connection string; in-memory store when unset
    pub redis_url: Option<String>,

    /// Prefix for every session key
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            redis_url: None,
            key_prefix: default_key_prefix(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagingConfig {
    /// Redis URL for publish/subscribe; index sync is disabled when unset
    pub pubsub_url: Option<String>,

    /// Channel carrying user events
    #[serde(default = "default_user_events_channel")]
    pub user_events_channel: String,

    /// NATS URL for the durable exchange publisher
    pub nats_url: Option<String>,

    /// Exchange (subject prefix) for published messages
    #[serde(default = "default_exchange")]
    pub exchange: String,
}

impl Default for MessagingConfig {
    fn default() -> Self {
        Self {
            pubsub_url: None,
            user_events_channel: default_user_events_channel(),
            nats_url: None,
            exchange: default_exchange(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logs: false,
        }
    }
}

// Default value functions
fn default_index() -> String {
    "users".to_string()
}

fn default_request_timeout() -> u64 {
    10
}

fn default_key_prefix() -> String {
    "uds".to_string()
}

fn default_user_events_channel() -> String {
    "users.events".to_string()
}

fn default_exchange() -> String {
    "meta_social_exchange".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}
