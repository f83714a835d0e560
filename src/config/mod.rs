//! Configuration management.

mod file_config;

pub use file_config::{default_config_path, find_config_file, ConfigFileError, CONFIG_FILE_NAME};

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::utils::CitationStyle;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Base URLs of the metadata providers
    #[serde(default)]
    pub endpoints: EndpointsConfig,

    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,

    /// API keys for various services
    #[serde(default)]
    pub api_keys: ApiKeys,

    /// Citation defaults
    #[serde(default)]
    pub citation: CitationConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Provider base URLs, without trailing slash
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointsConfig {
    #[serde(default = "default_crossref")]
    pub crossref: String,

    #[serde(default = "default_openlibrary")]
    pub openlibrary: String,

    #[serde(default = "default_noembed")]
    pub noembed: String,

    #[serde(default = "default_semantic_scholar")]
    pub semantic_scholar: String,

    #[serde(default = "default_openalex")]
    pub openalex: String,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            crossref: default_crossref(),
            openlibrary: default_openlibrary(),
            noembed: default_noembed(),
            semantic_scholar: default_semantic_scholar(),
            openalex: default_openalex(),
        }
    }
}

impl EndpointsConfig {
    /// Point every provider at one base URL (mock servers, proxies)
    pub fn all_at(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            crossref: base.to_string(),
            openlibrary: base.to_string(),
            noembed: base.to_string(),
            semantic_scholar: format!("{}/graph/v1", base),
            openalex: base.to_string(),
        }
    }
}

fn default_crossref() -> String {
    "https://api.crossref.org".to_string()
}

fn default_openlibrary() -> String {
    "https://openlibrary.org".to_string()
}

fn default_noembed() -> String {
    "https://noembed.com".to_string()
}

fn default_semantic_scholar() -> String {
    "https://api.semanticscholar.org/graph/v1".to_string()
}

fn default_openalex() -> String {
    "https://api.openalex.org".to_string()
}

/// HTTP client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Whole-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Overrides the default `research-cite/<version>` user agent
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Contact address for the CrossRef polite pool
    #[serde(default)]
    pub mailto: Option<String>,

    /// Attempts per request; 1 disables retries
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay before the first retry, doubled on each further attempt
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
            user_agent: None,
            mailto: None,
            max_attempts: default_max_attempts(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_max_attempts() -> u32 {
    1
}

fn default_retry_delay_ms() -> u64 {
    500
}

/// API keys for external services
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiKeys {
    /// Semantic Scholar API key (optional, for higher rate limits)
    #[serde(default)]
    pub semantic_scholar: Option<String>,

    /// Email for the OpenAlex polite pool (optional)
    #[serde(default)]
    pub openalex_email: Option<String>,
}

impl Default for ApiKeys {
    fn default() -> Self {
        Self {
            semantic_scholar: std::env::var("SEMANTIC_SCHOLAR_API_KEY").ok(),
            openalex_email: std::env::var("OPENALEX_EMAIL").ok(),
        }
    }
}

/// Citation defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CitationConfig {
    #[serde(default)]
    pub default_style: CitationStyle,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// "json" for structured output, anything else for human-readable
    #[serde(default)]
    pub format: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Load configuration from a file, with `RESEARCH_CITE__*` environment overrides
///
/// Nested keys use a double underscore, e.g. `RESEARCH_CITE__HTTP__TIMEOUT_SECS=5`.
pub fn load_config(path: &Path) -> Result<Config, config::ConfigError> {
    layered(Some(path))
}

/// Defaults with `RESEARCH_CITE__*` environment overrides, for when no file exists
pub fn load_env_config() -> Result<Config, config::ConfigError> {
    layered(None)
}

fn layered(path: Option<&Path>) -> Result<Config, config::ConfigError> {
    let mut builder = config::Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path));
    }

    let settings = builder
        .add_source(
            config::Environment::with_prefix("RESEARCH_CITE")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}

/// Get the configuration from environment overrides, or plain defaults
/// when the overrides do not parse
pub fn get_config() -> Config {
    load_env_config().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Ignoring invalid RESEARCH_CITE__* overrides");
        Config::default()
    })
}
