use crate::engine::{EngineConfig, OverflowPolicy};
use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for seine
///
/// Every section is optional; omitted values fall back to defaults so a
/// crawl can be started from nothing but a seed URL.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineSettings,
    #[serde(default)]
    pub fetcher: FetcherConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Engine behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct EngineSettings {
    /// Maximum number of concurrent extraction tasks
    #[serde(rename = "max-concurrency", default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Per-task extraction timeout in seconds
    #[serde(rename = "task-timeout-secs", default = "default_task_timeout_secs")]
    pub task_timeout_secs: u64,

    /// Cap on pending URLs waiting for a worker slot (unbounded if absent)
    #[serde(rename = "frontier-limit", default)]
    pub frontier_limit: Option<usize>,

    /// What to do with discoveries once the frontier is full
    #[serde(rename = "overflow-policy", default)]
    pub overflow_policy: OverflowPolicy,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            max_concurrency: default_max_concurrency(),
            task_timeout_secs: default_task_timeout_secs(),
            frontier_limit: None,
            overflow_policy: OverflowPolicy::default(),
        }
    }
}

impl EngineSettings {
    /// Converts the file-level settings into the engine's runtime knobs
    pub fn to_engine_config(&self) -> EngineConfig {
        EngineConfig {
            max_concurrency: self.max_concurrency,
            task_timeout: Duration::from_secs(self.task_timeout_secs),
            frontier_limit: self.frontier_limit,
            overflow_policy: self.overflow_policy,
        }
    }
}

/// HTTP fetcher configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FetcherConfig {
    /// User agent header sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Overall request timeout in seconds
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Connection establishment timeout in seconds
    #[serde(rename = "connect-timeout-secs", default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// URLs longer than this are declined without a request
    #[serde(rename = "max-url-length", default = "default_max_url_length")]
    pub max_url_length: usize,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            request_timeout_secs: default_request_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            max_url_length: default_max_url_length(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path", default = "default_database_path")]
    pub database_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

fn default_max_concurrency() -> usize {
    64
}

fn default_task_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("seine/{}", env!("CARGO_PKG_VERSION"))
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_max_url_length() -> usize {
    500
}

fn default_database_path() -> String {
    "./seine.db".to_string()
}
