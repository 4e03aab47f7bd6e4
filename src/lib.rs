//! Seine: a concurrent link-following crawl engine
//!
//! This crate implements a bounded-concurrency crawler: a worker pool that
//! fetches documents starting from a seed URL, hands each one to a pluggable
//! extractor, feeds newly discovered URLs back into the pool, and streams
//! every result to an append-only sink.

pub mod config;
pub mod engine;
pub mod extract;
pub mod sink;

use thiserror::Error;

/// Main error type for seine operations
///
/// Per-URL extraction failures never surface here; they are isolated inside
/// the worker tasks. These variants are the fatal conditions that abort a
/// crawl run (or prevent it from starting).
#[derive(Debug, Error)]
pub enum SeineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid seed: identifier is empty")]
    EmptySeed,

    #[error("Worker pool failure: {detail}")]
    Pool { detail: String },

    #[error("Frontier overflow: backlog exceeded {limit} pending URLs")]
    FrontierOverflow { limit: usize },

    #[error("Sink write failed for {url}: {source}")]
    SinkWrite {
        url: String,
        #[source]
        source: sink::SinkError,
    },

    #[error("Sink error: {0}")]
    Sink(#[from] sink::SinkError),

    #[error("Extractor error: {0}")]
    Extract(#[from] extract::ExtractError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias for seine operations
pub type Result<T> = std::result::Result<T, SeineError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use engine::{CrawlEngine, CrawlStats, EngineConfig, OverflowPolicy};
pub use extract::{Extractor, FetchResult};
pub use sink::ResultSink;
