//! Configuration module for seine
//!
//! Handles loading, parsing, and validating TOML configuration files.
//! Every setting has a default, so configuration is optional end to end.

mod parser;
mod types;
mod validation;

pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use types::{Config, EngineSettings, FetcherConfig, OutputConfig};
