use crate::config::types::{Config, EngineSettings, FetcherConfig, OutputConfig};
use crate::ConfigError;

/// Upper bound on the worker ceiling; far above anything useful, but keeps
/// a typo'd value from allocating a runaway pool
const MAX_CONCURRENCY_LIMIT: usize = 10_000;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_engine_settings(&config.engine)?;
    validate_fetcher_config(&config.fetcher)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates engine settings
fn validate_engine_settings(settings: &EngineSettings) -> Result<(), ConfigError> {
    if settings.max_concurrency < 1 || settings.max_concurrency > MAX_CONCURRENCY_LIMIT {
        return Err(ConfigError::Validation(format!(
            "max-concurrency must be between 1 and {}, got {}",
            MAX_CONCURRENCY_LIMIT, settings.max_concurrency
        )));
    }

    if settings.task_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "task-timeout-secs must be >= 1, got {}",
            settings.task_timeout_secs
        )));
    }

    if let Some(limit) = settings.frontier_limit {
        if limit < 1 {
            return Err(ConfigError::Validation(format!(
                "frontier-limit must be >= 1 when set, got {}",
                limit
            )));
        }
    }

    Ok(())
}

/// Validates fetcher configuration
fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "request-timeout-secs must be >= 1, got {}",
            config.request_timeout_secs
        )));
    }

    if config.connect_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "connect-timeout-secs must be >= 1, got {}",
            config.connect_timeout_secs
        )));
    }

    if config.max_url_length < 16 {
        return Err(ConfigError::Validation(format!(
            "max-url-length must be >= 16, got {}",
            config.max_url_length
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database-path cannot be empty".to_string(),
        ));
    }

    Ok(())
}
