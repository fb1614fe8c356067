use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - OMDb API key is set and the timeout is not 0
/// - Server port is not 0
/// - Watchlist storage key is not empty
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.omdb.api_key.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "omdb.api_key cannot be empty".to_string(),
        ));
    }

    if config.omdb.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "omdb.timeout_secs cannot be 0".to_string(),
        ));
    }

    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.storage.watchlist_key.is_empty() {
        return Err(ConfigError::ValidationError(
            "storage.watchlist_key cannot be empty".to_string(),
        ));
    }

    Ok(())
}
