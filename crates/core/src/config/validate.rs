use super::{types::Config, ConfigError};

/// Validate configuration shared by all binaries.
/// Currently validates:
/// - Server port is not 0
/// - min_movies is not 0
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.sync.min_movies == 0 {
        return Err(ConfigError::ValidationError(
            "sync.min_movies cannot be 0".to_string(),
        ));
    }

    Ok(())
}

/// Extra validation for the synchronizer entrypoint, which cannot run
/// without a TMDB key. The API server can.
pub fn validate_sync_config(config: &Config) -> Result<(), ConfigError> {
    validate_config(config)?;

    match &config.tmdb {
        Some(tmdb) if !tmdb.api_key.is_empty() => Ok(()),
        _ => Err(ConfigError::ValidationError(
            "tmdb.api_key is required for synchronization".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config_from_str;

    #[test]
    fn test_validate_valid_config() {
        let config = load_config_from_str("").unwrap();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_port_zero_fails() {
        let config = load_config_from_str("[server]\nport = 0").unwrap();
        let result = validate_config(&config);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validate_min_movies_zero_fails() {
        let config = load_config_from_str("[sync]\nmin_movies = 0").unwrap();
        let result = validate_config(&config);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validate_sync_requires_api_key() {
        let config = load_config_from_str("").unwrap();
        assert!(validate_config(&config).is_ok());
        assert!(matches!(
            validate_sync_config(&config),
            Err(ConfigError::ValidationError(_))
        ));

        let config = load_config_from_str("[tmdb]\napi_key = \"key\"").unwrap();
        assert!(validate_sync_config(&config).is_ok());
    }
}
