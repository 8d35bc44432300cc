//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use crate::utils::errors::{GoalboardError, Result};

use super::Settings;

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_server_config(&settings.server)?;
    validate_database_config(&settings.database)?;
    validate_bot_config(&settings.bot)?;
    validate_auth_config(&settings.auth)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

/// Validate HTTP server configuration
fn validate_server_config(config: &super::ServerConfig) -> Result<()> {
    if config.host.is_empty() {
        return Err(GoalboardError::Config("Server host is required".to_string()));
    }

    if config.port == 0 {
        return Err(GoalboardError::Config(
            "Server port must be greater than 0".to_string(),
        ));
    }

    Ok(())
}

/// Validate database configuration
fn validate_database_config(config: &super::DatabaseConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(GoalboardError::Config("Database URL is required".to_string()));
    }

    if config.max_connections == 0 {
        return Err(GoalboardError::Config(
            "Max connections must be greater than 0".to_string(),
        ));
    }

    if config.min_connections > config.max_connections {
        return Err(GoalboardError::Config(
            "Min connections cannot be greater than max connections".to_string(),
        ));
    }

    Ok(())
}

/// Validate bot configuration
fn validate_bot_config(config: &super::BotConfig) -> Result<()> {
    if config.token.is_empty() {
        return Err(GoalboardError::Config("Bot token is required".to_string()));
    }

    url::Url::parse(&config.api_url)
        .map_err(|e| GoalboardError::Config(format!("Invalid bot API URL: {e}")))?;

    if config.poll_timeout_seconds == 0 {
        return Err(GoalboardError::Config(
            "Bot poll timeout must be greater than 0".to_string(),
        ));
    }

    Ok(())
}

/// Validate session token configuration
fn validate_auth_config(config: &super::AuthConfig) -> Result<()> {
    if config.token_secret.is_empty() {
        return Err(GoalboardError::Config("Token secret is required".to_string()));
    }

    if config.token_ttl_hours <= 0 {
        return Err(GoalboardError::Config(
            "Token TTL must be greater than 0".to_string(),
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(GoalboardError::Config("Log level is required".to_string()));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(GoalboardError::Config(format!(
            "Invalid log level: {}. Valid levels: {:?}",
            config.level, valid_levels
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;

    fn configured() -> Settings {
        let mut settings = Settings::default();
        settings.bot.token = "12345:test_token".to_string();
        settings.auth.token_secret = "super-secret-signing-key".to_string();
        settings
    }

    #[test]
    fn test_valid_settings_pass() {
        assert!(validate_settings(&configured()).is_ok());
    }

    #[test]
    fn test_missing_bot_token_rejected() {
        let mut settings = configured();
        settings.bot.token = String::new();
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_bad_api_url_rejected() {
        let mut settings = configured();
        settings.bot.api_url = "not a url".to_string();
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_bad_log_level_rejected() {
        let mut settings = configured();
        settings.logging.level = "verbose".to_string();
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_pool_bounds_rejected() {
        let mut settings = configured();
        settings.database.min_connections = 20;
        assert!(validate_settings(&settings).is_err());
    }
}
