//! Error handling for goalboard
//!
//! This module defines the main error types used throughout the application
//! and provides a unified error handling strategy.

use thiserror::Error;

/// Main error type for the goalboard application
#[derive(Error, Debug)]
pub enum GoalboardError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Telegram API error: {0}")]
    Telegram(#[from] TelegramError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Authentication required")]
    AuthenticationRequired,

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Not found")]
    NotFound,

    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),
}

/// Telegram Bot API specific errors
#[derive(Error, Debug)]
pub enum TelegramError {
    #[error("Telegram API request failed: {0}")]
    RequestFailed(String),

    #[error("Telegram API timeout")]
    Timeout,

    #[error("Invalid Telegram response: {0}")]
    InvalidResponse(String),

    #[error("Telegram API unavailable")]
    ServiceUnavailable,
}

/// Result type alias for goalboard operations
pub type Result<T> = std::result::Result<T, GoalboardError>;

impl GoalboardError {
    /// Whether the bot poller may keep running after hitting this error.
    ///
    /// Transport-level failures against the Telegram API are transient;
    /// everything else aborts the current poll iteration and is surfaced.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            GoalboardError::Telegram(_) | GoalboardError::Http(_) | GoalboardError::Io(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_telegram_errors_are_recoverable() {
        assert!(GoalboardError::Telegram(TelegramError::Timeout).is_recoverable());
        assert!(!GoalboardError::NotFound.is_recoverable());
        assert!(!GoalboardError::Validation("bad".to_string()).is_recoverable());
    }
}
