//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging
//! utilities for the goalboard application.

use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;
use crate::utils::errors::Result;

/// Initialize logging based on configuration.
///
/// The returned guard must be kept alive for the lifetime of the process,
/// otherwise buffered file output is lost.
pub fn init_logging(config: &LoggingConfig) -> Result<WorkerGuard> {
    let file_appender = tracing_appender::rolling::daily(&config.file_path, "goalboard.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .with(tracing_subscriber::fmt::layer().with_writer(non_blocking))
        .init();

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log user actions with structured data
pub fn log_user_action(user_id: i64, action: &str, details: Option<&str>) {
    info!(
        user_id = user_id,
        action = action,
        details = details,
        "User action performed"
    );
}

/// Log board-level events (creation, sharing changes, cascade deletes)
pub fn log_board_event(board_id: i64, user_id: i64, event: &str) {
    info!(
        board_id = board_id,
        user_id = user_id,
        event = event,
        "Board event occurred"
    );
}

/// Log bot linking events
pub fn log_link_event(chat_id: i64, event: &str, user_id: Option<i64>) {
    info!(
        chat_id = chat_id,
        user_id = user_id,
        event = event,
        "Link event"
    );
}
