//! goalboard backend
//!
//! A goal-tracking backend: users organize shared boards of goal
//! categories, categories hold goals, goals accept comments. Access is
//! governed by per-board participant roles, deletion cascades as
//! soft-delete/archive down the tree, and a Telegram bot links chats to
//! accounts through one-time verification codes.

pub mod api;
pub mod bot;
pub mod config;
pub mod database;
pub mod models;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{GoalboardError, Result};

// Re-export main components for easy access
pub use bot::{BotPoller, TelegramClient};
pub use database::DatabaseService;
pub use services::ServiceFactory;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
