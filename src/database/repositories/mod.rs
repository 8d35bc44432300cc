//! Database repositories module
//!
//! This module contains all repository implementations for data access

pub mod board;
pub mod category;
pub mod comment;
pub mod goal;
pub mod tg_link;
pub mod user;

// Re-export repositories
pub use board::BoardRepository;
pub use category::CategoryRepository;
pub use comment::CommentRepository;
pub use goal::{GoalFilters, GoalRepository};
pub use tg_link::TgLinkRepository;
pub use user::UserRepository;

/// Pagination, ordering and search parameters shared by list queries.
///
/// `order_sql` is an ORDER BY fragment already validated against a
/// per-endpoint whitelist; it is never raw client input.
#[derive(Debug, Clone)]
pub struct ListParams {
    pub limit: i64,
    pub offset: i64,
    pub order_sql: String,
    pub search: Option<String>,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            limit: 100,
            offset: 0,
            order_sql: "created DESC".to_string(),
            search: None,
        }
    }
}
