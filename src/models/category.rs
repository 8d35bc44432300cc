//! Goal category model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct GoalCategory {
    pub id: i64,
    pub title: String,
    pub user_id: i64,
    pub board_id: i64,
    pub is_deleted: bool,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCategoryRequest {
    pub title: String,
    pub board_id: i64,
}

/// The board of a category is immutable after creation; only the title
/// is writable.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCategoryRequest {
    pub title: Option<String>,
}
