//! Goal comment model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct GoalComment {
    pub id: i64,
    pub text: String,
    pub user_id: i64,
    pub goal_id: i64,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCommentRequest {
    pub text: String,
    pub goal_id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCommentRequest {
    pub text: String,
}
