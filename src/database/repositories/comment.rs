//! Goal comment repository implementation

use chrono::Utc;
use sqlx::PgPool;

use crate::models::comment::GoalComment;
use crate::models::goal::GoalStatus;
use crate::utils::errors::GoalboardError;

use super::ListParams;

#[derive(Debug, Clone)]
pub struct CommentRepository {
    pool: PgPool,
}

impl CommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a comment on a goal
    pub async fn create(
        &self,
        text: &str,
        goal_id: i64,
        user_id: i64,
    ) -> Result<GoalComment, GoalboardError> {
        let now = Utc::now();
        let comment = sqlx::query_as::<_, GoalComment>(
            r#"
            INSERT INTO goal_comments (text, user_id, goal_id, created, updated)
            VALUES ($1, $2, $3, $4, $4)
            RETURNING id, text, user_id, goal_id, created, updated
            "#,
        )
        .bind(text)
        .bind(user_id)
        .bind(goal_id)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(comment)
    }

    /// Find a comment visible to the given user: board participant and the
    /// whole parent chain alive (goal not archived, nothing soft-deleted).
    pub async fn find_visible(
        &self,
        comment_id: i64,
        user_id: i64,
    ) -> Result<Option<GoalComment>, GoalboardError> {
        let comment = sqlx::query_as::<_, GoalComment>(
            r#"
            SELECT gc.id, gc.text, gc.user_id, gc.goal_id, gc.created, gc.updated
            FROM goal_comments gc
            INNER JOIN goals g ON g.id = gc.goal_id
            INNER JOIN goal_categories c ON c.id = g.category_id
            INNER JOIN boards b ON b.id = c.board_id
            INNER JOIN board_participants bp ON bp.board_id = b.id
            WHERE gc.id = $1 AND bp.user_id = $2
              AND g.status <> $3
              AND c.is_deleted = FALSE AND b.is_deleted = FALSE
            "#,
        )
        .bind(comment_id)
        .bind(user_id)
        .bind(GoalStatus::Archived)
        .fetch_optional(&self.pool)
        .await?;

        Ok(comment)
    }

    /// List comments of one goal, newest first by default
    pub async fn list_for_goal(
        &self,
        goal_id: i64,
        user_id: i64,
        params: &ListParams,
    ) -> Result<Vec<GoalComment>, GoalboardError> {
        let sql = format!(
            r#"
            SELECT gc.id, gc.text, gc.user_id, gc.goal_id, gc.created, gc.updated
            FROM goal_comments gc
            INNER JOIN goals g ON g.id = gc.goal_id
            INNER JOIN goal_categories c ON c.id = g.category_id
            INNER JOIN boards b ON b.id = c.board_id
            INNER JOIN board_participants bp ON bp.board_id = b.id
            WHERE gc.goal_id = $1 AND bp.user_id = $2
              AND g.status <> $3
              AND c.is_deleted = FALSE AND b.is_deleted = FALSE
            ORDER BY gc.{}
            LIMIT $4 OFFSET $5
            "#,
            params.order_sql
        );

        let comments = sqlx::query_as::<_, GoalComment>(&sql)
            .bind(goal_id)
            .bind(user_id)
            .bind(GoalStatus::Archived)
            .bind(params.limit)
            .bind(params.offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(comments)
    }

    /// Count comments of one goal visible to the user
    pub async fn count_for_goal(&self, goal_id: i64, user_id: i64) -> Result<i64, GoalboardError> {
        let count: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM goal_comments gc
            INNER JOIN goals g ON g.id = gc.goal_id
            INNER JOIN goal_categories c ON c.id = g.category_id
            INNER JOIN boards b ON b.id = c.board_id
            INNER JOIN board_participants bp ON bp.board_id = b.id
            WHERE gc.goal_id = $1 AND bp.user_id = $2
              AND g.status <> $3
              AND c.is_deleted = FALSE AND b.is_deleted = FALSE
            "#,
        )
        .bind(goal_id)
        .bind(user_id)
        .bind(GoalStatus::Archived)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0)
    }

    /// Update comment text
    pub async fn update_text(&self, comment_id: i64, text: &str) -> Result<GoalComment, GoalboardError> {
        let comment = sqlx::query_as::<_, GoalComment>(
            r#"
            UPDATE goal_comments
            SET text = $2, updated = $3
            WHERE id = $1
            RETURNING id, text, user_id, goal_id, created, updated
            "#,
        )
        .bind(comment_id)
        .bind(text)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(comment)
    }

    /// Delete a comment. Comments carry no soft-delete flag and nothing
    /// cascades from them, so this is a hard delete.
    pub async fn delete(&self, comment_id: i64) -> Result<(), GoalboardError> {
        sqlx::query("DELETE FROM goal_comments WHERE id = $1")
            .bind(comment_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Resolve the board a comment belongs to, honoring visibility up the
    /// chain
    pub async fn board_id_of(&self, comment_id: i64) -> Result<Option<i64>, GoalboardError> {
        let board_id: Option<(i64,)> = sqlx::query_as(
            r#"
            SELECT c.board_id
            FROM goal_comments gc
            INNER JOIN goals g ON g.id = gc.goal_id
            INNER JOIN goal_categories c ON c.id = g.category_id
            INNER JOIN boards b ON b.id = c.board_id
            WHERE gc.id = $1 AND g.status <> $2
              AND c.is_deleted = FALSE AND b.is_deleted = FALSE
            "#,
        )
        .bind(comment_id)
        .bind(GoalStatus::Archived)
        .fetch_optional(&self.pool)
        .await?;

        Ok(board_id.map(|r| r.0))
    }
}
