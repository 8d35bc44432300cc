//! Board repository implementation
//!
//! Holds the two board-level transactions that must be all-or-nothing:
//! the sharing update and the cascade soft-delete.

use chrono::Utc;
use sqlx::PgPool;

use crate::models::board::{Board, BoardParticipant, Role, SharingDiff};
use crate::models::goal::GoalStatus;
use crate::utils::errors::GoalboardError;

use super::ListParams;

#[derive(Debug, Clone)]
pub struct BoardRepository {
    pool: PgPool,
}

impl BoardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a board together with its owner participant row.
    ///
    /// The two inserts share a transaction so a board can never exist
    /// without an owner.
    pub async fn create_with_owner(
        &self,
        title: &str,
        owner_user_id: i64,
    ) -> Result<Board, GoalboardError> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let board = sqlx::query_as::<_, Board>(
            r#"
            INSERT INTO boards (title, is_deleted, created, updated)
            VALUES ($1, FALSE, $2, $2)
            RETURNING id, title, is_deleted, created, updated
            "#,
        )
        .bind(title)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO board_participants (board_id, user_id, role, created, updated)
            VALUES ($1, $2, $3, $4, $4)
            "#,
        )
        .bind(board.id)
        .bind(owner_user_id)
        .bind(Role::Owner)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(board)
    }

    /// Find a board visible to the given user (participant, not deleted)
    pub async fn find_for_participant(
        &self,
        board_id: i64,
        user_id: i64,
    ) -> Result<Option<Board>, GoalboardError> {
        let board = sqlx::query_as::<_, Board>(
            r#"
            SELECT b.id, b.title, b.is_deleted, b.created, b.updated
            FROM boards b
            INNER JOIN board_participants bp ON bp.board_id = b.id
            WHERE b.id = $1 AND bp.user_id = $2 AND b.is_deleted = FALSE
            "#,
        )
        .bind(board_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(board)
    }

    /// List boards the user participates in
    pub async fn list_for_participant(
        &self,
        user_id: i64,
        params: &ListParams,
    ) -> Result<Vec<Board>, GoalboardError> {
        let sql = format!(
            r#"
            SELECT b.id, b.title, b.is_deleted, b.created, b.updated
            FROM boards b
            INNER JOIN board_participants bp ON bp.board_id = b.id
            WHERE bp.user_id = $1 AND b.is_deleted = FALSE
              AND ($2::text IS NULL OR b.title ILIKE '%' || $2 || '%')
            ORDER BY b.{}
            LIMIT $3 OFFSET $4
            "#,
            params.order_sql
        );

        let boards = sqlx::query_as::<_, Board>(&sql)
            .bind(user_id)
            .bind(params.search.as_deref())
            .bind(params.limit)
            .bind(params.offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(boards)
    }

    /// Count boards the user participates in
    pub async fn count_for_participant(
        &self,
        user_id: i64,
        params: &ListParams,
    ) -> Result<i64, GoalboardError> {
        let count: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM boards b
            INNER JOIN board_participants bp ON bp.board_id = b.id
            WHERE bp.user_id = $1 AND b.is_deleted = FALSE
              AND ($2::text IS NULL OR b.title ILIKE '%' || $2 || '%')
            "#,
        )
        .bind(user_id)
        .bind(params.search.as_deref())
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0)
    }

    /// Participant rows of a board, owner first
    pub async fn participants(&self, board_id: i64) -> Result<Vec<BoardParticipant>, GoalboardError> {
        let participants = sqlx::query_as::<_, BoardParticipant>(
            r#"
            SELECT id, board_id, user_id, role, created, updated
            FROM board_participants
            WHERE board_id = $1
            ORDER BY role ASC, created ASC
            "#,
        )
        .bind(board_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(participants)
    }

    /// Whether the board exists and is not soft-deleted
    pub async fn exists_alive(&self, board_id: i64) -> Result<bool, GoalboardError> {
        let exists: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM boards WHERE id = $1 AND is_deleted = FALSE)",
        )
        .bind(board_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists.0)
    }

    /// Role of the given user on the board, if any
    pub async fn role_of(&self, board_id: i64, user_id: i64) -> Result<Option<Role>, GoalboardError> {
        let role: Option<(Role,)> = sqlx::query_as(
            "SELECT role FROM board_participants WHERE board_id = $1 AND user_id = $2",
        )
        .bind(board_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(role.map(|r| r.0))
    }

    /// Apply a sharing update as a single transaction.
    ///
    /// Removals and in-place role updates are guarded with `role <> owner`
    /// so the owner row cannot be touched through this path even if the
    /// diff was computed against stale data.
    pub async fn apply_sharing(
        &self,
        board_id: i64,
        title: Option<&str>,
        diff: &SharingDiff,
    ) -> Result<(), GoalboardError> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        for user_id in &diff.removals {
            sqlx::query(
                "DELETE FROM board_participants WHERE board_id = $1 AND user_id = $2 AND role <> $3",
            )
            .bind(board_id)
            .bind(user_id)
            .bind(Role::Owner)
            .execute(&mut *tx)
            .await?;
        }

        for spec in &diff.updates {
            sqlx::query(
                r#"
                UPDATE board_participants
                SET role = $3, updated = $4
                WHERE board_id = $1 AND user_id = $2 AND role <> $5
                "#,
            )
            .bind(board_id)
            .bind(spec.user_id)
            .bind(spec.role)
            .bind(now)
            .bind(Role::Owner)
            .execute(&mut *tx)
            .await?;
        }

        for spec in &diff.inserts {
            sqlx::query(
                r#"
                INSERT INTO board_participants (board_id, user_id, role, created, updated)
                VALUES ($1, $2, $3, $4, $4)
                "#,
            )
            .bind(board_id)
            .bind(spec.user_id)
            .bind(spec.role)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }

        if let Some(title) = title {
            sqlx::query("UPDATE boards SET title = $2, updated = $3 WHERE id = $1")
                .bind(board_id)
                .bind(title)
                .bind(now)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Cascade soft-delete: the board and its categories are marked
    /// deleted, every goal under those categories is archived. One
    /// transaction; concurrent readers never observe a partial cascade.
    pub async fn soft_delete(&self, board_id: i64) -> Result<(), GoalboardError> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE boards SET is_deleted = TRUE, updated = $2 WHERE id = $1")
            .bind(board_id)
            .bind(now)
            .execute(&mut *tx)
            .await?;

        sqlx::query("UPDATE goal_categories SET is_deleted = TRUE, updated = $2 WHERE board_id = $1")
            .bind(board_id)
            .bind(now)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            r#"
            UPDATE goals
            SET status = $2, updated = $3
            WHERE category_id IN (SELECT id FROM goal_categories WHERE board_id = $1)
            "#,
        )
        .bind(board_id)
        .bind(GoalStatus::Archived)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }
}
