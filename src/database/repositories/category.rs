//! Goal category repository implementation

use chrono::Utc;
use sqlx::PgPool;

use crate::models::category::GoalCategory;
use crate::models::goal::GoalStatus;
use crate::utils::errors::GoalboardError;

use super::ListParams;

#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: PgPool,
}

impl CategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new category on a board
    pub async fn create(
        &self,
        title: &str,
        board_id: i64,
        user_id: i64,
    ) -> Result<GoalCategory, GoalboardError> {
        let now = Utc::now();
        let category = sqlx::query_as::<_, GoalCategory>(
            r#"
            INSERT INTO goal_categories (title, user_id, board_id, is_deleted, created, updated)
            VALUES ($1, $2, $3, FALSE, $4, $4)
            RETURNING id, title, user_id, board_id, is_deleted, created, updated
            "#,
        )
        .bind(title)
        .bind(user_id)
        .bind(board_id)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(category)
    }

    /// Find a category visible to the given user: the user participates in
    /// its board and neither the category nor the board is soft-deleted.
    pub async fn find_visible(
        &self,
        category_id: i64,
        user_id: i64,
    ) -> Result<Option<GoalCategory>, GoalboardError> {
        let category = sqlx::query_as::<_, GoalCategory>(
            r#"
            SELECT c.id, c.title, c.user_id, c.board_id, c.is_deleted, c.created, c.updated
            FROM goal_categories c
            INNER JOIN boards b ON b.id = c.board_id
            INNER JOIN board_participants bp ON bp.board_id = b.id
            WHERE c.id = $1 AND bp.user_id = $2
              AND c.is_deleted = FALSE AND b.is_deleted = FALSE
            "#,
        )
        .bind(category_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    /// List categories visible to the user, optionally restricted to one board
    pub async fn list_visible(
        &self,
        user_id: i64,
        board_id: Option<i64>,
        params: &ListParams,
    ) -> Result<Vec<GoalCategory>, GoalboardError> {
        let sql = format!(
            r#"
            SELECT c.id, c.title, c.user_id, c.board_id, c.is_deleted, c.created, c.updated
            FROM goal_categories c
            INNER JOIN boards b ON b.id = c.board_id
            INNER JOIN board_participants bp ON bp.board_id = b.id
            WHERE bp.user_id = $1
              AND c.is_deleted = FALSE AND b.is_deleted = FALSE
              AND ($2::bigint IS NULL OR c.board_id = $2)
              AND ($3::text IS NULL OR c.title ILIKE '%' || $3 || '%')
            ORDER BY c.{}
            LIMIT $4 OFFSET $5
            "#,
            params.order_sql
        );

        let categories = sqlx::query_as::<_, GoalCategory>(&sql)
            .bind(user_id)
            .bind(board_id)
            .bind(params.search.as_deref())
            .bind(params.limit)
            .bind(params.offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(categories)
    }

    /// Count categories visible to the user
    pub async fn count_visible(
        &self,
        user_id: i64,
        board_id: Option<i64>,
        params: &ListParams,
    ) -> Result<i64, GoalboardError> {
        let count: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM goal_categories c
            INNER JOIN boards b ON b.id = c.board_id
            INNER JOIN board_participants bp ON bp.board_id = b.id
            WHERE bp.user_id = $1
              AND c.is_deleted = FALSE AND b.is_deleted = FALSE
              AND ($2::bigint IS NULL OR c.board_id = $2)
              AND ($3::text IS NULL OR c.title ILIKE '%' || $3 || '%')
            "#,
        )
        .bind(user_id)
        .bind(board_id)
        .bind(params.search.as_deref())
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0)
    }

    /// Update a category title
    pub async fn update_title(
        &self,
        category_id: i64,
        title: &str,
    ) -> Result<GoalCategory, GoalboardError> {
        let category = sqlx::query_as::<_, GoalCategory>(
            r#"
            UPDATE goal_categories
            SET title = $2, updated = $3
            WHERE id = $1
            RETURNING id, title, user_id, board_id, is_deleted, created, updated
            "#,
        )
        .bind(category_id)
        .bind(title)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(category)
    }

    /// Cascade soft-delete: mark the category deleted and archive all of
    /// its goals in one transaction.
    pub async fn soft_delete(&self, category_id: i64) -> Result<(), GoalboardError> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE goal_categories SET is_deleted = TRUE, updated = $2 WHERE id = $1")
            .bind(category_id)
            .bind(now)
            .execute(&mut *tx)
            .await?;

        sqlx::query("UPDATE goals SET status = $2, updated = $3 WHERE category_id = $1")
            .bind(category_id)
            .bind(GoalStatus::Archived)
            .bind(now)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Resolve the board a category belongs to, honoring soft-delete
    /// visibility up the chain
    pub async fn board_id_of(&self, category_id: i64) -> Result<Option<i64>, GoalboardError> {
        let board_id: Option<(i64,)> = sqlx::query_as(
            r#"
            SELECT c.board_id
            FROM goal_categories c
            INNER JOIN boards b ON b.id = c.board_id
            WHERE c.id = $1 AND c.is_deleted = FALSE AND b.is_deleted = FALSE
            "#,
        )
        .bind(category_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(board_id.map(|r| r.0))
    }
}
