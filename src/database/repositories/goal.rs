//! Goal repository implementation

use chrono::{NaiveDate, Utc};
use sqlx::PgPool;

use crate::models::goal::{CreateGoalRequest, Goal, GoalPriority, GoalStatus, UpdateGoalRequest};
use crate::utils::errors::GoalboardError;

use super::ListParams;

/// Optional filters for the goal list endpoint
#[derive(Debug, Clone, Default)]
pub struct GoalFilters {
    pub categories: Option<Vec<i64>>,
    pub priorities: Option<Vec<i16>>,
    pub due_date_gte: Option<NaiveDate>,
    pub due_date_lte: Option<NaiveDate>,
}

#[derive(Debug, Clone)]
pub struct GoalRepository {
    pool: PgPool,
}

impl GoalRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new goal
    pub async fn create(&self, request: &CreateGoalRequest, user_id: i64) -> Result<Goal, GoalboardError> {
        let now = Utc::now();
        let goal = sqlx::query_as::<_, Goal>(
            r#"
            INSERT INTO goals (title, description, due_date, status, priority, user_id, category_id, created, updated)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
            RETURNING id, title, description, due_date, status, priority, user_id, category_id, created, updated
            "#,
        )
        .bind(&request.title)
        .bind(&request.description)
        .bind(request.due_date)
        .bind(request.status.unwrap_or(GoalStatus::Todo))
        .bind(request.priority.unwrap_or(GoalPriority::Low))
        .bind(user_id)
        .bind(request.category_id)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(goal)
    }

    /// Find a goal visible to the given user: board participant, not
    /// archived, and nothing soft-deleted up the chain.
    pub async fn find_visible(&self, goal_id: i64, user_id: i64) -> Result<Option<Goal>, GoalboardError> {
        let goal = sqlx::query_as::<_, Goal>(
            r#"
            SELECT g.id, g.title, g.description, g.due_date, g.status, g.priority,
                   g.user_id, g.category_id, g.created, g.updated
            FROM goals g
            INNER JOIN goal_categories c ON c.id = g.category_id
            INNER JOIN boards b ON b.id = c.board_id
            INNER JOIN board_participants bp ON bp.board_id = b.id
            WHERE g.id = $1 AND bp.user_id = $2
              AND g.status <> $3
              AND c.is_deleted = FALSE AND b.is_deleted = FALSE
            "#,
        )
        .bind(goal_id)
        .bind(user_id)
        .bind(GoalStatus::Archived)
        .fetch_optional(&self.pool)
        .await?;

        Ok(goal)
    }

    /// List goals visible to the user with search, filters, ordering and
    /// pagination
    pub async fn list_visible(
        &self,
        user_id: i64,
        params: &ListParams,
        filters: &GoalFilters,
    ) -> Result<Vec<Goal>, GoalboardError> {
        let sql = format!(
            r#"
            SELECT g.id, g.title, g.description, g.due_date, g.status, g.priority,
                   g.user_id, g.category_id, g.created, g.updated
            FROM goals g
            INNER JOIN goal_categories c ON c.id = g.category_id
            INNER JOIN boards b ON b.id = c.board_id
            INNER JOIN board_participants bp ON bp.board_id = b.id
            WHERE bp.user_id = $1
              AND g.status <> $2
              AND c.is_deleted = FALSE AND b.is_deleted = FALSE
              AND ($3::text IS NULL OR g.title ILIKE '%' || $3 || '%' OR g.description ILIKE '%' || $3 || '%')
              AND ($4::bigint[] IS NULL OR g.category_id = ANY($4))
              AND ($5::smallint[] IS NULL OR g.priority = ANY($5))
              AND ($6::date IS NULL OR g.due_date >= $6)
              AND ($7::date IS NULL OR g.due_date <= $7)
            ORDER BY g.{}
            LIMIT $8 OFFSET $9
            "#,
            params.order_sql
        );

        let goals = sqlx::query_as::<_, Goal>(&sql)
            .bind(user_id)
            .bind(GoalStatus::Archived)
            .bind(params.search.as_deref())
            .bind(filters.categories.as_deref())
            .bind(filters.priorities.as_deref())
            .bind(filters.due_date_gte)
            .bind(filters.due_date_lte)
            .bind(params.limit)
            .bind(params.offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(goals)
    }

    /// Count goals visible to the user under the same filters
    pub async fn count_visible(
        &self,
        user_id: i64,
        params: &ListParams,
        filters: &GoalFilters,
    ) -> Result<i64, GoalboardError> {
        let count: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM goals g
            INNER JOIN goal_categories c ON c.id = g.category_id
            INNER JOIN boards b ON b.id = c.board_id
            INNER JOIN board_participants bp ON bp.board_id = b.id
            WHERE bp.user_id = $1
              AND g.status <> $2
              AND c.is_deleted = FALSE AND b.is_deleted = FALSE
              AND ($3::text IS NULL OR g.title ILIKE '%' || $3 || '%' OR g.description ILIKE '%' || $3 || '%')
              AND ($4::bigint[] IS NULL OR g.category_id = ANY($4))
              AND ($5::smallint[] IS NULL OR g.priority = ANY($5))
              AND ($6::date IS NULL OR g.due_date >= $6)
              AND ($7::date IS NULL OR g.due_date <= $7)
            "#,
        )
        .bind(user_id)
        .bind(GoalStatus::Archived)
        .bind(params.search.as_deref())
        .bind(filters.categories.as_deref())
        .bind(filters.priorities.as_deref())
        .bind(filters.due_date_gte)
        .bind(filters.due_date_lte)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0)
    }

    /// Update goal fields; the category is immutable
    pub async fn update(&self, goal_id: i64, request: &UpdateGoalRequest) -> Result<Goal, GoalboardError> {
        let goal = sqlx::query_as::<_, Goal>(
            r#"
            UPDATE goals
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                due_date = COALESCE($4, due_date),
                status = COALESCE($5, status),
                priority = COALESCE($6, priority),
                updated = $7
            WHERE id = $1
            RETURNING id, title, description, due_date, status, priority, user_id, category_id, created, updated
            "#,
        )
        .bind(goal_id)
        .bind(&request.title)
        .bind(&request.description)
        .bind(request.due_date)
        .bind(request.status)
        .bind(request.priority)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(goal)
    }

    /// Archive a goal (the delete operation for goals)
    pub async fn archive(&self, goal_id: i64) -> Result<(), GoalboardError> {
        sqlx::query("UPDATE goals SET status = $2, updated = $3 WHERE id = $1")
            .bind(goal_id)
            .bind(GoalStatus::Archived)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Resolve the board a goal belongs to, honoring soft-delete and
    /// archive visibility up the chain
    pub async fn board_id_of(&self, goal_id: i64) -> Result<Option<i64>, GoalboardError> {
        let board_id: Option<(i64,)> = sqlx::query_as(
            r#"
            SELECT c.board_id
            FROM goals g
            INNER JOIN goal_categories c ON c.id = g.category_id
            INNER JOIN boards b ON b.id = c.board_id
            WHERE g.id = $1 AND g.status <> $2
              AND c.is_deleted = FALSE AND b.is_deleted = FALSE
            "#,
        )
        .bind(goal_id)
        .bind(GoalStatus::Archived)
        .fetch_optional(&self.pool)
        .await?;

        Ok(board_id.map(|r| r.0))
    }
}
