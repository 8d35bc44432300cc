//! User repository implementation

use chrono::Utc;
use sqlx::PgPool;

use crate::models::user::{CreateUserRequest, UpdateProfileRequest, User};
use crate::utils::errors::GoalboardError;

#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new user
    pub async fn create(&self, request: &CreateUserRequest) -> Result<User, GoalboardError> {
        let now = Utc::now();
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password_hash, first_name, last_name, email, created, updated)
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            RETURNING id, username, password_hash, first_name, last_name, email, created, updated
            "#,
        )
        .bind(&request.username)
        .bind(&request.password_hash)
        .bind(&request.first_name)
        .bind(&request.last_name)
        .bind(&request.email)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find user by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<User>, GoalboardError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, first_name, last_name, email, created, updated FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find user by username
    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, GoalboardError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, first_name, last_name, email, created, updated FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Update profile fields
    pub async fn update_profile(
        &self,
        id: i64,
        request: &UpdateProfileRequest,
    ) -> Result<User, GoalboardError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                email = COALESCE($4, email),
                updated = $5
            WHERE id = $1
            RETURNING id, username, password_hash, first_name, last_name, email, created, updated
            "#,
        )
        .bind(id)
        .bind(&request.first_name)
        .bind(&request.last_name)
        .bind(&request.email)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Replace the stored password hash
    pub async fn update_password(&self, id: i64, password_hash: &str) -> Result<(), GoalboardError> {
        sqlx::query("UPDATE users SET password_hash = $2, updated = $3 WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
