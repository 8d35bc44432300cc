//! Telegram link repository implementation
//!
//! Linking records mediate between a chat identity and an account via a
//! one-time verification code. At most one unresolved code is live per
//! chat; redemption is single-use by construction (the code column is
//! cleared in the same UPDATE that attaches the user).

use chrono::Utc;
use sqlx::PgPool;

use crate::models::tg_link::TgLink;
use crate::utils::errors::GoalboardError;

#[derive(Debug, Clone)]
pub struct TgLinkRepository {
    pool: PgPool,
}

impl TgLinkRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find the linking record of a chat
    pub async fn find_by_chat_id(&self, tg_chat_id: i64) -> Result<Option<TgLink>, GoalboardError> {
        let link = sqlx::query_as::<_, TgLink>(
            "SELECT id, tg_chat_id, tg_username, verification_code, user_id, created, updated FROM tg_links WHERE tg_chat_id = $1",
        )
        .bind(tg_chat_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(link)
    }

    /// Store a fresh verification code for a chat, creating the record if
    /// absent. Replaces any earlier unredeemed code; a linked record is
    /// left untouched.
    pub async fn upsert_code(
        &self,
        tg_chat_id: i64,
        tg_username: Option<&str>,
        verification_code: &str,
    ) -> Result<TgLink, GoalboardError> {
        let now = Utc::now();
        let link = sqlx::query_as::<_, TgLink>(
            r#"
            INSERT INTO tg_links (tg_chat_id, tg_username, verification_code, user_id, created, updated)
            VALUES ($1, $2, $3, NULL, $4, $4)
            ON CONFLICT (tg_chat_id) DO UPDATE
            SET verification_code = EXCLUDED.verification_code,
                tg_username = EXCLUDED.tg_username,
                updated = EXCLUDED.updated
            WHERE tg_links.user_id IS NULL
            RETURNING id, tg_chat_id, tg_username, verification_code, user_id, created, updated
            "#,
        )
        .bind(tg_chat_id)
        .bind(tg_username)
        .bind(verification_code)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(link)
    }

    /// Redeem a verification code: attach the user and clear the code in
    /// one statement. Returns None when no record carries this code,
    /// which also covers the already-redeemed case.
    pub async fn redeem_code(
        &self,
        verification_code: &str,
        user_id: i64,
    ) -> Result<Option<TgLink>, GoalboardError> {
        let link = sqlx::query_as::<_, TgLink>(
            r#"
            UPDATE tg_links
            SET user_id = $2, verification_code = NULL, updated = $3
            WHERE verification_code = $1 AND user_id IS NULL
            RETURNING id, tg_chat_id, tg_username, verification_code, user_id, created, updated
            "#,
        )
        .bind(verification_code)
        .bind(user_id)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(link)
    }
}
