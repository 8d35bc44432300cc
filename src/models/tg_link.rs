//! Telegram chat linking record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Association between a Telegram chat and an account.
///
/// `user_id` is null until the chat's verification code is redeemed;
/// the code itself never leaves the bot channel, so it is skipped when
/// serializing.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct TgLink {
    pub id: i64,
    pub tg_chat_id: i64,
    pub tg_username: Option<String>,
    #[serde(skip_serializing)]
    pub verification_code: Option<String>,
    pub user_id: Option<i64>,
    #[serde(skip_serializing)]
    pub created: DateTime<Utc>,
    #[serde(skip_serializing)]
    pub updated: DateTime<Utc>,
}

impl TgLink {
    /// Whether the chat has completed linking.
    pub fn is_linked(&self) -> bool {
        self.user_id.is_some()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct VerifyRequest {
    pub verification_code: String,
}
