//! Board and participant models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Participant role on a board.
///
/// Stored as SMALLINT; exactly one owner exists per board and the owner
/// row is created together with the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[repr(i16)]
pub enum Role {
    Owner = 1,
    Editor = 2,
    Reader = 3,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Board {
    pub id: i64,
    pub title: String,
    pub is_deleted: bool,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BoardParticipant {
    pub id: i64,
    pub board_id: i64,
    pub user_id: i64,
    pub role: Role,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

/// Board detail response, including the participant list
#[derive(Debug, Clone, Serialize)]
pub struct BoardDetail {
    #[serde(flatten)]
    pub board: Board,
    pub participants: Vec<BoardParticipant>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateBoardRequest {
    pub title: String,
}

/// One proposed entry of a board's participant set
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ParticipantSpec {
    pub user_id: i64,
    pub role: Role,
}

/// Sharing update: new title and/or the full proposed non-owner
/// participant set. The owner row is never part of the proposal.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateBoardRequest {
    pub title: Option<String>,
    pub participants: Option<Vec<ParticipantSpec>>,
}

/// Set difference between a board's current non-owner participants and a
/// proposed set, applied as one transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SharingDiff {
    pub inserts: Vec<ParticipantSpec>,
    pub updates: Vec<ParticipantSpec>,
    pub removals: Vec<i64>,
}

impl SharingDiff {
    pub fn is_empty(&self) -> bool {
        self.inserts.is_empty() && self.updates.is_empty() && self.removals.is_empty()
    }
}
