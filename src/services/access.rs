//! Board access control
//!
//! Every object-level operation on the board tree is gated here. A
//! subject resolves to its board by walking the fixed parent chain
//! (goal -> category -> board, comment -> goal -> category -> board) and
//! the actor's participant role on that board decides the outcome.
//!
//! A subject that does not resolve -- absent, soft-deleted anywhere up
//! the chain, or the actor simply is not a participant -- is reported as
//! `NotFound`, deliberately indistinguishable from "does not exist".
//! Insufficient role for a write by an actor who can read is
//! `PermissionDenied`.

use std::collections::{HashMap, HashSet};

use crate::database::DatabaseService;
use crate::models::board::{BoardParticipant, ParticipantSpec, Role, SharingDiff};
use crate::utils::errors::{GoalboardError, Result};

/// Required capability for an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Read,
    Write,
}

/// An entity in the board tree, identified for access checking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subject {
    Board(i64),
    Category(i64),
    Goal(i64),
    Comment(i64),
}

/// Role table: readers may read, owners and editors may write.
pub fn role_satisfies(role: Role, capability: Capability) -> bool {
    match capability {
        Capability::Read => true,
        Capability::Write => matches!(role, Role::Owner | Role::Editor),
    }
}

#[derive(Debug, Clone)]
pub struct AccessService {
    db: DatabaseService,
}

impl AccessService {
    pub fn new(db: DatabaseService) -> Self {
        Self { db }
    }

    /// Resolve the board a subject belongs to, honoring soft-delete
    /// visibility along the chain
    async fn resolve_board(&self, subject: Subject) -> Result<Option<i64>> {
        match subject {
            Subject::Board(id) => {
                if self.db.boards.exists_alive(id).await? {
                    Ok(Some(id))
                } else {
                    Ok(None)
                }
            }
            Subject::Category(id) => self.db.categories.board_id_of(id).await,
            Subject::Goal(id) => self.db.goals.board_id_of(id).await,
            Subject::Comment(id) => self.db.comments.board_id_of(id).await,
        }
    }

    /// Require the capability, returning the resolved board id.
    pub async fn require(
        &self,
        user_id: i64,
        subject: Subject,
        capability: Capability,
    ) -> Result<i64> {
        let board_id = self
            .resolve_board(subject)
            .await?
            .ok_or(GoalboardError::NotFound)?;

        let role = self
            .db
            .boards
            .role_of(board_id, user_id)
            .await?
            .ok_or(GoalboardError::NotFound)?;

        if !role_satisfies(role, capability) {
            return Err(GoalboardError::PermissionDenied(format!(
                "role {role:?} cannot write to board {board_id}"
            )));
        }

        Ok(board_id)
    }

    /// Non-failing form of [`require`](Self::require)
    pub async fn check(&self, user_id: i64, subject: Subject, capability: Capability) -> Result<bool> {
        match self.require(user_id, subject, capability).await {
            Ok(_) => Ok(true),
            Err(GoalboardError::NotFound) | Err(GoalboardError::PermissionDenied(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Board-level mutations (title, participant set, delete) are
    /// reserved for the owner.
    pub async fn require_owner(&self, user_id: i64, board_id: i64) -> Result<()> {
        match self.db.boards.role_of(board_id, user_id).await? {
            None => Err(GoalboardError::NotFound),
            Some(Role::Owner) => Ok(()),
            Some(role) => Err(GoalboardError::PermissionDenied(format!(
                "role {role:?} cannot manage board {board_id}"
            ))),
        }
    }
}

/// Reject sharing proposals that would touch the owner row or repeat a
/// user.
pub fn validate_sharing_proposal(
    current: &[BoardParticipant],
    proposed: &[ParticipantSpec],
) -> Result<()> {
    let owner_user_id = current
        .iter()
        .find(|p| p.role == Role::Owner)
        .map(|p| p.user_id);

    let mut seen = HashSet::new();
    for spec in proposed {
        if spec.role == Role::Owner {
            return Err(GoalboardError::Validation(
                "owner role cannot be assigned through sharing".to_string(),
            ));
        }
        if Some(spec.user_id) == owner_user_id {
            return Err(GoalboardError::Validation(
                "the board owner cannot be modified".to_string(),
            ));
        }
        if !seen.insert(spec.user_id) {
            return Err(GoalboardError::Validation(format!(
                "duplicate participant: user {}",
                spec.user_id
            )));
        }
    }

    Ok(())
}

/// Set difference between the current non-owner participants and a
/// proposed set, keyed by user id: rows absent from the proposal are
/// removed, rows in both with a changed role are updated, rows only in
/// the proposal are inserted. Applying the same proposal twice yields an
/// empty diff the second time.
pub fn compute_sharing_diff(
    current: &[BoardParticipant],
    proposed: &[ParticipantSpec],
) -> SharingDiff {
    let mut remaining: HashMap<i64, Role> = current
        .iter()
        .filter(|p| p.role != Role::Owner)
        .map(|p| (p.user_id, p.role))
        .collect();

    let mut diff = SharingDiff::default();

    for spec in proposed {
        match remaining.remove(&spec.user_id) {
            None => diff.inserts.push(spec.clone()),
            Some(role) if role != spec.role => diff.updates.push(spec.clone()),
            Some(_) => {}
        }
    }

    diff.removals = remaining.into_keys().collect();
    diff.removals.sort_unstable();
    diff
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn participant(user_id: i64, role: Role) -> BoardParticipant {
        BoardParticipant {
            id: user_id,
            board_id: 1,
            user_id,
            role,
            created: Utc::now(),
            updated: Utc::now(),
        }
    }

    fn spec(user_id: i64, role: Role) -> ParticipantSpec {
        ParticipantSpec { user_id, role }
    }

    #[test]
    fn test_role_table() {
        assert!(role_satisfies(Role::Owner, Capability::Read));
        assert!(role_satisfies(Role::Editor, Capability::Read));
        assert!(role_satisfies(Role::Reader, Capability::Read));
        assert!(role_satisfies(Role::Owner, Capability::Write));
        assert!(role_satisfies(Role::Editor, Capability::Write));
        assert!(!role_satisfies(Role::Reader, Capability::Write));
    }

    #[test]
    fn test_diff_inserts_updates_removals() {
        let current = vec![
            participant(1, Role::Owner),
            participant(2, Role::Editor),
            participant(3, Role::Reader),
        ];
        let proposed = vec![spec(2, Role::Reader), spec(4, Role::Editor)];

        let diff = compute_sharing_diff(&current, &proposed);
        assert_eq!(diff.inserts, vec![spec(4, Role::Editor)]);
        assert_eq!(diff.updates, vec![spec(2, Role::Reader)]);
        assert_eq!(diff.removals, vec![3]);
    }

    #[test]
    fn test_diff_ignores_owner_row() {
        // A proposal omitting the owner must not schedule its removal.
        let current = vec![participant(1, Role::Owner), participant(2, Role::Reader)];
        let diff = compute_sharing_diff(&current, &[spec(2, Role::Reader)]);
        assert!(diff.is_empty());
    }

    #[test]
    fn test_diff_is_idempotent() {
        let current = vec![participant(1, Role::Owner), participant(2, Role::Editor)];
        let proposed = vec![spec(2, Role::Editor), spec(3, Role::Reader)];

        let first = compute_sharing_diff(&current, &proposed);
        assert_eq!(first.inserts, vec![spec(3, Role::Reader)]);

        // State after applying the first diff
        let after = vec![
            participant(1, Role::Owner),
            participant(2, Role::Editor),
            participant(3, Role::Reader),
        ];
        let second = compute_sharing_diff(&after, &proposed);
        assert!(second.is_empty());
    }

    #[test]
    fn test_proposal_owner_role_rejected() {
        let current = vec![participant(1, Role::Owner)];
        let err = validate_sharing_proposal(&current, &[spec(2, Role::Owner)]).unwrap_err();
        assert!(matches!(err, GoalboardError::Validation(_)));
    }

    #[test]
    fn test_proposal_touching_owner_rejected() {
        let current = vec![participant(1, Role::Owner)];
        let err = validate_sharing_proposal(&current, &[spec(1, Role::Reader)]).unwrap_err();
        assert!(matches!(err, GoalboardError::Validation(_)));
    }

    #[test]
    fn test_proposal_duplicates_rejected() {
        let current = vec![participant(1, Role::Owner)];
        let proposed = vec![spec(2, Role::Reader), spec(2, Role::Editor)];
        let err = validate_sharing_proposal(&current, &proposed).unwrap_err();
        assert!(matches!(err, GoalboardError::Validation(_)));
    }
}
