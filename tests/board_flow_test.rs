//! Board tree integration tests
//!
//! Covers the participant invariants, the sharing update, the cascade
//! soft-deletes and the visibility rules. Requires a test database; each
//! test skips when none is configured.

mod helpers;

use assert_matches::assert_matches;

use goalboard::database::DatabaseService;
use goalboard::models::board::{ParticipantSpec, Role};
use goalboard::models::goal::{CreateGoalRequest, GoalStatus};
use goalboard::services::access::{compute_sharing_diff, validate_sharing_proposal};
use goalboard::services::{AccessService, Capability, Subject};
use goalboard::utils::errors::GoalboardError;

use helpers::{create_test_user, test_database};

async fn sharing_state(db: &DatabaseService, board_id: i64) -> Vec<(i64, Role)> {
    db.boards
        .participants(board_id)
        .await
        .unwrap()
        .into_iter()
        .map(|p| (p.user_id, p.role))
        .collect()
}

#[tokio::test]
async fn test_board_create_auto_creates_single_owner() {
    let Some(db) = test_database().await else {
        eprintln!("skipping: no test database configured");
        return;
    };

    let owner = create_test_user(&db, "owner").await;
    let board = db.boards.create_with_owner("Work", owner.id).await.unwrap();

    let participants = db.boards.participants(board.id).await.unwrap();
    assert_eq!(participants.len(), 1);
    assert_eq!(participants[0].user_id, owner.id);
    assert_eq!(participants[0].role, Role::Owner);
}

#[tokio::test]
async fn test_sharing_update_is_idempotent_and_owner_survives() {
    let Some(db) = test_database().await else {
        eprintln!("skipping: no test database configured");
        return;
    };

    let owner = create_test_user(&db, "owner").await;
    let editor = create_test_user(&db, "editor").await;
    let reader = create_test_user(&db, "reader").await;
    let board = db.boards.create_with_owner("Shared", owner.id).await.unwrap();

    // The proposal never mentions the owner
    let proposed = vec![
        ParticipantSpec { user_id: editor.id, role: Role::Editor },
        ParticipantSpec { user_id: reader.id, role: Role::Reader },
    ];

    let current = db.boards.participants(board.id).await.unwrap();
    validate_sharing_proposal(&current, &proposed).unwrap();
    let diff = compute_sharing_diff(&current, &proposed);
    db.boards.apply_sharing(board.id, None, &diff).await.unwrap();

    let first_state = sharing_state(&db, board.id).await;
    assert_eq!(first_state.len(), 3);
    let owners = first_state.iter().filter(|(_, r)| *r == Role::Owner).count();
    assert_eq!(owners, 1, "exactly one owner at all times");

    // Applying the same proposal again changes nothing
    let current = db.boards.participants(board.id).await.unwrap();
    let diff = compute_sharing_diff(&current, &proposed);
    assert!(diff.is_empty());
    db.boards.apply_sharing(board.id, None, &diff).await.unwrap();
    assert_eq!(sharing_state(&db, board.id).await, first_state);

    // Demote the editor, drop the reader
    let proposed = vec![ParticipantSpec { user_id: editor.id, role: Role::Reader }];
    let current = db.boards.participants(board.id).await.unwrap();
    let diff = compute_sharing_diff(&current, &proposed);
    db.boards.apply_sharing(board.id, Some("Renamed"), &diff).await.unwrap();

    let state = sharing_state(&db, board.id).await;
    assert_eq!(state.len(), 2);
    assert!(state.contains(&(owner.id, Role::Owner)), "owner row untouched");
    assert!(state.contains(&(editor.id, Role::Reader)));

    let board = db.boards.find_for_participant(board.id, owner.id).await.unwrap().unwrap();
    assert_eq!(board.title, "Renamed", "title applied in the same transaction");
}

#[tokio::test]
async fn test_category_delete_archives_its_goals() {
    let Some(db) = test_database().await else {
        eprintln!("skipping: no test database configured");
        return;
    };

    let user = create_test_user(&db, "casc").await;
    let board = db.boards.create_with_owner("Work", user.id).await.unwrap();
    let category = db.categories.create("Sprint1", board.id, user.id).await.unwrap();

    let goal = db
        .goals
        .create(
            &CreateGoalRequest {
                title: "Ship v1".to_string(),
                description: None,
                due_date: None,
                status: None,
                priority: None,
                category_id: category.id,
            },
            user.id,
        )
        .await
        .unwrap();
    assert_eq!(goal.status, GoalStatus::Todo);

    db.categories.soft_delete(category.id).await.unwrap();

    // The category is gone from every visibility-filtered read
    assert!(db.categories.find_visible(category.id, user.id).await.unwrap().is_none());

    // Its goal is archived, immediately
    assert!(db.goals.find_visible(goal.id, user.id).await.unwrap().is_none());

    // The board itself is untouched
    assert!(db.boards.find_for_participant(board.id, user.id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_board_delete_cascades_to_categories_and_goals() {
    let Some(db) = test_database().await else {
        eprintln!("skipping: no test database configured");
        return;
    };

    let user = create_test_user(&db, "casc").await;
    let board = db.boards.create_with_owner("Work", user.id).await.unwrap();
    let cat_a = db.categories.create("A", board.id, user.id).await.unwrap();
    let cat_b = db.categories.create("B", board.id, user.id).await.unwrap();

    let mut goal_ids = Vec::new();
    for category_id in [cat_a.id, cat_b.id] {
        let goal = db
            .goals
            .create(
                &CreateGoalRequest {
                    title: "g".to_string(),
                    description: None,
                    due_date: None,
                    status: Some(GoalStatus::InProgress),
                    priority: None,
                    category_id,
                },
                user.id,
            )
            .await
            .unwrap();
        goal_ids.push(goal.id);
    }

    db.boards.soft_delete(board.id).await.unwrap();

    assert!(db.boards.find_for_participant(board.id, user.id).await.unwrap().is_none());
    for category_id in [cat_a.id, cat_b.id] {
        assert!(db.categories.find_visible(category_id, user.id).await.unwrap().is_none());
    }
    for goal_id in goal_ids {
        assert!(db.goals.find_visible(goal_id, user.id).await.unwrap().is_none());
    }
}

#[tokio::test]
async fn test_non_participant_cannot_see_or_touch_the_tree() {
    let Some(db) = test_database().await else {
        eprintln!("skipping: no test database configured");
        return;
    };
    let access = AccessService::new(db.clone());

    let owner = create_test_user(&db, "owner").await;
    let outsider = create_test_user(&db, "outsider").await;
    let reader = create_test_user(&db, "reader").await;

    let board = db.boards.create_with_owner("Private", owner.id).await.unwrap();
    let category = db.categories.create("Plans", board.id, owner.id).await.unwrap();
    let goal = db
        .goals
        .create(
            &CreateGoalRequest {
                title: "Secret".to_string(),
                description: None,
                due_date: None,
                status: None,
                priority: None,
                category_id: category.id,
            },
            owner.id,
        )
        .await
        .unwrap();

    // An outsider resolves nothing, indistinguishable from absence
    assert!(db.goals.find_visible(goal.id, outsider.id).await.unwrap().is_none());
    let err = access
        .require(outsider.id, Subject::Goal(goal.id), Capability::Read)
        .await
        .unwrap_err();
    assert_matches!(err, GoalboardError::NotFound);

    // A reader can read but not write
    let current = db.boards.participants(board.id).await.unwrap();
    let proposed = vec![ParticipantSpec { user_id: reader.id, role: Role::Reader }];
    let diff = compute_sharing_diff(&current, &proposed);
    db.boards.apply_sharing(board.id, None, &diff).await.unwrap();

    assert!(db.goals.find_visible(goal.id, reader.id).await.unwrap().is_some());
    assert!(access
        .check(reader.id, Subject::Goal(goal.id), Capability::Read)
        .await
        .unwrap());
    let err = access
        .require(reader.id, Subject::Goal(goal.id), Capability::Write)
        .await
        .unwrap_err();
    assert_matches!(err, GoalboardError::PermissionDenied(_));

    // Board-level management stays with the owner
    let err = access.require_owner(reader.id, board.id).await.unwrap_err();
    assert_matches!(err, GoalboardError::PermissionDenied(_));
    access.require_owner(owner.id, board.id).await.unwrap();
}
