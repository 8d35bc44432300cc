//! Board endpoints
//!
//! Board mutations are owner-only; the sharing update and the cascade
//! delete run as single transactions in the repository.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::api::middleware::AuthUser;
use crate::api::query::{ListQuery, PageResponse};
use crate::api::AppState;
use crate::models::board::{Board, BoardDetail, CreateBoardRequest, UpdateBoardRequest};
use crate::services::access::{compute_sharing_diff, validate_sharing_proposal};
use crate::utils::errors::{GoalboardError, Result};
use crate::utils::logging::log_board_event;

const ORDERING_FIELDS: &[&str] = &["title", "created", "updated"];

pub async fn create_board(
    user: AuthUser,
    State(state): State<AppState>,
    Json(request): Json<CreateBoardRequest>,
) -> Result<impl IntoResponse> {
    if request.title.trim().is_empty() {
        return Err(GoalboardError::Validation("title is required".to_string()));
    }

    let board = state
        .db
        .boards
        .create_with_owner(&request.title, user.id)
        .await?;
    let participants = state.db.boards.participants(board.id).await?;
    log_board_event(board.id, user.id, "created");

    Ok((
        StatusCode::CREATED,
        Json(BoardDetail {
            board,
            participants,
        }),
    ))
}

pub async fn list_boards(
    user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<PageResponse<Board>>> {
    let params = query.into_params(ORDERING_FIELDS, "title ASC")?;

    let count = state.db.boards.count_for_participant(user.id, &params).await?;
    let results = state.db.boards.list_for_participant(user.id, &params).await?;

    Ok(Json(PageResponse { count, results }))
}

pub async fn get_board(
    user: AuthUser,
    State(state): State<AppState>,
    Path(board_id): Path<i64>,
) -> Result<Json<BoardDetail>> {
    let board = state
        .db
        .boards
        .find_for_participant(board_id, user.id)
        .await?
        .ok_or(GoalboardError::NotFound)?;
    let participants = state.db.boards.participants(board_id).await?;

    Ok(Json(BoardDetail {
        board,
        participants,
    }))
}

/// Sharing update: replaces the board's non-owner participant set with
/// the proposed one and/or renames the board, all in one transaction.
pub async fn update_board(
    user: AuthUser,
    State(state): State<AppState>,
    Path(board_id): Path<i64>,
    Json(request): Json<UpdateBoardRequest>,
) -> Result<Json<BoardDetail>> {
    state
        .db
        .boards
        .find_for_participant(board_id, user.id)
        .await?
        .ok_or(GoalboardError::NotFound)?;
    state.services.access.require_owner(user.id, board_id).await?;

    if let Some(title) = &request.title {
        if title.trim().is_empty() {
            return Err(GoalboardError::Validation("title is required".to_string()));
        }
    }

    let current = state.db.boards.participants(board_id).await?;
    let diff = match &request.participants {
        Some(proposed) => {
            validate_sharing_proposal(&current, proposed)?;
            compute_sharing_diff(&current, proposed)
        }
        None => Default::default(),
    };

    state
        .db
        .boards
        .apply_sharing(board_id, request.title.as_deref(), &diff)
        .await
        .map_err(|e| match e {
            GoalboardError::Database(sqlx::Error::Database(db))
                if db.is_foreign_key_violation() =>
            {
                GoalboardError::Validation("unknown user in participants".to_string())
            }
            e => e,
        })?;
    log_board_event(board_id, user.id, "sharing_updated");

    let board = state
        .db
        .boards
        .find_for_participant(board_id, user.id)
        .await?
        .ok_or(GoalboardError::NotFound)?;
    let participants = state.db.boards.participants(board_id).await?;

    Ok(Json(BoardDetail {
        board,
        participants,
    }))
}

/// Cascade soft-delete of a board
pub async fn delete_board(
    user: AuthUser,
    State(state): State<AppState>,
    Path(board_id): Path<i64>,
) -> Result<StatusCode> {
    state
        .db
        .boards
        .find_for_participant(board_id, user.id)
        .await?
        .ok_or(GoalboardError::NotFound)?;
    state.services.access.require_owner(user.id, board_id).await?;

    state.db.boards.soft_delete(board_id).await?;
    log_board_event(board_id, user.id, "deleted");

    Ok(StatusCode::NO_CONTENT)
}
