//! Goal comment endpoints
//!
//! Visibility follows the board tree; editing or deleting a comment
//! additionally requires being its author.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::api::middleware::AuthUser;
use crate::api::query::{CommentListQuery, PageResponse};
use crate::api::AppState;
use crate::models::comment::{CreateCommentRequest, GoalComment, UpdateCommentRequest};
use crate::services::{Capability, Subject};
use crate::utils::errors::{GoalboardError, Result};

const ORDERING_FIELDS: &[&str] = &["created", "updated"];

pub async fn create_comment(
    user: AuthUser,
    State(state): State<AppState>,
    Json(request): Json<CreateCommentRequest>,
) -> Result<impl IntoResponse> {
    if request.text.trim().is_empty() {
        return Err(GoalboardError::Validation("text is required".to_string()));
    }

    state
        .services
        .access
        .require(user.id, Subject::Goal(request.goal_id), Capability::Write)
        .await
        .map_err(|e| match e {
            GoalboardError::NotFound => {
                GoalboardError::Validation("goal does not exist".to_string())
            }
            e => e,
        })?;

    let comment = state
        .db
        .comments
        .create(&request.text, request.goal_id, user.id)
        .await?;

    Ok((StatusCode::CREATED, Json(comment)))
}

pub async fn list_comments(
    user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<CommentListQuery>,
) -> Result<Json<PageResponse<GoalComment>>> {
    let goal_id = query.goal_id()?;
    let params = query.list().into_params(ORDERING_FIELDS, "created DESC")?;

    let count = state.db.comments.count_for_goal(goal_id, user.id).await?;
    let results = state
        .db
        .comments
        .list_for_goal(goal_id, user.id, &params)
        .await?;

    Ok(Json(PageResponse { count, results }))
}

pub async fn get_comment(
    user: AuthUser,
    State(state): State<AppState>,
    Path(comment_id): Path<i64>,
) -> Result<Json<GoalComment>> {
    let comment = state
        .db
        .comments
        .find_visible(comment_id, user.id)
        .await?
        .ok_or(GoalboardError::NotFound)?;

    Ok(Json(comment))
}

pub async fn update_comment(
    user: AuthUser,
    State(state): State<AppState>,
    Path(comment_id): Path<i64>,
    Json(request): Json<UpdateCommentRequest>,
) -> Result<Json<GoalComment>> {
    let comment = require_own_comment(&state, &user, comment_id).await?;

    if request.text.trim().is_empty() {
        return Err(GoalboardError::Validation("text is required".to_string()));
    }

    let comment = state
        .db
        .comments
        .update_text(comment.id, &request.text)
        .await?;

    Ok(Json(comment))
}

pub async fn delete_comment(
    user: AuthUser,
    State(state): State<AppState>,
    Path(comment_id): Path<i64>,
) -> Result<StatusCode> {
    let comment = require_own_comment(&state, &user, comment_id).await?;

    state.db.comments.delete(comment.id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Comment mutation: visible, write access on the board, and authored by
/// the actor.
async fn require_own_comment(
    state: &AppState,
    user: &AuthUser,
    comment_id: i64,
) -> Result<GoalComment> {
    let comment = state
        .db
        .comments
        .find_visible(comment_id, user.id)
        .await?
        .ok_or(GoalboardError::NotFound)?;
    state
        .services
        .access
        .require(user.id, Subject::Comment(comment_id), Capability::Write)
        .await?;

    if comment.user_id != user.id {
        return Err(GoalboardError::PermissionDenied(
            "only the author can modify a comment".to_string(),
        ));
    }

    Ok(comment)
}
