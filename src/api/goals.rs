//! Goal endpoints

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::api::middleware::AuthUser;
use crate::api::query::{GoalListQuery, PageResponse};
use crate::api::AppState;
use crate::models::goal::{CreateGoalRequest, Goal, UpdateGoalRequest};
use crate::services::{Capability, Subject};
use crate::utils::errors::{GoalboardError, Result};
use crate::utils::logging::log_user_action;

const ORDERING_FIELDS: &[&str] = &["title", "created", "updated", "due_date", "priority"];

pub async fn create_goal(
    user: AuthUser,
    State(state): State<AppState>,
    Json(request): Json<CreateGoalRequest>,
) -> Result<impl IntoResponse> {
    if request.title.trim().is_empty() {
        return Err(GoalboardError::Validation("title is required".to_string()));
    }

    state
        .services
        .access
        .require(
            user.id,
            Subject::Category(request.category_id),
            Capability::Write,
        )
        .await
        .map_err(|e| match e {
            GoalboardError::NotFound => {
                GoalboardError::Validation("category does not exist".to_string())
            }
            e => e,
        })?;

    let goal = state.db.goals.create(&request, user.id).await?;
    log_user_action(user.id, "goal_created", Some(&goal.title));

    Ok((StatusCode::CREATED, Json(goal)))
}

pub async fn list_goals(
    user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<GoalListQuery>,
) -> Result<Json<PageResponse<Goal>>> {
    let filters = query.filters()?;
    let params = query.list().into_params(ORDERING_FIELDS, "created DESC")?;

    let count = state
        .db
        .goals
        .count_visible(user.id, &params, &filters)
        .await?;
    let results = state
        .db
        .goals
        .list_visible(user.id, &params, &filters)
        .await?;

    Ok(Json(PageResponse { count, results }))
}

pub async fn get_goal(
    user: AuthUser,
    State(state): State<AppState>,
    Path(goal_id): Path<i64>,
) -> Result<Json<Goal>> {
    let goal = state
        .db
        .goals
        .find_visible(goal_id, user.id)
        .await?
        .ok_or(GoalboardError::NotFound)?;

    Ok(Json(goal))
}

pub async fn update_goal(
    user: AuthUser,
    State(state): State<AppState>,
    Path(goal_id): Path<i64>,
    Json(request): Json<UpdateGoalRequest>,
) -> Result<Json<Goal>> {
    state
        .db
        .goals
        .find_visible(goal_id, user.id)
        .await?
        .ok_or(GoalboardError::NotFound)?;
    state
        .services
        .access
        .require(user.id, Subject::Goal(goal_id), Capability::Write)
        .await?;

    if let Some(title) = &request.title {
        if title.trim().is_empty() {
            return Err(GoalboardError::Validation("title is required".to_string()));
        }
    }

    let goal = state.db.goals.update(goal_id, &request).await?;
    Ok(Json(goal))
}

/// Goal deletion archives the goal; the row stays.
pub async fn delete_goal(
    user: AuthUser,
    State(state): State<AppState>,
    Path(goal_id): Path<i64>,
) -> Result<StatusCode> {
    state
        .db
        .goals
        .find_visible(goal_id, user.id)
        .await?
        .ok_or(GoalboardError::NotFound)?;
    state
        .services
        .access
        .require(user.id, Subject::Goal(goal_id), Capability::Write)
        .await?;

    state.db.goals.archive(goal_id).await?;
    log_user_action(user.id, "goal_archived", None);

    Ok(StatusCode::NO_CONTENT)
}
