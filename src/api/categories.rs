//! Goal category endpoints

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::api::middleware::AuthUser;
use crate::api::query::{CategoryListQuery, PageResponse};
use crate::api::AppState;
use crate::models::category::{CreateCategoryRequest, GoalCategory, UpdateCategoryRequest};
use crate::services::{Capability, Subject};
use crate::utils::errors::{GoalboardError, Result};
use crate::utils::logging::log_board_event;

const ORDERING_FIELDS: &[&str] = &["title", "created", "updated"];

pub async fn create_category(
    user: AuthUser,
    State(state): State<AppState>,
    Json(request): Json<CreateCategoryRequest>,
) -> Result<impl IntoResponse> {
    if request.title.trim().is_empty() {
        return Err(GoalboardError::Validation("title is required".to_string()));
    }

    // Creating into a board requires write access to it; a board the
    // actor cannot see is reported as a bad reference, not as missing.
    state
        .services
        .access
        .require(user.id, Subject::Board(request.board_id), Capability::Write)
        .await
        .map_err(|e| match e {
            GoalboardError::NotFound => {
                GoalboardError::Validation("board does not exist".to_string())
            }
            e => e,
        })?;

    let category = state
        .db
        .categories
        .create(&request.title, request.board_id, user.id)
        .await?;

    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn list_categories(
    user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<CategoryListQuery>,
) -> Result<Json<PageResponse<GoalCategory>>> {
    let board_id = query.board;
    let params = query.list().into_params(ORDERING_FIELDS, "title ASC")?;

    let count = state
        .db
        .categories
        .count_visible(user.id, board_id, &params)
        .await?;
    let results = state
        .db
        .categories
        .list_visible(user.id, board_id, &params)
        .await?;

    Ok(Json(PageResponse { count, results }))
}

pub async fn get_category(
    user: AuthUser,
    State(state): State<AppState>,
    Path(category_id): Path<i64>,
) -> Result<Json<GoalCategory>> {
    let category = state
        .db
        .categories
        .find_visible(category_id, user.id)
        .await?
        .ok_or(GoalboardError::NotFound)?;

    Ok(Json(category))
}

pub async fn update_category(
    user: AuthUser,
    State(state): State<AppState>,
    Path(category_id): Path<i64>,
    Json(request): Json<UpdateCategoryRequest>,
) -> Result<Json<GoalCategory>> {
    let category = state
        .db
        .categories
        .find_visible(category_id, user.id)
        .await?
        .ok_or(GoalboardError::NotFound)?;
    state
        .services
        .access
        .require(user.id, Subject::Category(category_id), Capability::Write)
        .await?;

    let category = match request.title {
        Some(title) if !title.trim().is_empty() => {
            state.db.categories.update_title(category_id, &title).await?
        }
        Some(_) => {
            return Err(GoalboardError::Validation("title is required".to_string()));
        }
        None => category,
    };

    Ok(Json(category))
}

/// Cascade soft-delete: the category is marked deleted and all of its
/// goals are archived.
pub async fn delete_category(
    user: AuthUser,
    State(state): State<AppState>,
    Path(category_id): Path<i64>,
) -> Result<StatusCode> {
    let category = state
        .db
        .categories
        .find_visible(category_id, user.id)
        .await?
        .ok_or(GoalboardError::NotFound)?;
    state
        .services
        .access
        .require(user.id, Subject::Category(category_id), Capability::Write)
        .await?;

    state.db.categories.soft_delete(category_id).await?;
    log_board_event(category.board_id, user.id, "category_deleted");

    Ok(StatusCode::NO_CONTENT)
}
