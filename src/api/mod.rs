//! HTTP API module
//!
//! Thin axum handlers over the services layer. Every handler receives
//! the acting user explicitly through the [`middleware::AuthUser`]
//! extractor; nothing reads ambient authentication state.

pub mod boards;
pub mod categories;
pub mod comments;
pub mod goals;
pub mod middleware;
pub mod query;
pub mod users;
pub mod verify;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post, put};
use axum::{Json, Router};
use serde::Serialize;
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::database::DatabaseService;
use crate::services::ServiceFactory;
use crate::utils::errors::GoalboardError;

/// Shared application state injected into every handler
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseService,
    pub services: ServiceFactory,
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/signup", post(users::signup))
        .route("/login", post(users::login))
        .route(
            "/profile",
            get(users::get_profile)
                .put(users::update_profile)
                .patch(users::update_profile)
                .delete(users::delete_profile),
        )
        .route("/update_password", put(users::update_password))
        .route("/board/create", post(boards::create_board))
        .route("/board/list", get(boards::list_boards))
        .route(
            "/board/{id}",
            get(boards::get_board)
                .put(boards::update_board)
                .patch(boards::update_board)
                .delete(boards::delete_board),
        )
        .route("/goal_category/create", post(categories::create_category))
        .route("/goal_category/list", get(categories::list_categories))
        .route(
            "/goal_category/{id}",
            get(categories::get_category)
                .put(categories::update_category)
                .patch(categories::update_category)
                .delete(categories::delete_category),
        )
        .route("/goal/create", post(goals::create_goal))
        .route("/goal/list", get(goals::list_goals))
        .route(
            "/goal/{id}",
            get(goals::get_goal)
                .put(goals::update_goal)
                .patch(goals::update_goal)
                .delete(goals::delete_goal),
        )
        .route("/goal_comment/create", post(comments::create_comment))
        .route("/goal_comment/list", get(comments::list_comments))
        .route(
            "/goal_comment/{id}",
            get(comments::get_comment)
                .put(comments::update_comment)
                .patch(comments::update_comment)
                .delete(comments::delete_comment),
        )
        .route("/bot/verify", patch(verify::verify_bot))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Error body shape shared by all endpoints
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: String,
}

impl IntoResponse for GoalboardError {
    fn into_response(self) -> Response {
        let status = match &self {
            GoalboardError::Validation(_) => StatusCode::BAD_REQUEST,
            GoalboardError::AuthenticationRequired => StatusCode::UNAUTHORIZED,
            GoalboardError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            GoalboardError::NotFound => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let detail = if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = %self, "Request failed");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        (status, Json(ErrorBody { detail })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: GoalboardError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_error_status_mapping() {
        assert_eq!(
            status_of(GoalboardError::Validation("bad".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(GoalboardError::AuthenticationRequired),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(GoalboardError::PermissionDenied("no".to_string())),
            StatusCode::FORBIDDEN
        );
        assert_eq!(status_of(GoalboardError::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(
            status_of(GoalboardError::Config("x".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
