//! Request authentication
//!
//! Extracts and validates the bearer token, turning it into an explicit
//! acting user passed to handlers.

use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;

use crate::api::AppState;
use crate::utils::errors::GoalboardError;

/// The authenticated user of the current request
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: i64,
    pub username: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = GoalboardError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(GoalboardError::AuthenticationRequired)?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or(GoalboardError::AuthenticationRequired)?;

        let claims = state.services.accounts.verify_token(token)?;

        Ok(AuthUser {
            id: claims.sub,
            username: claims.username,
        })
    }
}
