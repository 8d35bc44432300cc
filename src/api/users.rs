//! Account endpoints: signup, login, profile, password change

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::api::middleware::AuthUser;
use crate::api::AppState;
use crate::models::user::{
    LoginRequest, LoginResponse, Profile, SignupRequest, UpdatePasswordRequest,
    UpdateProfileRequest,
};
use crate::utils::errors::Result;
use crate::utils::logging::log_user_action;

pub async fn signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> Result<impl IntoResponse> {
    let profile = state.services.accounts.signup(request).await?;
    log_user_action(profile.id, "signup", None);

    Ok((StatusCode::CREATED, Json(profile)))
}

pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let response = state.services.accounts.login(request).await?;
    log_user_action(response.profile.id, "login", None);

    Ok(Json(response))
}

pub async fn get_profile(
    user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Profile>> {
    let profile = state.services.accounts.profile(user.id).await?;
    Ok(Json(profile))
}

pub async fn update_profile(
    user: AuthUser,
    State(state): State<AppState>,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<Profile>> {
    let profile = state
        .services
        .accounts
        .update_profile(user.id, &request)
        .await?;
    log_user_action(user.id, "profile_updated", None);

    Ok(Json(profile))
}

/// Logout. Sessions are stateless bearer tokens, so there is nothing to
/// revoke server-side; the client discards its token. The account record
/// itself is untouched.
pub async fn delete_profile(user: AuthUser) -> StatusCode {
    log_user_action(user.id, "logout", None);
    StatusCode::NO_CONTENT
}

pub async fn update_password(
    user: AuthUser,
    State(state): State<AppState>,
    Json(request): Json<UpdatePasswordRequest>,
) -> Result<StatusCode> {
    state
        .services
        .accounts
        .change_password(user.id, &request)
        .await?;
    log_user_action(user.id, "password_changed", None);

    Ok(StatusCode::NO_CONTENT)
}
