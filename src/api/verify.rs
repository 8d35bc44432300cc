//! Verification code redemption endpoint
//!
//! The out-of-band half of the bot linking state machine: an
//! authenticated web client submits the code the bot issued, which
//! attaches the chat to this account and consumes the code.

use axum::extract::State;
use axum::Json;

use crate::api::middleware::AuthUser;
use crate::api::AppState;
use crate::models::tg_link::{TgLink, VerifyRequest};
use crate::utils::errors::Result;
use crate::utils::logging::log_user_action;

pub async fn verify_bot(
    user: AuthUser,
    State(state): State<AppState>,
    Json(request): Json<VerifyRequest>,
) -> Result<Json<TgLink>> {
    let link = state
        .services
        .linking
        .redeem(&request.verification_code, user.id)
        .await?;
    log_user_action(user.id, "bot_verified", None);

    Ok(Json(link))
}
