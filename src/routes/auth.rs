use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::services::credentials::{self, AuthPayload, SignInInput, SignUpInput};
use crate::services::password_reset;
use crate::state::SharedState;

#[derive(Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Deserialize)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

pub async fn sign_up(
    State(state): State<SharedState>,
    Json(req): Json<SignUpInput>,
) -> Result<Json<AuthPayload>, AppError> {
    let payload = credentials::sign_up(state.store.as_ref(), &state.config.jwt_secret, req).await?;
    Ok(Json(payload))
}

pub async fn sign_in(
    State(state): State<SharedState>,
    Json(req): Json<SignInInput>,
) -> Result<Json<AuthPayload>, AppError> {
    let email = credentials::normalize_email(&req.email);

    if state.login_limiter.try_attempt(&email).is_err() {
        tracing::warn!(email = %email, "sign-in rate limited");
        return Err(AppError::RateLimited(
            "Too many sign-in attempts. Please try again later.".to_string(),
        ));
    }

    let payload =
        credentials::sign_in(state.store.as_ref(), &state.config.jwt_secret, req).await?;
    state.login_limiter.reset(&email);
    Ok(Json(payload))
}

pub async fn forgot_password(
    State(state): State<SharedState>,
    Json(req): Json<ForgotPasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let message = password_reset::forgot_password(
        state.store.as_ref(),
        state.notifier.as_ref(),
        &state.config.reset_url_base,
        state.config.account_disclosure,
        &req.email,
    )
    .await?;
    Ok(Json(MessageResponse { message }))
}

pub async fn reset_password(
    State(state): State<SharedState>,
    Json(req): Json<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let message =
        password_reset::reset_password(state.store.as_ref(), &req.token, &req.password).await?;
    Ok(Json(MessageResponse { message }))
}
