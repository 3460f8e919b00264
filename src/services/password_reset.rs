//! One-time password reset tokens.
//!
//! Only the SHA-256 of a token is persisted. The token fields are written
//! before the notifier is contacted, so a failed send leaves a usable token.

use chrono::{Duration, Utc};

use crate::auth::{password, reset_token};
use crate::config::AccountDisclosure;
use crate::db::Store;
use crate::email::Notifier;
use crate::error::AppError;
use crate::services::credentials::{normalize_email, validate_password};

pub const RESET_TOKEN_TTL_MINUTES: i64 = 10;

pub const RESET_LINK_SENT: &str = "Password reset link sent to your email";
pub const GENERIC_RESET_CONFIRMATION: &str =
    "If that email is registered, a password reset link has been sent.";
pub const RESET_COMPLETE: &str = "Password reset successful";

pub fn reset_url(base: &str, token: &str) -> String {
    format!("{}/reset-password/{token}", base.trim_end_matches('/'))
}

pub async fn forgot_password(
    store: &dyn Store,
    notifier: &dyn Notifier,
    reset_url_base: &str,
    disclosure: AccountDisclosure,
    email: &str,
) -> Result<String, AppError> {
    let email = normalize_email(email);

    let Some(user) = store.find_user_by_email(&email).await? else {
        return match disclosure {
            AccountDisclosure::Explicit => Err(AppError::NotFound(
                "User with that email does not exist".to_string(),
            )),
            AccountDisclosure::Generic => Ok(GENERIC_RESET_CONFIRMATION.to_string()),
        };
    };

    let token = reset_token::generate();
    let expires_at = Utc::now() + Duration::minutes(RESET_TOKEN_TTL_MINUTES);
    store
        .set_reset_token(user.id, &reset_token::hash(&token), expires_at)
        .await?;

    notifier
        .send_password_reset(&user.email, &reset_url(reset_url_base, &token))
        .await
        .map_err(|e| AppError::Upstream(format!("Failed to send password reset email: {e}")))?;

    tracing::info!(user_id = %user.id, %expires_at, "password reset issued");

    Ok(match disclosure {
        AccountDisclosure::Explicit => RESET_LINK_SENT.to_string(),
        AccountDisclosure::Generic => GENERIC_RESET_CONFIRMATION.to_string(),
    })
}

pub async fn reset_password(
    store: &dyn Store,
    token: &str,
    new_password: &str,
) -> Result<String, AppError> {
    validate_password(new_password)?;

    let token_hash = reset_token::hash(token);
    let user = store
        .find_user_by_reset_token(&token_hash, Utc::now())
        .await?
        .ok_or(AppError::TokenInvalidOrExpired)?;

    let password_hash = password::hash(new_password).map_err(AppError::Internal)?;

    // A concurrent reset with the same token may have consumed it since the lookup.
    if !store
        .complete_password_reset(user.id, &token_hash, &password_hash)
        .await?
    {
        return Err(AppError::TokenInvalidOrExpired);
    }

    tracing::info!(user_id = %user.id, "password reset completed");
    Ok(RESET_COMPLETE.to_string())
}
