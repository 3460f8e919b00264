//! Account registration, sign-in and session token minting.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::extractor::Identity;
use crate::auth::jwt::{encode_token, Claims};
use crate::auth::password;
use crate::db::Store;
use crate::error::AppError;
use crate::models::{NewUser, User, UserProfile};
use crate::services::resolve_wishlist;

pub const MIN_PASSWORD_LEN: usize = 8;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

#[derive(Debug, Clone, Deserialize)]
pub struct SignUpInput {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SignInInput {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthPayload {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub token: String,
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn validate_password(password: &str) -> Result<(), AppError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::BadRequest(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

fn issue(user: User, secret: &str) -> Result<AuthPayload, AppError> {
    let claims = Claims::new(user.id, &user.email);
    let token = encode_token(&claims, secret).map_err(AppError::Internal)?;

    Ok(AuthPayload {
        id: user.id,
        username: user.username,
        email: user.email,
        token,
    })
}

pub async fn sign_up(
    store: &dyn Store,
    secret: &str,
    input: SignUpInput,
) -> Result<AuthPayload, AppError> {
    let email = normalize_email(&input.email);
    let username = input.username.trim().to_string();

    if username.is_empty() {
        return Err(AppError::BadRequest("Username is required".to_string()));
    }
    if !EMAIL_RE.is_match(&email) {
        return Err(AppError::BadRequest("Invalid email".to_string()));
    }
    validate_password(&input.password)?;

    if store.find_user_by_email(&email).await?.is_some() {
        tracing::warn!(email = %email, "sign-up for registered email");
        return Err(AppError::DuplicateIdentity);
    }

    let password_hash = password::hash(&input.password).map_err(AppError::Internal)?;

    // The unique index still catches a concurrent sign-up for the same email.
    let user = store
        .create_user(NewUser {
            username,
            email,
            password_hash,
        })
        .await?;

    tracing::info!(user_id = %user.id, "user signed up");
    issue(user, secret)
}

/// Unknown email and wrong password are indistinguishable to the caller.
pub async fn sign_in(
    store: &dyn Store,
    secret: &str,
    input: SignInInput,
) -> Result<AuthPayload, AppError> {
    let email = normalize_email(&input.email);

    let Some(user) = store.find_user_by_email(&email).await? else {
        password::verify_dummy(&input.password);
        tracing::warn!("sign-in for unknown email");
        return Err(AppError::InvalidCredential);
    };

    let valid = password::verify(&input.password, &user.password_hash).map_err(AppError::Internal)?;
    if !valid {
        tracing::warn!(user_id = %user.id, "sign-in with wrong password");
        return Err(AppError::InvalidCredential);
    }

    tracing::info!(user_id = %user.id, "user signed in");
    issue(user, secret)
}

pub async fn current_user(store: &dyn Store, identity: &Identity) -> Result<UserProfile, AppError> {
    let caller = identity.require()?;

    let user = store
        .find_user_by_id(caller.user_id)
        .await?
        .ok_or(AppError::NotAuthenticated)?;

    let wishlist = resolve_wishlist(store, &user.wishlist).await?;
    Ok(UserProfile::new(user, wishlist))
}
