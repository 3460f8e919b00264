use axum::extract::{Path, State};
use axum::Json;

use crate::auth::extractor::Identity;
use crate::error::AppError;
use crate::models::UserProfile;
use crate::services::{credentials, wishlist};
use crate::state::SharedState;

pub async fn me(
    identity: Identity,
    State(state): State<SharedState>,
) -> Result<Json<UserProfile>, AppError> {
    let profile = credentials::current_user(state.store.as_ref(), &identity).await?;
    Ok(Json(profile))
}

pub async fn add_to_wishlist(
    identity: Identity,
    State(state): State<SharedState>,
    Path(listing_id): Path<i64>,
) -> Result<Json<UserProfile>, AppError> {
    let profile = wishlist::add_to_wishlist(state.store.as_ref(), &identity, listing_id).await?;
    Ok(Json(profile))
}

pub async fn remove_from_wishlist(
    identity: Identity,
    State(state): State<SharedState>,
    Path(listing_id): Path<i64>,
) -> Result<Json<UserProfile>, AppError> {
    let profile =
        wishlist::remove_from_wishlist(state.store.as_ref(), &identity, listing_id).await?;
    Ok(Json(profile))
}
