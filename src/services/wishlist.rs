//! Saved listings per user.
//!
//! Both operations are read-modify-write over the user's wishlist without a
//! transaction: two concurrent mutations for the same user race and the
//! last write wins.

use crate::auth::extractor::Identity;
use crate::db::Store;
use crate::error::AppError;
use crate::models::{User, UserProfile};
use crate::services::resolve_wishlist;

async fn load_caller(store: &dyn Store, identity: &Identity) -> Result<User, AppError> {
    let caller = identity.require()?;
    store
        .find_user_by_id(caller.user_id)
        .await?
        .ok_or(AppError::NotAuthenticated)
}

async fn profile(store: &dyn Store, user: User) -> Result<UserProfile, AppError> {
    let wishlist = resolve_wishlist(store, &user.wishlist).await?;
    Ok(UserProfile::new(user, wishlist))
}

/// Appends the listing unless it is already saved.
pub async fn add_to_wishlist(
    store: &dyn Store,
    identity: &Identity,
    listing_id: i64,
) -> Result<UserProfile, AppError> {
    let mut user = load_caller(store, identity).await?;

    if !user.wishlist.contains(&listing_id) {
        store
            .find_listing(listing_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Listing not found".to_string()))?;

        user.wishlist.push(listing_id);
        store.update_wishlist(user.id, &user.wishlist).await?;
        tracing::debug!(user_id = %user.id, listing_id, "wishlist add");
    }

    profile(store, user).await
}

/// Removing a listing that is not saved is a no-op.
pub async fn remove_from_wishlist(
    store: &dyn Store,
    identity: &Identity,
    listing_id: i64,
) -> Result<UserProfile, AppError> {
    let mut user = load_caller(store, identity).await?;

    if user.wishlist.contains(&listing_id) {
        user.wishlist.retain(|id| *id != listing_id);
        store.update_wishlist(user.id, &user.wishlist).await?;
        tracing::debug!(user_id = %user.id, listing_id, "wishlist remove");
    }

    profile(store, user).await
}
