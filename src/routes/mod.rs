pub mod auth;
pub mod listings;
pub mod me;

use axum::routing::{get, post, put};
use axum::Router;

use crate::state::SharedState;

pub fn api_routes() -> Router<SharedState> {
    Router::new()
        // Auth
        .route("/api/v1/auth/sign-up", post(auth::sign_up))
        .route("/api/v1/auth/sign-in", post(auth::sign_in))
        .route("/api/v1/auth/forgot-password", post(auth::forgot_password))
        .route("/api/v1/auth/reset-password", post(auth::reset_password))
        // Listings
        .route("/api/v1/listings", get(listings::list).post(listings::create))
        .route("/api/v1/listings/{id}", get(listings::get))
        // Current user
        .route("/api/v1/me", get(me::me))
        .route(
            "/api/v1/me/wishlist/{listing_id}",
            put(me::add_to_wishlist).delete(me::remove_from_wishlist),
        )
}
