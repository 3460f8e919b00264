//! Persistence collaborator.
//!
//! Services only see [`Store`]. [`PgStore`] backs production and
//! [`MemoryStore`] keeps everything in process for tests and embedding.
//! Writes are per record; there are no multi-record transactions.

pub mod listings;
pub mod memory;
pub mod users;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Listing, NewListing, NewUser, User};

pub use memory::MemoryStore;

#[async_trait]
pub trait Store: Send + Sync {
    /// Fails with `DuplicateIdentity` when the email is taken.
    async fn create_user(&self, new_user: NewUser) -> Result<User, AppError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;

    async fn set_reset_token(
        &self,
        user_id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AppError>;
    /// Matches the hash and `expires_at > now` in a single lookup.
    async fn find_user_by_reset_token(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<User>, AppError>;
    /// Replaces the password hash and clears both reset fields, only while
    /// `token_hash` is still the stored one. Returns false when it is not.
    async fn complete_password_reset(
        &self,
        user_id: Uuid,
        token_hash: &str,
        password_hash: &str,
    ) -> Result<bool, AppError>;

    async fn update_wishlist(&self, user_id: Uuid, wishlist: &[i64]) -> Result<(), AppError>;

    async fn create_listing(&self, listing: NewListing) -> Result<Listing, AppError>;
    async fn find_listing(&self, id: i64) -> Result<Option<Listing>, AppError>;
    /// Up to `limit` listings with id greater than `after`, ascending by id.
    async fn list_listings_after(
        &self,
        after: Option<i64>,
        limit: i64,
    ) -> Result<Vec<Listing>, AppError>;
    /// Listings for the given ids, in no particular order. Unknown ids are skipped.
    async fn find_listings_by_ids(&self, ids: &[i64]) -> Result<Vec<Listing>, AppError>;
}

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PgStore {
    async fn create_user(&self, new_user: NewUser) -> Result<User, AppError> {
        Ok(users::create(&self.pool, &new_user).await?)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(users::find_by_email(&self.pool, email).await?)
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(users::find_by_id(&self.pool, id).await?)
    }

    async fn set_reset_token(
        &self,
        user_id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        Ok(users::set_reset_token(&self.pool, user_id, token_hash, expires_at).await?)
    }

    async fn find_user_by_reset_token(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<User>, AppError> {
        Ok(users::find_by_reset_token(&self.pool, token_hash, now).await?)
    }

    async fn complete_password_reset(
        &self,
        user_id: Uuid,
        token_hash: &str,
        password_hash: &str,
    ) -> Result<bool, AppError> {
        Ok(users::complete_password_reset(&self.pool, user_id, token_hash, password_hash).await?)
    }

    async fn update_wishlist(&self, user_id: Uuid, wishlist: &[i64]) -> Result<(), AppError> {
        Ok(users::update_wishlist(&self.pool, user_id, wishlist).await?)
    }

    async fn create_listing(&self, listing: NewListing) -> Result<Listing, AppError> {
        Ok(listings::create(&self.pool, &listing).await?)
    }

    async fn find_listing(&self, id: i64) -> Result<Option<Listing>, AppError> {
        Ok(listings::find_by_id(&self.pool, id).await?)
    }

    async fn list_listings_after(
        &self,
        after: Option<i64>,
        limit: i64,
    ) -> Result<Vec<Listing>, AppError> {
        Ok(listings::list_after(&self.pool, after, limit).await?)
    }

    async fn find_listings_by_ids(&self, ids: &[i64]) -> Result<Vec<Listing>, AppError> {
        Ok(listings::find_by_ids(&self.pool, ids).await?)
    }
}
