use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::db::Store;
use crate::error::AppError;
use crate::models::{Listing, NewListing, NewUser, User};

#[derive(Default)]
struct Inner {
    users: Vec<User>,
    listings: BTreeMap<i64, Listing>,
    next_listing_id: i64,
}

/// In-process store with the same observable behavior as the Postgres one.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn user_count(&self) -> usize {
        self.inner.read().await.users.len()
    }
}

fn user_mut(inner: &mut Inner, id: Uuid) -> Result<&mut User, AppError> {
    inner
        .users
        .iter_mut()
        .find(|u| u.id == id)
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_user(&self, new_user: NewUser) -> Result<User, AppError> {
        let mut inner = self.inner.write().await;
        if inner.users.iter().any(|u| u.email == new_user.email) {
            return Err(AppError::DuplicateIdentity);
        }

        let user = User {
            id: Uuid::now_v7(),
            username: new_user.username,
            email: new_user.email,
            password_hash: new_user.password_hash,
            wishlist: Vec::new(),
            reset_token_hash: None,
            reset_expires_at: None,
            created_at: Utc::now(),
        };
        inner.users.push(user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let inner = self.inner.read().await;
        Ok(inner.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let inner = self.inner.read().await;
        Ok(inner.users.iter().find(|u| u.id == id).cloned())
    }

    async fn set_reset_token(
        &self,
        user_id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        let mut inner = self.inner.write().await;
        let user = user_mut(&mut inner, user_id)?;
        user.reset_token_hash = Some(token_hash.to_string());
        user.reset_expires_at = Some(expires_at);
        Ok(())
    }

    async fn find_user_by_reset_token(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<User>, AppError> {
        let inner = self.inner.read().await;
        Ok(inner
            .users
            .iter()
            .find(|u| {
                u.reset_token_hash.as_deref() == Some(token_hash)
                    && u.reset_expires_at.is_some_and(|exp| exp > now)
            })
            .cloned())
    }

    async fn complete_password_reset(
        &self,
        user_id: Uuid,
        token_hash: &str,
        password_hash: &str,
    ) -> Result<bool, AppError> {
        let mut inner = self.inner.write().await;
        let user = user_mut(&mut inner, user_id)?;
        if user.reset_token_hash.as_deref() != Some(token_hash) {
            return Ok(false);
        }
        user.password_hash = password_hash.to_string();
        user.reset_token_hash = None;
        user.reset_expires_at = None;
        Ok(true)
    }

    async fn update_wishlist(&self, user_id: Uuid, wishlist: &[i64]) -> Result<(), AppError> {
        let mut inner = self.inner.write().await;
        let user = user_mut(&mut inner, user_id)?;
        user.wishlist = wishlist.to_vec();
        Ok(())
    }

    async fn create_listing(&self, listing: NewListing) -> Result<Listing, AppError> {
        let mut inner = self.inner.write().await;
        inner.next_listing_id += 1;
        let listing = Listing {
            id: inner.next_listing_id,
            name: listing.name,
            age: listing.age,
            breed: listing.breed,
            owner_name: listing.owner_name,
            owner_contact: listing.owner_contact,
            description: listing.description,
            images: listing.images,
            created_at: Utc::now(),
        };
        inner.listings.insert(listing.id, listing.clone());
        Ok(listing)
    }

    async fn find_listing(&self, id: i64) -> Result<Option<Listing>, AppError> {
        let inner = self.inner.read().await;
        Ok(inner.listings.get(&id).cloned())
    }

    async fn list_listings_after(
        &self,
        after: Option<i64>,
        limit: i64,
    ) -> Result<Vec<Listing>, AppError> {
        let inner = self.inner.read().await;
        let limit = usize::try_from(limit).unwrap_or(0);
        let rows = match after {
            Some(after) => inner
                .listings
                .range(after.saturating_add(1)..)
                .map(|(_, l)| l.clone())
                .take(limit)
                .collect(),
            None => inner.listings.values().take(limit).cloned().collect(),
        };
        Ok(rows)
    }

    async fn find_listings_by_ids(&self, ids: &[i64]) -> Result<Vec<Listing>, AppError> {
        let inner = self.inner.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| inner.listings.get(id).cloned())
            .collect())
    }
}
