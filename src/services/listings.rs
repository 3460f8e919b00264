//! Listing catalog: cursor pagination, lookup and creation.
//!
//! Cursors are listing ids rendered as decimal strings. Pages are ordered by
//! ascending id, which is insertion order.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::extractor::Identity;
use crate::db::Store;
use crate::error::AppError;
use crate::models::{Listing, NewListing};
use crate::storage::{object_key, ImageKind, ImageStore, ImageUpload};

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge<T> {
    pub cursor: String,
    pub node: T,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageInfo {
    /// Cursor of the last edge, `None` when the page is empty.
    pub end_cursor: Option<String>,
    pub has_next_page: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection<T> {
    pub edges: Vec<Edge<T>>,
    pub page_info: PageInfo,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListListingsParams {
    pub first: Option<i64>,
    pub after: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewListingInput {
    pub name: String,
    pub age: i32,
    pub breed: String,
    pub owner_name: String,
    pub owner_contact: String,
    pub description: String,
}

pub fn encode_cursor(id: i64) -> String {
    id.to_string()
}

pub fn decode_cursor(cursor: &str) -> Result<i64, AppError> {
    cursor
        .trim()
        .parse::<i64>()
        .map_err(|_| AppError::InvalidCursor(format!("'{cursor}' is not a listing cursor")))
}

/// Build a page from up to `first + 1` ascending rows. The extra row only
/// signals that another page exists.
pub fn build_connection(mut rows: Vec<Listing>, first: usize) -> Connection<Listing> {
    let has_next_page = rows.len() > first;
    rows.truncate(first);

    let edges: Vec<Edge<Listing>> = rows
        .into_iter()
        .map(|listing| Edge {
            cursor: encode_cursor(listing.id),
            node: listing,
        })
        .collect();
    let end_cursor = edges.last().map(|edge| edge.cursor.clone());

    Connection {
        edges,
        page_info: PageInfo {
            end_cursor,
            has_next_page,
        },
    }
}

pub async fn list_listings(
    store: &dyn Store,
    params: ListListingsParams,
) -> Result<Connection<Listing>, AppError> {
    let first = params.first.unwrap_or(DEFAULT_PAGE_SIZE);
    if first < 0 {
        return Err(AppError::BadRequest(
            "first must be zero or greater".to_string(),
        ));
    }
    let first = first.min(MAX_PAGE_SIZE);

    let after = params.after.as_deref().map(decode_cursor).transpose()?;

    let rows = store.list_listings_after(after, first + 1).await?;
    Ok(build_connection(rows, first as usize))
}

pub async fn get_listing(
    store: &dyn Store,
    identity: &Identity,
    id: i64,
) -> Result<Option<Listing>, AppError> {
    identity.require()?;
    store.find_listing(id).await
}

fn required(field: &str, value: String) -> Result<String, AppError> {
    let value = value.trim().to_string();
    if value.is_empty() {
        return Err(AppError::BadRequest(format!("{field} is required")));
    }
    Ok(value)
}

pub async fn create_listing(
    store: &dyn Store,
    images: &dyn ImageStore,
    identity: &Identity,
    input: NewListingInput,
    uploads: Vec<ImageUpload>,
) -> Result<Listing, AppError> {
    let caller = identity.require()?;

    if input.age < 0 {
        return Err(AppError::BadRequest("age must be zero or greater".to_string()));
    }
    let name = required("name", input.name)?;
    let breed = required("breed", input.breed)?;
    let owner_name = required("owner_name", input.owner_name)?;
    let owner_contact = required("owner_contact", input.owner_contact)?;
    let description = required("description", input.description)?;

    let mut checked = Vec::with_capacity(uploads.len());
    for upload in uploads {
        let Some(kind) = ImageKind::sniff(&upload.bytes) else {
            return Err(AppError::BadRequest(format!(
                "'{}' ({}) is not a PNG, JPEG, GIF or WebP image",
                upload.filename, upload.content_type
            )));
        };
        checked.push((kind, upload));
    }

    let mut locators = Vec::with_capacity(checked.len());
    for (kind, upload) in checked {
        let key = object_key(&Uuid::now_v7().to_string(), &upload.filename, kind);
        let locator = images
            .put(&key, upload.bytes, kind.mime())
            .await
            .map_err(|e| AppError::Upstream(format!("Failed to store image: {e}")))?;
        locators.push(locator);
    }

    let listing = store
        .create_listing(NewListing {
            name,
            age: input.age,
            breed,
            owner_name,
            owner_contact,
            description,
            images: locators,
        })
        .await?;

    tracing::info!(listing_id = listing.id, user_id = %caller.user_id, "listing created");
    Ok(listing)
}
