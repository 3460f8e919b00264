use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;

use crate::auth::extractor::Identity;
use crate::error::AppError;
use crate::models::Listing;
use crate::services::listings::{self, Connection, ListListingsParams, NewListingInput};
use crate::state::SharedState;
use crate::upload::{self, ListingForm};

pub async fn list(
    State(state): State<SharedState>,
    Query(params): Query<ListListingsParams>,
) -> Result<Json<Connection<Listing>>, AppError> {
    let page = listings::list_listings(state.store.as_ref(), params).await?;
    Ok(Json(page))
}

pub async fn get(
    identity: Identity,
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> Result<Json<Listing>, AppError> {
    let listing = listings::get_listing(state.store.as_ref(), &identity, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Listing not found".to_string()))?;
    Ok(Json(listing))
}

pub async fn create(
    identity: Identity,
    State(state): State<SharedState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Listing>, AppError> {
    // Reject before reading any multipart content.
    identity.require()?;

    let form = upload::parse_listing_form(&headers, body)
        .await
        .map_err(AppError::BadRequest)?;
    let (input, images) = listing_input(form)?;

    let listing = listings::create_listing(
        state.store.as_ref(),
        state.images.as_ref(),
        &identity,
        input,
        images,
    )
    .await?;
    Ok(Json(listing))
}

fn listing_input(
    mut form: ListingForm,
) -> Result<(NewListingInput, Vec<crate::storage::ImageUpload>), AppError> {
    let mut take = |field: &str| form.fields.remove(field).unwrap_or_default();

    let name = take("name");
    let age_raw = take("age");
    let breed = take("breed");
    let owner_name = take("owner_name");
    let owner_contact = take("owner_contact");
    let description = take("description");

    let age: i32 = age_raw
        .trim()
        .parse()
        .map_err(|_| AppError::BadRequest(format!("Invalid age '{age_raw}'")))?;

    Ok((
        NewListingInput {
            name,
            age,
            breed,
            owner_name,
            owner_contact,
            description,
        },
        form.images,
    ))
}
