use sqlx::PgPool;

use crate::models::{Listing, NewListing};

pub async fn create(pool: &PgPool, listing: &NewListing) -> Result<Listing, sqlx::Error> {
    sqlx::query_as::<_, Listing>(
        "INSERT INTO listings (name, age, breed, owner_name, owner_contact, description, images)
         VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
    )
    .bind(&listing.name)
    .bind(listing.age)
    .bind(&listing.breed)
    .bind(&listing.owner_name)
    .bind(&listing.owner_contact)
    .bind(&listing.description)
    .bind(&listing.images)
    .fetch_one(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Listing>, sqlx::Error> {
    sqlx::query_as::<_, Listing>("SELECT * FROM listings WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Ascending by id, strictly after `after` when given.
pub async fn list_after(
    pool: &PgPool,
    after: Option<i64>,
    limit: i64,
) -> Result<Vec<Listing>, sqlx::Error> {
    match after {
        Some(after) => {
            sqlx::query_as::<_, Listing>(
                "SELECT * FROM listings WHERE id > $1 ORDER BY id ASC LIMIT $2",
            )
            .bind(after)
            .bind(limit)
            .fetch_all(pool)
            .await
        }
        None => {
            sqlx::query_as::<_, Listing>("SELECT * FROM listings ORDER BY id ASC LIMIT $1")
                .bind(limit)
                .fetch_all(pool)
                .await
        }
    }
}

pub async fn find_by_ids(pool: &PgPool, ids: &[i64]) -> Result<Vec<Listing>, sqlx::Error> {
    sqlx::query_as::<_, Listing>("SELECT * FROM listings WHERE id = ANY($1)")
        .bind(ids)
        .fetch_all(pool)
        .await
}
