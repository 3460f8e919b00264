use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize, Deserialize)]
pub struct Listing {
    pub id: i64,
    pub name: String,
    pub age: i32,
    pub breed: String,
    pub owner_name: String,
    pub owner_contact: String,
    pub description: String,
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewListing {
    pub name: String,
    pub age: i32,
    pub breed: String,
    pub owner_name: String,
    pub owner_contact: String,
    pub description: String,
    pub images: Vec<String>,
}
