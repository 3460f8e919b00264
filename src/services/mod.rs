pub mod credentials;
pub mod listings;
pub mod password_reset;
pub mod wishlist;

use std::collections::HashMap;

use crate::db::Store;
use crate::error::AppError;
use crate::models::Listing;

/// Full listing records for wishlist ids, in wishlist order.
pub(crate) async fn resolve_wishlist(
    store: &dyn Store,
    ids: &[i64],
) -> Result<Vec<Listing>, AppError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut by_id: HashMap<i64, Listing> = store
        .find_listings_by_ids(ids)
        .await?
        .into_iter()
        .map(|l| (l.id, l))
        .collect();

    Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
}
