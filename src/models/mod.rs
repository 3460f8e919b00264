mod listing;
mod user;

pub use listing::{Listing, NewListing};
pub use user::{NewUser, User, UserProfile};
