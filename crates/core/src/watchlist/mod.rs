//! The user's persisted list of watched and rated movies.

mod store;
mod types;

pub use store::{AddOutcome, WatchlistStore};
pub use types::*;

use thiserror::Error;

use crate::storage::StorageError;

/// Errors returned by watchlist mutations.
#[derive(Debug, Error)]
pub enum WatchlistError {
    /// The id is already on the list and the policy is `reject`.
    #[error("Movie already on watchlist: {0}")]
    AlreadyWatched(String),

    /// User rating outside 1-10.
    #[error("Rating must be between 1 and 10, got {0}")]
    InvalidRating(u8),

    /// Writing the collection failed. Only returned by explicit `flush`.
    #[error("Failed to persist watchlist: {0}")]
    Persistence(#[from] StorageError),
}
