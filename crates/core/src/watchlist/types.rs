use serde::{Deserialize, Serialize};

use crate::movie_api::MovieDetail;

/// Lowest accepted user rating.
pub const MIN_USER_RATING: u8 = 1;
/// Highest accepted user rating.
pub const MAX_USER_RATING: u8 = 10;

/// A movie the user has watched and rated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchedEntry {
    /// Upstream movie id.
    pub id: String,
    pub title: String,
    pub year: String,
    pub poster_url: String,
    /// Upstream rating at the time the entry was created (0 when unknown).
    pub external_rating: f64,
    /// Runtime in minutes (0 when unknown).
    pub runtime_minutes: u32,
    /// The user's own rating, 1-10.
    pub user_rating: u8,
    /// How many times the user changed their mind before confirming.
    pub rating_revision_count: u32,
}

impl WatchedEntry {
    /// Build an entry from loaded movie details and the user's decision.
    pub fn from_detail(detail: &MovieDetail, user_rating: u8, rating_revision_count: u32) -> Self {
        Self {
            id: detail.id.clone(),
            title: detail.title.clone(),
            year: detail.year.clone(),
            poster_url: detail.poster_url.clone(),
            external_rating: detail.external_rating.unwrap_or(0.0),
            runtime_minutes: detail.runtime_minutes.unwrap_or(0),
            user_rating,
            rating_revision_count,
        }
    }
}

/// What to do when an entry is added for an id already on the list.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Refuse the new entry.
    #[default]
    Reject,
    /// Swap the existing entry for the new one, keeping its position.
    Replace,
    /// Keep both entries.
    Allow,
}

/// Aggregates over the current watchlist, recomputed on demand.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WatchlistSummary {
    pub count: usize,
    pub average_external_rating: f64,
    pub average_user_rating: f64,
    pub average_runtime: f64,
}

impl WatchlistSummary {
    /// Averages over an empty list are 0.
    pub fn from_entries(entries: &[WatchedEntry]) -> Self {
        Self {
            count: entries.len(),
            average_external_rating: average(entries.iter().map(|e| e.external_rating)),
            average_user_rating: average(entries.iter().map(|e| f64::from(e.user_rating))),
            average_runtime: average(entries.iter().map(|e| f64::from(e.runtime_minutes))),
        }
    }
}

fn average(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}
