//! Movie records as returned by the upstream movie API.

use serde::{Deserialize, Serialize};

/// A search hit: just enough to render a result row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieSummary {
    /// Upstream unique identifier (IMDb id, e.g. `tt0372784`).
    pub id: String,
    /// Movie title.
    pub title: String,
    /// Release year as reported upstream (may be a range for series).
    pub year: String,
    /// Poster image URL.
    pub poster_url: String,
    /// Upstream media kind ("movie", "series", "episode").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// Full details for a single movie.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieDetail {
    /// Upstream unique identifier.
    pub id: String,
    /// Movie title.
    pub title: String,
    /// Release year.
    pub year: String,
    /// Poster image URL.
    pub poster_url: String,
    /// Human-readable release date (e.g. "16 Jul 2010").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    /// Runtime in minutes, absent when upstream reports "N/A".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime_minutes: Option<u32>,
    /// Comma separated genre list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    /// Upstream rating (0-10), absent when upstream reports "N/A".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_rating: Option<f64>,
    /// Plot synopsis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plot: Option<String>,
    /// Comma separated lead actors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actors: Option<String>,
    /// Director(s).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub director: Option<String>,
}
