//! Upstream movie database integration.
//!
//! The rest of the crate only sees the [`MovieApi`] trait; [`OmdbClient`] is
//! the production implementation and `testing::MockMovieApi` stands in for it
//! in tests.

mod omdb;
mod types;

pub use omdb::{OmdbClient, OmdbConfig};
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when talking to the upstream movie API.
#[derive(Debug, Error)]
pub enum MovieApiError {
    /// Transport-level failure (connect, timeout, body read).
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Upstream explicitly reported no match.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Upstream answered with a non-success HTTP status.
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Client not configured or rejected (missing/invalid API key).
    #[error("Client not configured: {0}")]
    NotConfigured(String),
}

impl MovieApiError {
    /// Whether this is the upstream "no match" indicator rather than a
    /// network or protocol failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, MovieApiError::NotFound(_))
    }
}

/// Read-only access to a movie database.
#[async_trait]
pub trait MovieApi: Send + Sync {
    /// Search movies by title.
    ///
    /// Returns [`MovieApiError::NotFound`] when upstream reports no results.
    async fn search(&self, query: &str) -> Result<Vec<MovieSummary>, MovieApiError>;

    /// Fetch full details for one movie id.
    async fn get_detail(&self, id: &str) -> Result<MovieDetail, MovieApiError>;
}
