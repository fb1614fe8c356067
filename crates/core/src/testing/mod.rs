//! Testing utilities and mock implementations.
//!
//! # Example
//!
//! ```rust,ignore
//! use popcorn_core::testing::{fixtures, MockMovieApi};
//!
//! let api = MockMovieApi::new();
//! api.set_search_results("batman", fixtures::batman_results()).await;
//! api.add_detail(fixtures::inception()).await;
//! ```

mod mock_movie_api;

pub use mock_movie_api::{MockMovieApi, RecordedMovieQuery};

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::movie_api::{MovieDetail, MovieSummary};
    use crate::watchlist::WatchedEntry;

    /// Create a search hit with reasonable defaults.
    pub fn movie_summary(id: &str, title: &str) -> MovieSummary {
        MovieSummary {
            id: id.to_string(),
            title: title.to_string(),
            year: "2005".to_string(),
            poster_url: format!("https://example.com/posters/{}.jpg", id),
            kind: Some("movie".to_string()),
        }
    }

    /// Two hits for "batman".
    pub fn batman_results() -> Vec<MovieSummary> {
        vec![
            movie_summary("tt0372784", "Batman Begins"),
            MovieSummary {
                year: "2022".to_string(),
                ..movie_summary("tt1877830", "The Batman")
            },
        ]
    }

    /// Create a movie detail.
    pub fn movie_detail(id: &str, title: &str, rating: f64, runtime_minutes: u32) -> MovieDetail {
        MovieDetail {
            id: id.to_string(),
            title: title.to_string(),
            year: "2010".to_string(),
            poster_url: format!("https://example.com/posters/{}.jpg", id),
            release_date: Some("16 Jul 2010".to_string()),
            runtime_minutes: Some(runtime_minutes),
            genre: Some("Drama".to_string()),
            external_rating: Some(rating),
            plot: Some(format!("A movie about {}.", title.to_lowercase())),
            actors: Some("Someone Famous".to_string()),
            director: Some("Somebody Else".to_string()),
        }
    }

    pub fn inception() -> MovieDetail {
        movie_detail("tt1375666", "Inception", 8.8, 148)
    }

    pub fn back_to_the_future() -> MovieDetail {
        MovieDetail {
            year: "1985".to_string(),
            ..movie_detail("tt0088763", "Back to the Future", 8.5, 116)
        }
    }

    /// Create a watched entry.
    pub fn watched_entry(id: &str, user_rating: u8) -> WatchedEntry {
        WatchedEntry::from_detail(&movie_detail(id, &format!("Movie {}", id), 8.0, 120), user_rating, 1)
    }
}
