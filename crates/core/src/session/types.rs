use serde::Serialize;

use crate::movie_api::{MovieDetail, MovieSummary};

/// Shown when upstream reports no match for a search.
pub const MOVIE_NOT_FOUND: &str = "Movie not found";
/// Shown when the search endpoint answers with a failing HTTP status.
pub const SEARCH_FAILED: &str = "Something went wrong with fetching movies";
/// Shown for any detail fetch failure.
pub const DETAIL_FAILED: &str = "Error fetching data";

/// Progress of a fetch cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Error,
}

/// State of the current search query.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionState {
    pub query: String,
    pub results: Vec<MovieSummary>,
    pub status: FetchStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl SessionState {
    /// No request in flight.
    pub fn is_settled(&self) -> bool {
        self.status != FetchStatus::Loading
    }
}

/// State of the selected-movie detail view.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DetailState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<MovieDetail>,
    pub status: FetchStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl DetailState {
    pub fn is_settled(&self) -> bool {
        self.status != FetchStatus::Loading
    }

    /// The loaded detail, if it belongs to `id` and finished loading.
    pub fn ready_detail(&self, id: &str) -> Option<&MovieDetail> {
        match (&self.detail, self.status) {
            (Some(detail), FetchStatus::Ready) if detail.id == id => Some(detail),
            _ => None,
        }
    }
}
