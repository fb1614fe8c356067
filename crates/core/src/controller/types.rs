use serde::Serialize;

use crate::session::{DetailState, SessionState};
use crate::watchlist::{WatchedEntry, WatchlistSummary};

/// Point-in-time view of the controller.
#[derive(Debug, Clone, Serialize)]
pub struct ControllerSnapshot {
    pub query: String,
    pub search: SessionState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_id: Option<String>,
    pub detail: DetailState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_rating: Option<u8>,
    pub rating_revision_count: u32,
    /// The user's existing rating when the selected movie is already watched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub watched_rating: Option<u8>,
    pub watchlist: Vec<WatchedEntry>,
    pub summary: WatchlistSummary,
    /// Storage is behind memory after a failed write.
    pub watchlist_dirty: bool,
}
