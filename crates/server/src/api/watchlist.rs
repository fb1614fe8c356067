//! Watchlist API handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use popcorn_core::{WatchedEntry, WatchlistSummary};

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct WatchlistResponse {
    pub entries: Vec<WatchedEntry>,
    pub summary: WatchlistSummary,
}

#[derive(Debug, Serialize)]
pub struct RemoveResponse {
    pub removed: usize,
}

/// GET /api/v1/watchlist
pub async fn list_watchlist(State(state): State<Arc<AppState>>) -> Json<WatchlistResponse> {
    let controller = state.controller();
    Json(WatchlistResponse {
        entries: controller.watchlist_entries(),
        summary: controller.watchlist_summary(),
    })
}

/// DELETE /api/v1/watchlist/{id}
///
/// Removing an id that is not on the list succeeds with `removed: 0`.
pub async fn remove_watched(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Json<RemoveResponse> {
    let removed = state.controller().remove_watched(&id);
    Json(RemoveResponse { removed })
}
