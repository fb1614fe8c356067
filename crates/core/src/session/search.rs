//! Search session: one query, at most one live request.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, warn};

use super::request::RequestSlot;
use super::types::{FetchStatus, SessionState, MOVIE_NOT_FOUND, SEARCH_FAILED};
use crate::movie_api::{MovieApi, MovieApiError, MovieSummary};

/// Tracks the current query and the outcome of its search.
///
/// Each [`SearchSession::set_query`] cancels the previous request before
/// issuing the next one; a superseded request never touches the state.
pub struct SearchSession {
    api: Arc<dyn MovieApi>,
    state: Arc<watch::Sender<SessionState>>,
    slot: RequestSlot,
}

impl SearchSession {
    pub fn new(api: Arc<dyn MovieApi>) -> Self {
        let (tx, _) = watch::channel(SessionState::default());
        Self {
            api,
            state: Arc::new(tx),
            slot: RequestSlot::new(),
        }
    }

    /// Replace the query and restart the fetch cycle.
    ///
    /// An empty query resets to idle without touching the network.
    /// Must be called from within a tokio runtime.
    pub fn set_query(&self, query: impl Into<String>) {
        let query = query.into();

        if query.is_empty() {
            self.slot.cancel();
            self.state.send_modify(|s| {
                *s = SessionState::default();
            });
            return;
        }

        let api = Arc::clone(&self.api);
        let state = Arc::clone(&self.state);
        let loading_query = query.clone();

        let generation = self.slot.begin(
            || {
                self.state.send_modify(|s| {
                    s.query = loading_query;
                    s.results.clear();
                    s.status = FetchStatus::Loading;
                    s.error_message = None;
                });
            },
            move |stamp| async move {
                let Some(result) = stamp.run(api.search(&query)).await else {
                    debug!("search '{}' cancelled", query);
                    return;
                };

                let applied = state.send_if_modified(|s| {
                    if !stamp.is_current() {
                        return false;
                    }
                    apply_result(s, result);
                    true
                });

                if !applied {
                    debug!(
                        "dropping stale search result for '{}' (generation {})",
                        query,
                        stamp.generation()
                    );
                }
            },
        );

        debug!("search generation {} started", generation);
    }

    /// Current state.
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Wait until no request is in flight and return the state at that point.
    pub async fn settled(&self) -> SessionState {
        let mut rx = self.subscribe();
        let state = match rx.wait_for(SessionState::is_settled).await {
            Ok(state) => state.clone(),
            Err(_) => self.state(),
        };
        state
    }
}

fn apply_result(state: &mut SessionState, result: Result<Vec<MovieSummary>, MovieApiError>) {
    match result {
        Ok(results) if results.is_empty() => fail(state, MOVIE_NOT_FOUND.to_string()),
        Ok(results) => {
            state.results = results;
            state.status = FetchStatus::Ready;
            state.error_message = None;
        }
        Err(e) => {
            warn!("search '{}' failed: {}", state.query, e);
            fail(state, search_error_message(&e));
        }
    }
}

fn fail(state: &mut SessionState, message: String) {
    state.results.clear();
    state.status = FetchStatus::Error;
    state.error_message = Some(message);
}

/// User-facing text for a failed search.
pub fn search_error_message(error: &MovieApiError) -> String {
    match error {
        MovieApiError::NotFound(_) => MOVIE_NOT_FOUND.to_string(),
        MovieApiError::ApiError { .. } | MovieApiError::NotConfigured(_) => {
            SEARCH_FAILED.to_string()
        }
        other => other.to_string(),
    }
}
