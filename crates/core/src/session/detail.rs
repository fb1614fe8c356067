//! Loader for the selected movie's details.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, warn};

use super::request::RequestSlot;
use super::types::{DetailState, FetchStatus, DETAIL_FAILED};
use crate::movie_api::MovieApi;

/// Loads full details for one movie id at a time.
///
/// Loading a new id supersedes any in-flight load, so a slow response for a
/// previous selection can never replace the current one.
pub struct DetailLoader {
    api: Arc<dyn MovieApi>,
    state: Arc<watch::Sender<DetailState>>,
    slot: RequestSlot,
}

impl DetailLoader {
    pub fn new(api: Arc<dyn MovieApi>) -> Self {
        let (tx, _) = watch::channel(DetailState::default());
        Self {
            api,
            state: Arc::new(tx),
            slot: RequestSlot::new(),
        }
    }

    /// Start loading `id`. Must be called from within a tokio runtime.
    pub fn load(&self, id: impl Into<String>) {
        let id = id.into();
        let api = Arc::clone(&self.api);
        let state = Arc::clone(&self.state);
        let selected = id.clone();

        self.slot.begin(
            || {
                self.state.send_modify(|s| {
                    s.selected_id = Some(selected);
                    s.detail = None;
                    s.status = FetchStatus::Loading;
                    s.error_message = None;
                });
            },
            move |stamp| async move {
                let Some(result) = stamp.run(api.get_detail(&id)).await else {
                    debug!("detail request for {} cancelled", id);
                    return;
                };

                state.send_if_modified(|s| {
                    if !stamp.is_current() {
                        debug!("dropping stale detail for {}", id);
                        return false;
                    }
                    match result {
                        Ok(detail) => {
                            s.detail = Some(detail);
                            s.status = FetchStatus::Ready;
                            s.error_message = None;
                        }
                        Err(e) => {
                            if e.is_not_found() {
                                debug!("no detail upstream for {}: {}", id, e);
                            } else {
                                warn!("detail request for {} failed: {}", id, e);
                            }
                            s.detail = None;
                            s.status = FetchStatus::Error;
                            s.error_message = Some(DETAIL_FAILED.to_string());
                        }
                    }
                    true
                });
            },
        );
    }

    /// Cancel any load and forget the selection.
    pub fn clear(&self) {
        self.slot.cancel();
        self.state.send_modify(|s| *s = DetailState::default());
    }

    pub fn state(&self) -> DetailState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<DetailState> {
        self.state.subscribe()
    }

    /// Wait until no load is in flight.
    pub async fn settled(&self) -> DetailState {
        let mut rx = self.subscribe();
        let state = match rx.wait_for(DetailState::is_settled).await {
            Ok(state) => state.clone(),
            Err(_) => self.state(),
        };
        state
    }
}
