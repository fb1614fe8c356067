//! The parent controller behind the presentation boundary.
//!
//! Owns the query, the selection and the in-progress rating, and routes user
//! intents to the search session, the detail loader and the watchlist.

mod types;

pub use types::*;

use std::sync::{Arc, Mutex, MutexGuard};

use thiserror::Error;
use tracing::{debug, info};

use crate::movie_api::MovieApi;
use crate::session::{DetailLoader, SearchSession};
use crate::watchlist::{
    DuplicatePolicy, WatchedEntry, WatchlistError, WatchlistStore, WatchlistSummary,
    MAX_USER_RATING, MIN_USER_RATING,
};

/// Errors returned by controller operations.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// A rating was given but no movie is selected.
    #[error("No movie selected")]
    NoSelection,

    /// The selected movie's details have not finished loading.
    #[error("Details for {0} are not loaded")]
    DetailNotReady(String),

    /// Rating outside 1-10.
    #[error("Rating must be between 1 and 10, got {0}")]
    InvalidRating(u8),

    /// The watchlist refused the entry.
    #[error(transparent)]
    Watchlist(#[from] WatchlistError),
}

#[derive(Debug, Default)]
struct Selection {
    query: String,
    selected_id: Option<String>,
    pending_rating: Option<u8>,
    rating_revision_count: u32,
}

impl Selection {
    fn reset_rating(&mut self) {
        self.pending_rating = None;
        self.rating_revision_count = 0;
    }
}

/// Composes search, detail and watchlist.
///
/// All operations are synchronous and cheap; fetches run on spawned tasks
/// and are observed through [`PopcornController::search`] and
/// [`PopcornController::detail`]. Must be used from within a tokio runtime.
pub struct PopcornController {
    search: SearchSession,
    detail: DetailLoader,
    watchlist: Mutex<WatchlistStore>,
    selection: Mutex<Selection>,
}

impl PopcornController {
    pub fn new(api: Arc<dyn MovieApi>, watchlist: WatchlistStore) -> Self {
        Self {
            search: SearchSession::new(Arc::clone(&api)),
            detail: DetailLoader::new(api),
            watchlist: Mutex::new(watchlist),
            selection: Mutex::new(Selection::default()),
        }
    }

    /// Record a new query and restart the search.
    ///
    /// Searching again closes any open detail view.
    pub fn set_query(&self, query: impl Into<String>) {
        let query = query.into();
        let mut selection = self.selection();

        if selection.selected_id.is_some() {
            debug!("new query closes detail view");
        }
        self.close_locked(&mut selection);

        selection.query = query.clone();
        self.search.set_query(query);
    }

    /// Toggle selection of `id`. Returns the selection afterwards.
    pub fn select(&self, id: &str) -> Option<String> {
        let mut selection = self.selection();

        if selection.selected_id.as_deref() == Some(id) {
            self.close_locked(&mut selection);
            return None;
        }

        selection.selected_id = Some(id.to_string());
        selection.reset_rating();
        self.detail.load(id);
        selection.selected_id.clone()
    }

    /// Close the detail view.
    pub fn close_detail(&self) {
        let mut selection = self.selection();
        self.close_locked(&mut selection);
    }

    /// Record an in-progress rating for the selected movie.
    ///
    /// Each change to a different value counts as one revision.
    pub fn set_rating(&self, rating: u8) -> Result<(), ControllerError> {
        let mut selection = self.selection();
        Self::check_rating(&selection, rating)?;
        Self::record_rating(&mut selection, rating);
        Ok(())
    }

    /// Confirm `rating` for the selected movie and add it to the watchlist.
    ///
    /// On success the detail view closes and the new entry is returned. A
    /// refused confirm leaves the pending rating untouched.
    pub fn confirm_rating(&self, rating: u8) -> Result<WatchedEntry, ControllerError> {
        let mut selection = self.selection();
        let id = Self::check_rating(&selection, rating)?;

        let detail_state = self.detail.state();
        let detail = detail_state
            .ready_detail(&id)
            .ok_or_else(|| ControllerError::DetailNotReady(id.clone()))?;

        let mut watchlist = self.watchlist();
        if watchlist.policy() == DuplicatePolicy::Reject && watchlist.contains(&id) {
            return Err(WatchlistError::AlreadyWatched(id).into());
        }

        Self::record_rating(&mut selection, rating);
        let entry = WatchedEntry::from_detail(detail, rating, selection.rating_revision_count);
        watchlist.add(entry.clone())?;
        drop(watchlist);

        info!(
            "Added {} ({}) to watchlist with rating {}",
            entry.title, entry.id, entry.user_rating
        );

        self.close_locked(&mut selection);
        Ok(entry)
    }

    /// Remove a movie from the watchlist. Returns how many entries went.
    pub fn remove_watched(&self, id: &str) -> usize {
        self.watchlist().remove(id)
    }

    pub fn query(&self) -> String {
        self.selection().query.clone()
    }

    pub fn selected_id(&self) -> Option<String> {
        self.selection().selected_id.clone()
    }

    pub fn watchlist_entries(&self) -> Vec<WatchedEntry> {
        self.watchlist().entries().to_vec()
    }

    pub fn watchlist_summary(&self) -> WatchlistSummary {
        self.watchlist().summary()
    }

    /// Retry persisting the watchlist.
    pub fn flush_watchlist(&self) -> Result<(), ControllerError> {
        Ok(self.watchlist().flush()?)
    }

    pub fn search(&self) -> &SearchSession {
        &self.search
    }

    pub fn detail(&self) -> &DetailLoader {
        &self.detail
    }

    /// Everything a view needs to render.
    pub fn snapshot(&self) -> ControllerSnapshot {
        let selection = self.selection();
        let watchlist = self.watchlist();

        let watched_rating = selection
            .selected_id
            .as_deref()
            .and_then(|id| watchlist.get(id))
            .map(|entry| entry.user_rating);

        ControllerSnapshot {
            query: selection.query.clone(),
            search: self.search.state(),
            selected_id: selection.selected_id.clone(),
            detail: self.detail.state(),
            pending_rating: selection.pending_rating,
            rating_revision_count: selection.rating_revision_count,
            watched_rating,
            watchlist: watchlist.entries().to_vec(),
            summary: watchlist.summary(),
            watchlist_dirty: watchlist.is_dirty(),
        }
    }

    /// Validate `rating` against the current selection, returning its id.
    fn check_rating(selection: &Selection, rating: u8) -> Result<String, ControllerError> {
        if !(MIN_USER_RATING..=MAX_USER_RATING).contains(&rating) {
            return Err(ControllerError::InvalidRating(rating));
        }
        selection
            .selected_id
            .clone()
            .ok_or(ControllerError::NoSelection)
    }

    fn record_rating(selection: &mut Selection, rating: u8) {
        if selection.pending_rating != Some(rating) {
            selection.rating_revision_count += 1;
            selection.pending_rating = Some(rating);
        }
    }

    fn close_locked(&self, selection: &mut Selection) {
        selection.selected_id = None;
        selection.reset_rating();
        self.detail.clear();
    }

    fn selection(&self) -> MutexGuard<'_, Selection> {
        self.selection.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn watchlist(&self) -> MutexGuard<'_, WatchlistStore> {
        self.watchlist.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::FetchStatus;
    use crate::storage::{KeyValueStore, MemoryKeyValueStore};
    use crate::testing::{fixtures, MockMovieApi};

    async fn controller() -> (Arc<MockMovieApi>, PopcornController) {
        let api = Arc::new(MockMovieApi::new());
        api.set_search_results("batman", fixtures::batman_results())
            .await;
        api.add_detail(fixtures::inception()).await;
        api.add_detail(fixtures::back_to_the_future()).await;

        let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryKeyValueStore::new());
        let watchlist = WatchlistStore::load(storage, "watched", DuplicatePolicy::Reject);
        let controller = PopcornController::new(Arc::clone(&api) as Arc<dyn MovieApi>, watchlist);
        (api, controller)
    }

    #[tokio::test]
    async fn test_select_toggles() {
        let (_, c) = controller().await;
        assert_eq!(c.select("tt1375666").as_deref(), Some("tt1375666"));
        assert_eq!(c.select("tt1375666"), None);
        assert_eq!(c.detail().state().status, FetchStatus::Idle);
    }

    #[tokio::test]
    async fn test_set_query_closes_detail() {
        let (_, c) = controller().await;
        c.select("tt1375666");
        c.detail().settled().await;

        c.set_query("batman");
        assert!(c.selected_id().is_none());
        assert!(c.detail().state().selected_id.is_none());
        assert_eq!(c.query(), "batman");
    }

    #[tokio::test]
    async fn test_rating_revisions_count_changes_only() {
        let (_, c) = controller().await;
        c.select("tt1375666");

        c.set_rating(6).unwrap();
        c.set_rating(6).unwrap();
        c.set_rating(8).unwrap();

        let snapshot = c.snapshot();
        assert_eq!(snapshot.pending_rating, Some(8));
        assert_eq!(snapshot.rating_revision_count, 2);
    }

    #[tokio::test]
    async fn test_rating_requires_selection_and_range() {
        let (_, c) = controller().await;
        assert!(matches!(c.set_rating(5), Err(ControllerError::NoSelection)));
        c.select("tt1375666");
        assert!(matches!(
            c.set_rating(0),
            Err(ControllerError::InvalidRating(0))
        ));
        assert!(matches!(
            c.set_rating(11),
            Err(ControllerError::InvalidRating(11))
        ));
    }

    #[tokio::test]
    async fn test_confirm_before_detail_loaded_fails() {
        let (api, c) = controller().await;
        api.set_delay("tt1375666", std::time::Duration::from_millis(200))
            .await;
        c.select("tt1375666");

        assert!(matches!(
            c.confirm_rating(9),
            Err(ControllerError::DetailNotReady(_))
        ));
        assert!(c.watchlist_entries().is_empty());
    }

    #[tokio::test]
    async fn test_confirm_adds_entry_and_closes() {
        let (_, c) = controller().await;
        c.select("tt1375666");
        c.detail().settled().await;

        c.set_rating(7).unwrap();
        let entry = c.confirm_rating(9).unwrap();

        assert_eq!(entry.id, "tt1375666");
        assert_eq!(entry.user_rating, 9);
        assert_eq!(entry.rating_revision_count, 2);
        assert_eq!(entry.runtime_minutes, 148);
        assert!(c.selected_id().is_none());
        assert_eq!(c.watchlist_entries(), vec![entry]);
    }

    #[tokio::test]
    async fn test_snapshot_reports_watched_rating() {
        let (_, c) = controller().await;
        c.select("tt1375666");
        c.detail().settled().await;
        c.confirm_rating(9).unwrap();

        c.select("tt1375666");
        let snapshot = c.snapshot();
        assert_eq!(snapshot.watched_rating, Some(9));

        c.detail().settled().await;
        let result = c.confirm_rating(4);
        assert!(matches!(
            result,
            Err(ControllerError::Watchlist(WatchlistError::AlreadyWatched(_)))
        ));
    }

    #[tokio::test]
    async fn test_remove_watched() {
        let (_, c) = controller().await;
        c.select("tt0088763");
        c.detail().settled().await;
        c.confirm_rating(10).unwrap();

        assert_eq!(c.remove_watched("tt0088763"), 1);
        assert_eq!(c.remove_watched("tt0088763"), 0);
        assert_eq!(c.watchlist_summary().count, 0);
    }

    #[tokio::test]
    async fn test_refused_confirm_keeps_pending_rating() {
        let (api, c) = controller().await;
        api.set_delay("tt1375666", std::time::Duration::from_millis(200))
            .await;
        c.select("tt1375666");
        c.set_rating(6).unwrap();

        assert!(matches!(
            c.confirm_rating(9),
            Err(ControllerError::DetailNotReady(_))
        ));
        let snapshot = c.snapshot();
        assert_eq!(snapshot.pending_rating, Some(6));
        assert_eq!(snapshot.rating_revision_count, 1);
    }

    #[tokio::test]
    async fn test_duplicate_confirm_keeps_pending_rating() {
        let (_, c) = controller().await;
        c.select("tt1375666");
        c.detail().settled().await;
        c.confirm_rating(9).unwrap();

        c.select("tt1375666");
        c.detail().settled().await;
        c.set_rating(3).unwrap();
        assert!(c.confirm_rating(4).is_err());

        let snapshot = c.snapshot();
        assert_eq!(snapshot.pending_rating, Some(3));
        assert_eq!(snapshot.rating_revision_count, 1);
        assert_eq!(c.watchlist_entries().len(), 1);
    }
}
