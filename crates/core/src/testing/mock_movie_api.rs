//! Mock movie API for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::movie_api::{MovieApi, MovieApiError, MovieDetail, MovieSummary};

/// A recorded upstream call for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedMovieQuery {
    Search { query: String },
    GetDetail { id: String },
}

/// Mock implementation of the MovieApi trait.
///
/// Provides controllable behavior for testing:
/// - Return configurable search results and details
/// - Delay individual queries/ids to provoke out-of-order responses
/// - Track queries for assertions
/// - Simulate failures
///
/// Unknown queries and ids answer [`MovieApiError::NotFound`], like OMDb's
/// `"Response": "False"`.
///
/// # Example
///
/// ```rust,ignore
/// use popcorn_core::testing::{MockMovieApi, fixtures};
///
/// let api = MockMovieApi::new();
/// api.set_search_results("batman", fixtures::batman_results()).await;
/// api.set_delay("batman", Duration::from_millis(50)).await;
///
/// let results = api.search("batman").await?;
/// assert_eq!(results.len(), 2);
/// ```
#[derive(Debug)]
pub struct MockMovieApi {
    /// Search results by exact query.
    searches: Arc<RwLock<HashMap<String, Vec<MovieSummary>>>>,
    /// Details by movie id.
    details: Arc<RwLock<HashMap<String, MovieDetail>>>,
    /// Artificial latency by query or id.
    delays: Arc<RwLock<HashMap<String, Duration>>>,
    /// Recorded queries.
    queries: Arc<RwLock<Vec<RecordedMovieQuery>>>,
    /// If set, the next operation will fail with this error.
    next_error: Arc<RwLock<Option<MovieApiError>>>,
    /// One-shot failures for a specific query or id.
    key_errors: Arc<RwLock<HashMap<String, MovieApiError>>>,
}

impl Default for MockMovieApi {
    fn default() -> Self {
        Self::new()
    }
}

impl MockMovieApi {
    /// Create a new empty mock.
    pub fn new() -> Self {
        Self {
            searches: Arc::new(RwLock::new(HashMap::new())),
            details: Arc::new(RwLock::new(HashMap::new())),
            delays: Arc::new(RwLock::new(HashMap::new())),
            queries: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
            key_errors: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    /// Set the results returned for `query`.
    pub async fn set_search_results(&self, query: &str, results: Vec<MovieSummary>) {
        self.searches
            .write()
            .await
            .insert(query.to_string(), results);
    }

    /// Add a movie detail.
    pub async fn add_detail(&self, detail: MovieDetail) {
        self.details.write().await.insert(detail.id.clone(), detail);
    }

    /// Delay responses for a query (search) or id (detail).
    pub async fn set_delay(&self, key: &str, delay: Duration) {
        self.delays.write().await.insert(key.to_string(), delay);
    }

    // =========================================================================
    // Query Recording
    // =========================================================================

    /// Get all recorded queries.
    pub async fn recorded_queries(&self) -> Vec<RecordedMovieQuery> {
        self.queries.read().await.clone()
    }

    /// Get the number of queries performed.
    pub async fn query_count(&self) -> usize {
        self.queries.read().await.len()
    }

    // =========================================================================
    // Error Injection
    // =========================================================================

    /// Configure the next operation to fail with the given error.
    pub async fn set_next_error(&self, error: MovieApiError) {
        *self.next_error.write().await = Some(error);
    }

    /// Make the next call for one query (search) or id (detail) fail.
    ///
    /// The error is raised after any delay configured for the same key.
    pub async fn set_error_for(&self, key: &str, error: MovieApiError) {
        self.key_errors.write().await.insert(key.to_string(), error);
    }

    /// Take the error for `key`, falling back to the global next error.
    async fn take_error(&self, key: &str) -> Option<MovieApiError> {
        if let Some(err) = self.key_errors.write().await.remove(key) {
            return Some(err);
        }
        self.next_error.write().await.take()
    }

    async fn record(&self, query: RecordedMovieQuery) {
        self.queries.write().await.push(query);
    }

    async fn wait(&self, key: &str) {
        let delay = self.delays.read().await.get(key).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl MovieApi for MockMovieApi {
    async fn search(&self, query: &str) -> Result<Vec<MovieSummary>, MovieApiError> {
        self.record(RecordedMovieQuery::Search {
            query: query.to_string(),
        })
        .await;

        self.wait(query).await;

        if let Some(err) = self.take_error(query).await {
            return Err(err);
        }

        self.searches
            .read()
            .await
            .get(query)
            .cloned()
            .ok_or_else(|| MovieApiError::NotFound("Movie not found!".to_string()))
    }

    async fn get_detail(&self, id: &str) -> Result<MovieDetail, MovieApiError> {
        self.record(RecordedMovieQuery::GetDetail { id: id.to_string() })
            .await;

        self.wait(id).await;

        if let Some(err) = self.take_error(id).await {
            return Err(err);
        }

        self.details
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| MovieApiError::NotFound("Incorrect IMDb ID.".to_string()))
    }
}
