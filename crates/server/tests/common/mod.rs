//! Common test utilities for E2E testing with mocks.
//!
//! Builds an in-process router around a real controller whose upstream
//! movie API is a [`MockMovieApi`] and whose watchlist lives in a scratch
//! SQLite file.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use popcorn_core::{
    testing::MockMovieApi, Config, DuplicatePolicy, KeyValueStore, MemoryKeyValueStore, MovieApi,
    OmdbConfig, PopcornController, ServerConfig, SqliteKeyValueStore, StorageConfig,
    WatchlistConfig, WatchlistStore,
};

/// Re-export fixtures for test convenience
pub use popcorn_core::testing::fixtures;

/// Test fixture for E2E testing with mock dependencies.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_search() {
///     let fixture = TestFixture::new().await;
///     fixture.put("/api/v1/session/query", json!({ "query": "batman" })).await;
///     let session = fixture.settled_session().await;
///     assert_eq!(session["search"]["status"], "ready");
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock movie API - configure search results and details
    pub api: Arc<MockMovieApi>,
    /// Shared controller behind the router
    pub controller: Arc<PopcornController>,
    /// Temporary directory for the test database
    pub temp_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestFixture {
    /// Create a new test fixture with default mocks.
    pub async fn new() -> Self {
        Self::with_config(TestConfig::default()).await
    }

    /// Create a test fixture with custom configuration.
    pub async fn with_config(test_config: TestConfig) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");

        let api = Arc::new(MockMovieApi::new());
        api.set_search_results("batman", fixtures::batman_results())
            .await;
        api.add_detail(fixtures::inception()).await;
        api.add_detail(fixtures::back_to_the_future()).await;

        let config = Config {
            omdb: OmdbConfig {
                api_key: "test-secret-key".to_string(),
                base_url: None,
                timeout_secs: 10,
            },
            server: ServerConfig {
                host: std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
                port: 0, // Not used for in-process testing
            },
            storage: StorageConfig {
                path: db_path.clone(),
                watchlist_key: "watched".to_string(),
            },
            watchlist: WatchlistConfig {
                duplicates: test_config.duplicates,
            },
        };

        let storage: Arc<dyn KeyValueStore> = if test_config.in_memory_storage {
            Arc::new(MemoryKeyValueStore::new())
        } else {
            Arc::new(SqliteKeyValueStore::new(&db_path).expect("Failed to create storage"))
        };
        let watchlist = WatchlistStore::load(
            storage,
            config.storage.watchlist_key.clone(),
            config.watchlist.duplicates,
        );

        let controller = Arc::new(PopcornController::new(
            Arc::clone(&api) as Arc<dyn MovieApi>,
            watchlist,
        ));

        let state = Arc::new(popcorn_server::state::AppState::new(
            config,
            Arc::clone(&controller),
        ));
        let router = popcorn_server::api::create_router(state);

        Self {
            router,
            api,
            controller,
            temp_dir,
        }
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body)).await
    }

    /// Send a PUT request with JSON body.
    pub async fn put(&self, path: &str, body: Value) -> TestResponse {
        self.request("PUT", path, Some(body)).await
    }

    /// Send a DELETE request.
    pub async fn delete(&self, path: &str) -> TestResponse {
        self.request("DELETE", path, None).await
    }

    /// Send a PUT request with raw string body (for testing malformed JSON).
    pub async fn put_raw(&self, path: &str, body: &str) -> TestResponse {
        let request = Request::builder()
            .method("PUT")
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    /// Wait until neither the search nor the detail fetch is in flight,
    /// then return the session snapshot.
    pub async fn settled_session(&self) -> Value {
        tokio::time::timeout(Duration::from_secs(5), async {
            self.controller.search().settled().await;
            self.controller.detail().settled().await;
        })
        .await
        .expect("Session did not settle in time");

        let response = self.get("/api/v1/session").await;
        assert_eq!(response.status, StatusCode::OK);
        response.body
    }

    /// Select `id`, wait for its detail, and confirm `rating`.
    pub async fn watch(&self, id: &str, rating: u8) -> TestResponse {
        self.post("/api/v1/session/select", serde_json::json!({ "id": id }))
            .await;
        self.settled_session().await;
        self.post(
            "/api/v1/session/rating/confirm",
            serde_json::json!({ "rating": rating }),
        )
        .await
    }

    /// Send a request to the test server.
    async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);

        let body = if let Some(json_body) = body {
            request_builder = request_builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&json_body).unwrap())
        } else {
            Body::empty()
        };

        let request = request_builder.body(body).unwrap();
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body }
    }
}

/// Configuration for test fixture.
#[derive(Debug, Clone, Default)]
pub struct TestConfig {
    /// Duplicate policy of the watchlist
    pub duplicates: DuplicatePolicy,
    /// Use the in-memory key-value store instead of SQLite
    pub in_memory_storage: bool,
}

impl TestConfig {
    pub fn with_duplicates(duplicates: DuplicatePolicy) -> Self {
        Self {
            duplicates,
            ..Default::default()
        }
    }
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status,
            $response.status,
            serde_json::to_string_pretty(&$response.body).unwrap_or_default()
        );
    };
}
