pub mod config;
pub mod controller;
pub mod movie_api;
pub mod session;
pub mod storage;
pub mod testing;
pub mod watchlist;

pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, SanitizedConfig,
    ServerConfig, StorageConfig, WatchlistConfig,
};
pub use controller::{ControllerError, ControllerSnapshot, PopcornController};
pub use movie_api::{MovieApi, MovieApiError, MovieDetail, MovieSummary, OmdbClient, OmdbConfig};
pub use session::{DetailLoader, DetailState, FetchStatus, SearchSession, SessionState};
pub use storage::{KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore, StorageError};
pub use watchlist::{
    AddOutcome, DuplicatePolicy, WatchedEntry, WatchlistError, WatchlistStore, WatchlistSummary,
};
