use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

use crate::movie_api::OmdbConfig;
use crate::watchlist::DuplicatePolicy;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub omdb: OmdbConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub watchlist: WatchlistConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_port() -> u16 {
    8080
}

/// Where the watchlist lives.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
    /// Key of the slot holding the serialized watchlist.
    #[serde(default = "default_watchlist_key")]
    pub watchlist_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            watchlist_key: default_watchlist_key(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("popcorn.db")
}

fn default_watchlist_key() -> String {
    "watched".to_string()
}

/// Watchlist behavior
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct WatchlistConfig {
    /// What to do when a movie already on the list is added again.
    #[serde(default)]
    pub duplicates: DuplicatePolicy,
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub omdb: SanitizedOmdbConfig,
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub watchlist: WatchlistConfig,
}

/// Sanitized OMDb config (API key hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedOmdbConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    pub api_key_configured: bool,
    pub timeout_secs: u32,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            omdb: SanitizedOmdbConfig {
                base_url: config.omdb.base_url.clone(),
                api_key_configured: !config.omdb.api_key.is_empty(),
                timeout_secs: config.omdb.timeout_secs,
            },
            server: config.server.clone(),
            storage: config.storage.clone(),
            watchlist: config.watchlist.clone(),
        }
    }
}
