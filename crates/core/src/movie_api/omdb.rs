//! OMDb (Open Movie Database) API client.
//!
//! OMDb requires an API key for access. Both endpoints answer HTTP 200 with
//! `"Response": "False"` when nothing matches, so the body has to be checked
//! as well as the status.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::types::{MovieDetail, MovieSummary};
use super::{MovieApi, MovieApiError};

const DEFAULT_BASE_URL: &str = "https://www.omdbapi.com/";

/// OMDb API client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OmdbConfig {
    /// OMDb API key (required).
    pub api_key: String,
    /// Base URL (default: https://www.omdbapi.com/).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Request timeout in seconds (default: 10).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

fn default_timeout() -> u32 {
    10
}

/// OMDb API client.
pub struct OmdbClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl OmdbClient {
    /// Create a new OMDb client.
    pub fn new(config: OmdbConfig) -> Result<Self, MovieApiError> {
        if config.api_key.is_empty() {
            return Err(MovieApiError::NotConfigured(
                "OMDb API key is required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(u64::from(config.timeout_secs)))
            .build()?;

        let base_url = config
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key,
        })
    }

    /// Send a GET with the API key plus `params`, mapping HTTP-level failures.
    async fn get(&self, params: &[(&str, &str)]) -> Result<reqwest::Response, MovieApiError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("apikey", self.api_key.as_str())])
            .query(params)
            .send()
            .await?;

        let status = response.status();
        if status == 401 {
            return Err(MovieApiError::NotConfigured(
                "Invalid OMDb API key".to_string(),
            ));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MovieApiError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(response)
    }
}

#[async_trait::async_trait]
impl MovieApi for OmdbClient {
    async fn search(&self, query: &str) -> Result<Vec<MovieSummary>, MovieApiError> {
        debug!("OMDb search: query='{}'", query);

        let response = self.get(&[("s", query)]).await?;

        let body: OmdbSearchResponse = response.json().await.map_err(|e| {
            MovieApiError::ParseError(format!("Failed to parse search response: {}", e))
        })?;

        if !is_true(&body.response) {
            return Err(MovieApiError::NotFound(
                body.error.unwrap_or_else(|| "Movie not found!".to_string()),
            ));
        }

        Ok(body.search.into_iter().map(|r| r.into()).collect())
    }

    async fn get_detail(&self, id: &str) -> Result<MovieDetail, MovieApiError> {
        debug!("OMDb get detail: id={}", id);

        let response = self.get(&[("i", id)]).await?;

        let body: OmdbDetailResponse = response.json().await.map_err(|e| {
            MovieApiError::ParseError(format!("Failed to parse detail response: {}", e))
        })?;

        if !is_true(&body.response) {
            return Err(MovieApiError::NotFound(
                body.error.unwrap_or_else(|| format!("Movie ID {}", id)),
            ));
        }

        body.try_into()
    }
}

// ============================================================================
// OMDb API Response Types (private)
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct OmdbSearchResponse {
    response: String,
    #[serde(default)]
    search: Vec<OmdbSearchResult>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct OmdbSearchResult {
    title: String,
    year: String,
    #[serde(rename = "imdbID")]
    imdb_id: String,
    #[serde(rename = "Type", default)]
    kind: Option<String>,
    #[serde(default)]
    poster: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct OmdbDetailResponse {
    response: String,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    year: Option<String>,
    #[serde(rename = "imdbID", default)]
    imdb_id: Option<String>,
    #[serde(default)]
    poster: Option<String>,
    #[serde(default)]
    released: Option<String>,
    #[serde(default)]
    runtime: Option<String>,
    #[serde(default)]
    genre: Option<String>,
    #[serde(rename = "imdbRating", default)]
    imdb_rating: Option<String>,
    #[serde(default)]
    plot: Option<String>,
    #[serde(default)]
    actors: Option<String>,
    #[serde(default)]
    director: Option<String>,
}

fn is_true(flag: &str) -> bool {
    flag.eq_ignore_ascii_case("true")
}

/// Drop OMDb's "N/A" placeholder.
fn known(value: Option<String>) -> Option<String> {
    value.filter(|v| v != "N/A" && !v.is_empty())
}

/// "148 min" -> 148
fn parse_runtime(value: Option<&str>) -> Option<u32> {
    value?.split_whitespace().next()?.parse().ok()
}

/// "8.8" -> 8.8
fn parse_rating(value: Option<&str>) -> Option<f64> {
    value?.trim().parse().ok()
}

// ============================================================================
// Conversions
// ============================================================================

impl From<OmdbSearchResult> for MovieSummary {
    fn from(r: OmdbSearchResult) -> Self {
        Self {
            id: r.imdb_id,
            title: r.title,
            year: r.year,
            poster_url: r.poster,
            kind: r.kind,
        }
    }
}

impl TryFrom<OmdbDetailResponse> for MovieDetail {
    type Error = MovieApiError;

    fn try_from(d: OmdbDetailResponse) -> Result<Self, Self::Error> {
        let id = d
            .imdb_id
            .ok_or_else(|| MovieApiError::ParseError("detail response without imdbID".into()))?;
        let title = d
            .title
            .ok_or_else(|| MovieApiError::ParseError(format!("detail {} without Title", id)))?;

        let runtime = known(d.runtime);
        let rating = known(d.imdb_rating);

        Ok(Self {
            id,
            title,
            year: d.year.unwrap_or_default(),
            poster_url: d.poster.unwrap_or_default(),
            release_date: known(d.released),
            runtime_minutes: parse_runtime(runtime.as_deref()),
            genre: known(d.genre),
            external_rating: parse_rating(rating.as_deref()),
            plot: known(d.plot),
            actors: known(d.actors),
            director: known(d.director),
        })
    }
}
