//! TMDB (The Movie Database) popular-movies client.
//!
//! TMDB requires an API key for access.
//! Rate limits are generous (around 40 requests per second).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{MovieSource, SourceError, SourceMovie};

const USER_AGENT: &str = concat!("cinelog/", env!("CARGO_PKG_VERSION"));

/// TMDB API client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TmdbConfig {
    /// TMDB API key (required).
    pub api_key: String,
    /// Base URL (default: https://api.themoviedb.org/3).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Language for results (default: en-US).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

/// TMDB API client.
pub struct TmdbClient {
    client: Client,
    base_url: String,
    api_key: String,
    language: String,
}

impl TmdbClient {
    /// Create a new TMDB client.
    pub fn new(config: TmdbConfig) -> Result<Self, SourceError> {
        if config.api_key.is_empty() {
            return Err(SourceError::NotConfigured(
                "TMDB API key is required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .build()?;

        let base_url = config
            .base_url
            .unwrap_or_else(|| "https://api.themoviedb.org/3".to_string());

        let language = config.language.unwrap_or_else(|| "en-US".to_string());

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key,
            language,
        })
    }
}

#[async_trait]
impl MovieSource for TmdbClient {
    async fn fetch_page(&self, page: u32) -> Result<Vec<SourceMovie>, SourceError> {
        let url = format!("{}/movie/popular", self.base_url);

        debug!("TMDB popular movies: page={}", page);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("language", self.language.as_str()),
                ("page", &page.to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if status == 401 {
            return Err(SourceError::NotConfigured(
                "Invalid TMDB API key".to_string(),
            ));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let page_result: TmdbPageResponse = response.json().await.map_err(|e| {
            SourceError::Parse(format!("Failed to parse popular movies response: {}", e))
        })?;

        Ok(page_result.results.into_iter().map(|r| r.into()).collect())
    }
}

// ============================================================================
// TMDB API Response Types (private)
// ============================================================================

#[derive(Debug, Deserialize)]
struct TmdbPageResponse {
    #[serde(default)]
    results: Vec<TmdbMovieResult>,
}

#[derive(Debug, Deserialize)]
struct TmdbMovieResult {
    id: i64,
    title: String,
    overview: Option<String>,
    release_date: Option<String>,
    original_language: Option<String>,
    popularity: Option<f64>,
    vote_average: Option<f64>,
    vote_count: Option<i64>,
    poster_path: Option<String>,
}

impl From<TmdbMovieResult> for SourceMovie {
    fn from(r: TmdbMovieResult) -> Self {
        Self {
            id: r.id,
            title: r.title,
            overview: r.overview,
            release_date: r.release_date,
            original_language: r.original_language,
            popularity: r.popularity,
            vote_average: r.vote_average,
            vote_count: r.vote_count,
            poster_path: r.poster_path,
        }
    }
}
