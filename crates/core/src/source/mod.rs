//! External movie source - the paginated provider the synchronizer ingests from.

mod tmdb;

pub use tmdb::{TmdbClient, TmdbConfig};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::store::NewMovie;

/// Errors that can occur when fetching from the external source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Client not configured (missing API key, etc.).
    #[error("Client not configured: {0}")]
    NotConfigured(String),
}

/// One movie record as returned by the external source. Optional fields are
/// defaulted exactly once, at the conversion into a store insert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMovie {
    pub id: i64,
    pub title: String,
    pub overview: Option<String>,
    pub release_date: Option<String>,
    pub original_language: Option<String>,
    pub popularity: Option<f64>,
    pub vote_average: Option<f64>,
    pub vote_count: Option<i64>,
    pub poster_path: Option<String>,
}

impl From<SourceMovie> for NewMovie {
    fn from(m: SourceMovie) -> Self {
        Self {
            id: m.id,
            title: m.title,
            overview: m.overview.unwrap_or_default(),
            release_date: m.release_date.unwrap_or_default(),
            original_language: m.original_language.unwrap_or_default(),
            popularity: m.popularity.unwrap_or_default(),
            vote_average: m.vote_average.unwrap_or_default(),
            vote_count: m.vote_count.unwrap_or_default(),
            poster_path: m.poster_path.unwrap_or_default(),
        }
    }
}

/// Trait for paginated movie providers.
///
/// Pages are 1-indexed. An empty page signals exhaustion.
#[async_trait]
pub trait MovieSource: Send + Sync {
    /// Fetch one page of popular movies.
    async fn fetch_page(&self, page: u32) -> Result<Vec<SourceMovie>, SourceError>;
}
