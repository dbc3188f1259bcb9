//! Types for the movie store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A movie as stored in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movie {
    /// Catalog id (TMDB id for ingested rows, caller-supplied for manual ones).
    pub id: i64,
    /// Movie title.
    pub title: String,
    #[serde(default)]
    pub overview: String,
    /// ISO date string (YYYY-MM-DD) or empty when unknown.
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub original_language: String,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: i64,
    #[serde(default)]
    pub poster_path: String,
    /// True iff the row came from the manual-add endpoint.
    pub is_manual: bool,
    /// When the row was inserted. Immutable.
    pub inserted_at: DateTime<Utc>,
}

/// A movie about to be inserted; `is_manual` and `inserted_at` are
/// assigned by the store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewMovie {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub original_language: String,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: i64,
    #[serde(default)]
    pub poster_path: String,
}

/// Result of an insert attempt. A duplicate primary key is an expected
/// outcome, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    Duplicate,
}

/// Columns the store may sort by. Each variant maps to a fixed column
/// name, so request input never reaches the SQL text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Popularity,
    VoteAverage,
    VoteCount,
}

impl SortField {
    /// Parse a request parameter. Anything outside the allow-list is `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "popularity" => Some(Self::Popularity),
            "vote_average" => Some(Self::VoteAverage),
            "vote_count" => Some(Self::VoteCount),
            _ => None,
        }
    }

    pub(crate) fn column(self) -> &'static str {
        match self {
            Self::Popularity => "popularity",
            Self::VoteAverage => "vote_average",
            Self::VoteCount => "vote_count",
        }
    }
}

/// Sort direction; anything that is not `asc` means descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    /// Parse a request parameter, defaulting to descending on any
    /// unrecognized input.
    pub fn parse_or_default(s: &str) -> Self {
        match s {
            "asc" => Self::Asc,
            _ => Self::Desc,
        }
    }

    pub(crate) fn keyword(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// One page of the catalog plus the total row count it was sliced from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoviePage {
    pub total: u64,
    pub movies: Vec<Movie>,
}

/// Errors for store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),
}
