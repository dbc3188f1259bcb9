//! Testing utilities and mock implementations.
//!
//! Provides a mock movie source so synchronizer and server tests can run
//! without TMDB, plus fixture helpers for building records.

mod mock_source;

pub use mock_source::MockMovieSource;

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::source::SourceMovie;
    use crate::store::NewMovie;

    /// Create a movie ready for insertion, with reasonable defaults.
    pub fn new_movie(id: i64, title: &str) -> NewMovie {
        NewMovie {
            id,
            title: title.to_string(),
            overview: format!("Overview of {}", title),
            release_date: "2024-01-01".to_string(),
            original_language: "en".to_string(),
            popularity: id as f64,
            vote_average: 7.0,
            vote_count: 10 * id,
            poster_path: format!("/poster-{}.jpg", id),
        }
    }

    /// Create a source record as TMDB would return it.
    pub fn source_movie(id: i64) -> SourceMovie {
        SourceMovie {
            id,
            title: format!("Movie {}", id),
            overview: Some(format!("Overview of movie {}", id)),
            release_date: Some("2024-01-01".to_string()),
            original_language: Some("en".to_string()),
            popularity: Some(id as f64),
            vote_average: Some(7.0),
            vote_count: Some(10 * id),
            poster_path: Some(format!("/poster-{}.jpg", id)),
        }
    }

    /// A page of source records with the given ids.
    pub fn source_movies(ids: std::ops::RangeInclusive<i64>) -> Vec<SourceMovie> {
        ids.map(source_movie).collect()
    }
}
