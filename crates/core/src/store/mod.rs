//! Movie store - the single-table catalog behind the API and the synchronizer.

mod sqlite;
mod types;

pub use sqlite::SqliteStore;
pub use types::*;

/// Trait for movie catalog storage.
pub trait MovieStore: Send + Sync {
    /// Delete every automatically ingested row (`is_manual = false`).
    /// Manual rows are untouched. Idempotent. Returns rows removed.
    fn purge_automatic(&self) -> Result<usize, StoreError>;

    /// Total number of rows, manual and automatic.
    fn count_all(&self) -> Result<u64, StoreError>;

    /// Look up a single movie by id.
    fn find_by_id(&self, id: i64) -> Result<Option<Movie>, StoreError>;

    /// Attempt to insert a movie.
    ///
    /// Duplicates are detected through the primary-key constraint, never a
    /// pre-check, and reported as `InsertOutcome::Duplicate` rather than an
    /// error.
    fn insert(&self, movie: &NewMovie, is_manual: bool) -> Result<InsertOutcome, StoreError>;

    /// Substring match on the title, ordered by popularity descending.
    fn search(&self, title_substring: &str) -> Result<Vec<Movie>, StoreError>;

    /// Inclusive release-date range, compared as ISO date strings, ordered
    /// by release date descending. An inverted range yields nothing.
    fn filter_by_date_range(&self, from: &str, to: &str) -> Result<Vec<Movie>, StoreError>;

    /// Full listing ordered on one of the allow-listed columns.
    fn sort_by(
        &self,
        field: SortField,
        direction: SortDirection,
    ) -> Result<Vec<Movie>, StoreError>;

    /// One page of the catalog ordered by popularity descending, with the
    /// total count. Offset is `(page - 1) * page_size`; the caller validates
    /// `page >= 1` and `page_size` in 1..=100.
    fn page(&self, page: u32, page_size: u32) -> Result<MoviePage, StoreError>;
}
