//! SQLite-backed movie store implementation.

use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use super::{
    InsertOutcome, Movie, MoviePage, MovieStore, NewMovie, SortDirection, SortField, StoreError,
};

const MOVIE_COLUMNS: &str = "id, title, overview, release_date, original_language, \
     popularity, vote_average, vote_count, poster_path, is_manual, inserted_at";

/// SQLite-backed movie store.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Create a new SQLite store, creating the database file and table if needed.
    pub fn new(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|e| StoreError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory SQLite store (useful for testing).
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn =
            Connection::open_in_memory().map_err(|e| StoreError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), StoreError> {
        conn.execute_batch(
            r#"
            -- One row per movie, manual and ingested alike
            CREATE TABLE IF NOT EXISTS movies (
                id INTEGER PRIMARY KEY,
                title TEXT NOT NULL,
                overview TEXT NOT NULL DEFAULT '',
                release_date TEXT NOT NULL DEFAULT '',
                original_language TEXT NOT NULL DEFAULT '',
                popularity REAL NOT NULL DEFAULT 0,
                vote_average REAL NOT NULL DEFAULT 0,
                vote_count INTEGER NOT NULL DEFAULT 0,
                poster_path TEXT NOT NULL DEFAULT '',
                is_manual INTEGER NOT NULL DEFAULT 0,
                inserted_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_movies_popularity ON movies(popularity);
            CREATE INDEX IF NOT EXISTS idx_movies_release_date ON movies(release_date);
            CREATE INDEX IF NOT EXISTS idx_movies_is_manual ON movies(is_manual);
            "#,
        )
        .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    /// Convert a row to a Movie. Column order must match `MOVIE_COLUMNS`.
    fn row_to_movie(row: &rusqlite::Row) -> rusqlite::Result<Movie> {
        let inserted_at_str: String = row.get(10)?;
        let inserted_at = DateTime::parse_from_rfc3339(&inserted_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now());

        Ok(Movie {
            id: row.get(0)?,
            title: row.get(1)?,
            overview: row.get(2)?,
            release_date: row.get(3)?,
            original_language: row.get(4)?,
            popularity: row.get(5)?,
            vote_average: row.get(6)?,
            vote_count: row.get(7)?,
            poster_path: row.get(8)?,
            is_manual: row.get(9)?,
            inserted_at,
        })
    }

    fn query_movies(
        conn: &Connection,
        sql: &str,
        query_params: &[&dyn rusqlite::ToSql],
    ) -> Result<Vec<Movie>, StoreError> {
        let mut stmt = conn
            .prepare(sql)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let rows = stmt
            .query_map(query_params, Self::row_to_movie)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let mut movies = Vec::new();
        for row in rows {
            movies.push(row.map_err(|e| StoreError::Database(e.to_string()))?);
        }
        Ok(movies)
    }

    /// Only an id collision counts as a duplicate; any other constraint
    /// failure is a real error and must surface as one.
    fn is_primary_key_conflict(err: &rusqlite::Error) -> bool {
        matches!(
            err,
            rusqlite::Error::SqliteFailure(e, _)
                if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
        )
    }
}

impl MovieStore for SqliteStore {
    fn purge_automatic(&self) -> Result<usize, StoreError> {
        let conn = self.conn.lock().unwrap();

        conn.execute("DELETE FROM movies WHERE is_manual = 0", [])
            .map_err(|e| StoreError::Database(e.to_string()))
    }

    fn count_all(&self) -> Result<u64, StoreError> {
        let conn = self.conn.lock().unwrap();

        conn.query_row("SELECT COUNT(*) FROM movies", [], |row| row.get(0))
            .map_err(|e| StoreError::Database(e.to_string()))
    }

    fn find_by_id(&self, id: i64) -> Result<Option<Movie>, StoreError> {
        let conn = self.conn.lock().unwrap();

        let result = conn.query_row(
            &format!("SELECT {MOVIE_COLUMNS} FROM movies WHERE id = ?"),
            params![id],
            Self::row_to_movie,
        );

        match result {
            Ok(movie) => Ok(Some(movie)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(StoreError::Database(e.to_string())),
        }
    }

    fn insert(&self, movie: &NewMovie, is_manual: bool) -> Result<InsertOutcome, StoreError> {
        let conn = self.conn.lock().unwrap();
        let now_str = Utc::now().to_rfc3339();

        let result = conn.execute(
            "INSERT INTO movies (id, title, overview, release_date, original_language,
                                 popularity, vote_average, vote_count, poster_path,
                                 is_manual, inserted_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                movie.id,
                &movie.title,
                &movie.overview,
                &movie.release_date,
                &movie.original_language,
                movie.popularity,
                movie.vote_average,
                movie.vote_count,
                &movie.poster_path,
                is_manual,
                &now_str,
            ],
        );

        match result {
            Ok(_) => Ok(InsertOutcome::Inserted),
            Err(e) if Self::is_primary_key_conflict(&e) => Ok(InsertOutcome::Duplicate),
            Err(e) => Err(StoreError::Database(e.to_string())),
        }
    }

    fn search(&self, title_substring: &str) -> Result<Vec<Movie>, StoreError> {
        let conn = self.conn.lock().unwrap();
        let pattern = format!("%{}%", title_substring);

        Self::query_movies(
            &conn,
            &format!(
                "SELECT {MOVIE_COLUMNS} FROM movies
                 WHERE title LIKE ?
                 ORDER BY popularity DESC"
            ),
            &[&pattern],
        )
    }

    fn filter_by_date_range(&self, from: &str, to: &str) -> Result<Vec<Movie>, StoreError> {
        let conn = self.conn.lock().unwrap();

        Self::query_movies(
            &conn,
            &format!(
                "SELECT {MOVIE_COLUMNS} FROM movies
                 WHERE release_date >= ? AND release_date <= ?
                 ORDER BY release_date DESC"
            ),
            &[&from, &to],
        )
    }

    fn sort_by(
        &self,
        field: SortField,
        direction: SortDirection,
    ) -> Result<Vec<Movie>, StoreError> {
        let conn = self.conn.lock().unwrap();

        // Both fragments come from closed enums, never from request input.
        Self::query_movies(
            &conn,
            &format!(
                "SELECT {MOVIE_COLUMNS} FROM movies ORDER BY {} {}",
                field.column(),
                direction.keyword()
            ),
            &[],
        )
    }

    fn page(&self, page: u32, page_size: u32) -> Result<MoviePage, StoreError> {
        let conn = self.conn.lock().unwrap();

        let total: u64 = conn
            .query_row("SELECT COUNT(*) FROM movies", [], |row| row.get(0))
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let offset = (page.saturating_sub(1) as i64) * page_size as i64;
        let movies = Self::query_movies(
            &conn,
            &format!(
                "SELECT {MOVIE_COLUMNS} FROM movies
                 ORDER BY popularity DESC
                 LIMIT ? OFFSET ?"
            ),
            &[&(page_size as i64), &offset],
        )?;

        Ok(MoviePage { total, movies })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_store() -> SqliteStore {
        SqliteStore::in_memory().unwrap()
    }

    fn test_movie(id: i64, title: &str) -> NewMovie {
        NewMovie {
            id,
            title: title.to_string(),
            overview: format!("Overview of {}", title),
            release_date: "2024-06-15".to_string(),
            original_language: "en".to_string(),
            popularity: id as f64,
            vote_average: 7.5,
            vote_count: 100 * id,
            poster_path: format!("/{}.jpg", id),
        }
    }

    #[test]
    fn test_insert_and_find() {
        let store = create_test_store();
        let outcome = store.insert(&test_movie(1, "Heat"), false).unwrap();
        assert_eq!(outcome, InsertOutcome::Inserted);

        let found = store.find_by_id(1).unwrap().unwrap();
        assert_eq!(found.title, "Heat");
        assert!(!found.is_manual);
        assert_eq!(store.count_all().unwrap(), 1);
    }

    #[test]
    fn test_find_missing_is_none() {
        let store = create_test_store();
        assert!(store.find_by_id(999).unwrap().is_none());
    }

    #[test]
    fn test_duplicate_insert_leaves_count_unchanged() {
        let store = create_test_store();
        store.insert(&test_movie(1, "Heat"), false).unwrap();

        let outcome = store.insert(&test_movie(1, "Heat again"), true).unwrap();
        assert_eq!(outcome, InsertOutcome::Duplicate);
        assert_eq!(store.count_all().unwrap(), 1);

        // Original row untouched
        let found = store.find_by_id(1).unwrap().unwrap();
        assert_eq!(found.title, "Heat");
        assert!(!found.is_manual);
    }

    #[test]
    fn test_only_id_collisions_count_as_duplicates() {
        let pk = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY),
            None,
        );
        assert!(SqliteStore::is_primary_key_conflict(&pk));

        let not_null = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_CONSTRAINT_NOTNULL),
            None,
        );
        assert!(!SqliteStore::is_primary_key_conflict(&not_null));
    }

    #[test]
    fn test_duplicate_across_manual_flag() {
        let store = create_test_store();
        store.insert(&test_movie(7, "Manual"), true).unwrap();

        let outcome = store.insert(&test_movie(7, "Auto"), false).unwrap();
        assert_eq!(outcome, InsertOutcome::Duplicate);
    }

    #[test]
    fn test_purge_automatic_preserves_manual() {
        let store = create_test_store();
        store.insert(&test_movie(1, "Auto 1"), false).unwrap();
        store.insert(&test_movie(2, "Manual"), true).unwrap();
        store.insert(&test_movie(3, "Auto 2"), false).unwrap();

        let removed = store.purge_automatic().unwrap();
        assert_eq!(removed, 2);
        assert_eq!(store.count_all().unwrap(), 1);
        assert!(store.find_by_id(2).unwrap().unwrap().is_manual);

        // Idempotent
        assert_eq!(store.purge_automatic().unwrap(), 0);
        assert_eq!(store.count_all().unwrap(), 1);
    }

    #[test]
    fn test_search_orders_by_popularity_desc() {
        let store = create_test_store();
        store.insert(&test_movie(1, "The Matrix"), false).unwrap();
        store
            .insert(&test_movie(5, "The Matrix Reloaded"), false)
            .unwrap();
        store.insert(&test_movie(3, "Heat"), false).unwrap();

        let results = store.search("Matrix").unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].id, 5);
        assert_eq!(results[1].id, 1);
    }

    #[test]
    fn test_search_no_match() {
        let store = create_test_store();
        store.insert(&test_movie(1, "Heat"), false).unwrap();
        assert!(store.search("Casablanca").unwrap().is_empty());
    }

    #[test]
    fn test_filter_by_date_range_inclusive() {
        let store = create_test_store();
        let mut a = test_movie(1, "Old");
        a.release_date = "1999-03-30".to_string();
        let mut b = test_movie(2, "Mid");
        b.release_date = "2010-01-01".to_string();
        let mut c = test_movie(3, "New");
        c.release_date = "2024-06-15".to_string();
        for m in [&a, &b, &c] {
            store.insert(m, false).unwrap();
        }

        let results = store
            .filter_by_date_range("1999-03-30", "2010-01-01")
            .unwrap();
        assert_eq!(results.len(), 2);
        // Release date descending
        assert_eq!(results[0].id, 2);
        assert_eq!(results[1].id, 1);
    }

    #[test]
    fn test_filter_inverted_range_is_empty() {
        let store = create_test_store();
        store.insert(&test_movie(1, "Heat"), false).unwrap();

        let results = store
            .filter_by_date_range("2030-01-01", "2020-01-01")
            .unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_sort_by_is_monotonic() {
        let store = create_test_store();
        for id in [4, 1, 3, 2] {
            store
                .insert(&test_movie(id, &format!("Movie {}", id)), false)
                .unwrap();
        }

        let asc = store
            .sort_by(SortField::VoteCount, SortDirection::Asc)
            .unwrap();
        let counts: Vec<i64> = asc.iter().map(|m| m.vote_count).collect();
        assert_eq!(counts, vec![100, 200, 300, 400]);

        let desc = store
            .sort_by(SortField::Popularity, SortDirection::Desc)
            .unwrap();
        let pops: Vec<f64> = desc.iter().map(|m| m.popularity).collect();
        assert_eq!(pops, vec![4.0, 3.0, 2.0, 1.0]);
    }

    #[test]
    fn test_page_offset_and_total() {
        let store = create_test_store();
        for id in 1..=25 {
            store
                .insert(&test_movie(id, &format!("Movie {}", id)), false)
                .unwrap();
        }

        let page = store.page(3, 10).unwrap();
        assert_eq!(page.total, 25);
        assert_eq!(page.movies.len(), 5);
        // Popularity descending: page 3 holds ids 5..=1
        assert_eq!(page.movies[0].id, 5);
        assert_eq!(page.movies[4].id, 1);
    }

    #[test]
    fn test_page_past_end_is_empty() {
        let store = create_test_store();
        store.insert(&test_movie(1, "Heat"), false).unwrap();

        let page = store.page(5, 10).unwrap();
        assert_eq!(page.total, 1);
        assert!(page.movies.is_empty());
    }

    #[test]
    fn test_persists_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("movies.db");

        {
            let store = SqliteStore::new(&path).unwrap();
            store.insert(&test_movie(42, "Persisted"), true).unwrap();
        }

        let store = SqliteStore::new(&path).unwrap();
        let found = store.find_by_id(42).unwrap().unwrap();
        assert_eq!(found.title, "Persisted");
        assert!(found.is_manual);
    }
}
