pub mod config;
pub mod source;
pub mod store;
pub mod sync;
pub mod testing;

pub use config::{
    load_config, load_config_from_str, validate_config, validate_sync_config, Config, ConfigError,
    DatabaseConfig, SanitizedConfig, ServerConfig, SyncConfig,
};
pub use source::{MovieSource, SourceError, SourceMovie, TmdbClient, TmdbConfig};
pub use store::{
    InsertOutcome, Movie, MoviePage, MovieStore, NewMovie, SortDirection, SortField, SqliteStore,
    StoreError,
};
pub use sync::{rotate_log, SyncError, SyncReport, Synchronizer};
