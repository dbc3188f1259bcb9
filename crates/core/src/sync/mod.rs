//! Synchronizer - scheduled ingestion of popular movies into the store.
//!
//! One run purges previously ingested rows, then pulls pages from the
//! external source until the store holds `min_movies` records or the
//! source has nothing new to offer.

mod log_rotate;
mod runner;

pub use log_rotate::rotate_log;
pub use runner::Synchronizer;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::store::StoreError;

/// Summary of one synchronizer run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncReport {
    /// Rows in the store after the purge, before any fetch.
    pub initial_total: u64,
    /// Rows in the store when the run finished.
    pub final_total: u64,
    /// `final_total - initial_total`.
    pub newly_added: u64,
    /// Pages whose records were processed.
    pub pages_fetched: u32,
}

/// Errors that abort a synchronizer run.
///
/// Source failures are deliberately absent: an unreachable or misbehaving
/// source ends the fetch loop the same way an exhausted one does, with a
/// warning as the operational signal.
#[derive(Debug, Error)]
pub enum SyncError {
    /// A run is already in progress in this process.
    #[error("Synchronizer run already in progress")]
    AlreadyRunning,

    /// The store failed with something other than a duplicate key.
    #[error("Store failure: {0}")]
    Store(#[from] StoreError),
}
