//! Synchronizer run loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::SyncConfig;
use crate::source::MovieSource;
use crate::store::{InsertOutcome, MovieStore};

use super::{SyncError, SyncReport};

/// Drives repeated fetch-and-insert cycles against the movie store.
///
/// Cross-process non-overlap is the scheduler's job; within one process a
/// second `run` while one is in flight returns `SyncError::AlreadyRunning`.
pub struct Synchronizer {
    store: Arc<dyn MovieStore>,
    source: Arc<dyn MovieSource>,
    config: SyncConfig,
    running: AtomicBool,
}

/// Clears the running flag when a run ends, on every exit path.
struct RunGuard<'a>(&'a AtomicBool);

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl Synchronizer {
    pub fn new(store: Arc<dyn MovieStore>, source: Arc<dyn MovieSource>, config: SyncConfig) -> Self {
        Self {
            store,
            source,
            config,
            running: AtomicBool::new(false),
        }
    }

    /// Execute one full run: purge automatic rows, then fetch pages until
    /// the target count is met or the source is exhausted.
    pub async fn run(&self) -> Result<SyncReport, SyncError> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(SyncError::AlreadyRunning);
        }
        let _guard = RunGuard(&self.running);

        let purged = self.store.purge_automatic()?;
        let initial_total = self.store.count_all()?;
        info!(
            purged,
            initial_total,
            min_movies = self.config.min_movies,
            "Synchronizer run started"
        );

        let mut current_total = initial_total;
        let mut page: u32 = 1;
        let mut pages_fetched: u32 = 0;

        while current_total < self.config.min_movies {
            debug!(page, current_total, "Fetching page");

            let movies = match self.source.fetch_page(page).await {
                Ok(movies) => movies,
                Err(e) => {
                    // Conflated with exhaustion by design; the warning is
                    // the operational signal that the source broke.
                    warn!(page, error = %e, "Source failed, stopping run early");
                    break;
                }
            };

            if movies.is_empty() {
                info!(page, "Source exhausted, stopping");
                break;
            }

            let mut inserted_this_page = 0u32;
            for movie in movies {
                match self.store.insert(&movie.into(), false)? {
                    InsertOutcome::Inserted => inserted_this_page += 1,
                    InsertOutcome::Duplicate => {}
                }
            }

            pages_fetched += 1;
            current_total = self.store.count_all()?;

            if inserted_this_page == 0 {
                info!(page, "No new movies on this page, stopping");
                break;
            }

            page += 1;
            tokio::time::sleep(Duration::from_millis(self.config.page_delay_ms)).await;
        }

        let final_total = self.store.count_all()?;
        let report = SyncReport {
            initial_total,
            final_total,
            newly_added: final_total - initial_total,
            pages_fetched,
        };
        info!(
            final_total = report.final_total,
            newly_added = report.newly_added,
            pages_fetched = report.pages_fetched,
            "Synchronizer run finished"
        );

        Ok(report)
    }
}
