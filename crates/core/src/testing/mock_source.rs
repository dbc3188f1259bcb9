//! Mock movie source for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::source::{MovieSource, SourceError, SourceMovie};

/// Mock implementation of the MovieSource trait.
///
/// Pages are configured in order; any page beyond the configured ones comes
/// back empty, which is how the real source signals exhaustion. Individual
/// pages can be made to fail once with an injected error.
#[derive(Debug, Default)]
pub struct MockMovieSource {
    /// Configured pages, index 0 = page 1.
    pages: Arc<RwLock<Vec<Vec<SourceMovie>>>>,
    /// One-shot errors by page number, consumed on fetch.
    errors: Arc<RwLock<HashMap<u32, SourceError>>>,
    /// Page numbers requested, in order.
    fetches: Arc<RwLock<Vec<u32>>>,
}

impl MockMovieSource {
    /// Create a new empty mock source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a page of records.
    pub async fn add_page(&self, movies: Vec<SourceMovie>) {
        self.pages.write().await.push(movies);
    }

    /// Replace all configured pages.
    pub async fn set_pages(&self, pages: Vec<Vec<SourceMovie>>) {
        *self.pages.write().await = pages;
    }

    /// Make the given page fail once with the given error.
    pub async fn fail_page(&self, page: u32, error: SourceError) {
        self.errors.write().await.insert(page, error);
    }

    /// Page numbers requested so far, in order.
    pub async fn recorded_fetches(&self) -> Vec<u32> {
        self.fetches.read().await.clone()
    }

    /// Number of fetches performed.
    pub async fn fetch_count(&self) -> usize {
        self.fetches.read().await.len()
    }
}

#[async_trait]
impl MovieSource for MockMovieSource {
    async fn fetch_page(&self, page: u32) -> Result<Vec<SourceMovie>, SourceError> {
        self.fetches.write().await.push(page);

        if let Some(err) = self.errors.write().await.remove(&page) {
            return Err(err);
        }

        let pages = self.pages.read().await;
        let index = page.saturating_sub(1) as usize;
        Ok(pages.get(index).cloned().unwrap_or_default())
    }
}
