//! Common test utilities for in-process API testing.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use cinelog_core::{load_config_from_str, MovieStore, SqliteStore};
use cinelog_server::api::create_router;
use cinelog_server::state::AppState;

/// Re-export fixtures for test convenience
pub use cinelog_core::testing::fixtures;

/// In-process server over an in-memory store.
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// The store behind the router, for seeding and assertions
    pub store: Arc<SqliteStore>,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestFixture {
    pub fn new() -> Self {
        Self::with_config("")
    }

    /// Build the fixture over a specific TOML config.
    pub fn with_config(toml: &str) -> Self {
        let store = Arc::new(SqliteStore::in_memory().expect("Failed to create store"));
        let config = load_config_from_str(toml).expect("Failed to build test config");

        let state = Arc::new(AppState::new(
            config,
            Arc::clone(&store) as Arc<dyn MovieStore>,
        ));
        let router = create_router(state);

        Self { router, store }
    }

    /// Seed the store with automatic movies id 1..=n, popularity = id.
    pub fn seed(&self, n: i64) {
        for id in 1..=n {
            self.store
                .insert(&fixtures::new_movie(id, &format!("Movie {}", id)), false)
                .expect("Failed to seed store");
        }
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body)).await
    }

    async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);

        let body = if let Some(json_body) = body {
            request_builder = request_builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&json_body).unwrap())
        } else {
            Body::empty()
        };

        let request = request_builder.body(body).unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body }
    }
}
