use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use cinelog_core::SanitizedConfig;

use crate::state::AppState;

#[derive(Serialize)]
pub struct RootResponse {
    pub message: String,
}

/// GET /
///
/// Liveness indicator.
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Movie catalog backend is running".to_string(),
    })
}

/// GET /config
pub async fn get_config(State(state): State<Arc<AppState>>) -> Json<SanitizedConfig> {
    Json(state.sanitized_config())
}
