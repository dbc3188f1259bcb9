use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::{handlers, movies};
use crate::state::AppState;

/// Route paths are the stable external contract; existing consumers hit
/// them at the root, unversioned.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/config", get(handlers::get_config))
        .route("/search", get(movies::search))
        .route("/filter-by-date", get(movies::filter_by_date))
        .route("/sort", get(movies::sort))
        .route("/movies", get(movies::list_movies))
        .route("/add-movie", post(movies::add_movie))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
