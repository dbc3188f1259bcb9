//! Movie catalog API handlers.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use cinelog_core::{InsertOutcome, Movie, NewMovie, SortDirection, SortField};

use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub struct DateFilterParams {
    pub from_date: String,
    pub to_date: String,
}

#[derive(Debug, Deserialize)]
pub struct SortParams {
    pub by: String,
    #[serde(default)]
    pub order: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PageParams {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    10
}

#[derive(Debug, Serialize)]
pub struct ResultsResponse {
    pub results: Vec<Movie>,
}

/// Pagination envelope for GET /movies. This object shape is the stable
/// external contract even if the store's row shape changes.
#[derive(Debug, Serialize)]
pub struct MoviesPageResponse {
    pub page: u32,
    pub page_size: u32,
    pub total_movies: u64,
    pub total_pages: u64,
    pub next_page: Option<u32>,
    pub previous_page: Option<u32>,
    pub movies: Vec<Movie>,
}

#[derive(Debug, Serialize)]
pub struct AddMovieResponse {
    pub message: String,
    pub id: i64,
    pub title: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn internal_error(e: impl std::fmt::Display) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
}

fn bad_request(message: impl Into<String>) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /search?query=<string>
///
/// Title substring match, ordered by popularity descending.
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<ResultsResponse>, impl IntoResponse> {
    match state.store().search(&params.query) {
        Ok(results) => Ok(Json(ResultsResponse { results })),
        Err(e) => Err(internal_error(e)),
    }
}

/// GET /filter-by-date?from_date=<ISO date>&to_date=<ISO date>
///
/// Inclusive range on the release-date string. An inverted range is not an
/// error, it just matches nothing.
pub async fn filter_by_date(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DateFilterParams>,
) -> Result<Json<ResultsResponse>, impl IntoResponse> {
    match state
        .store()
        .filter_by_date_range(&params.from_date, &params.to_date)
    {
        Ok(results) => Ok(Json(ResultsResponse { results })),
        Err(e) => Err(internal_error(e)),
    }
}

/// GET /sort?by=<popularity|vote_average|vote_count>&order=<asc|desc>
///
/// An invalid column reports `{"error": ...}` with a 200 status - existing
/// consumers depend on that shape - and never reaches the store. An invalid
/// order silently falls back to descending.
pub async fn sort(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SortParams>,
) -> Result<Json<serde_json::Value>, impl IntoResponse> {
    let Some(field) = SortField::parse(&params.by) else {
        return Ok(Json(serde_json::json!({
            "error": format!("Invalid sort column: {}", params.by)
        })));
    };

    let direction = params
        .order
        .as_deref()
        .map(SortDirection::parse_or_default)
        .unwrap_or_default();

    match state.store().sort_by(field, direction) {
        Ok(results) => Ok(Json(serde_json::json!({ "results": results }))),
        Err(e) => Err(internal_error(e)),
    }
}

/// GET /movies?page=<int>&page_size=<int>
///
/// Offset-paginated listing ordered by popularity descending.
pub async fn list_movies(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PageParams>,
) -> Result<Json<MoviesPageResponse>, impl IntoResponse> {
    if params.page < 1 {
        return Err(bad_request("page must be >= 1"));
    }
    if !(1..=100).contains(&params.page_size) {
        return Err(bad_request("page_size must be between 1 and 100"));
    }

    let page = state
        .store()
        .page(params.page, params.page_size)
        .map_err(internal_error)?;

    let total_pages = page.total.div_ceil(params.page_size as u64);
    let next_page = ((params.page as u64) < total_pages).then(|| params.page + 1);
    let previous_page = (params.page > 1).then(|| params.page - 1);

    Ok(Json(MoviesPageResponse {
        page: params.page,
        page_size: params.page_size,
        total_movies: page.total,
        total_pages,
        next_page,
        previous_page,
        movies: page.movies,
    }))
}

/// POST /add-movie
///
/// Manually add a movie. The id must be new; the row is flagged
/// `is_manual` so synchronizer runs never purge it.
pub async fn add_movie(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewMovie>,
) -> Result<Json<AddMovieResponse>, impl IntoResponse> {
    if payload.title.trim().is_empty() {
        return Err(bad_request("title must not be empty"));
    }

    match state.store().find_by_id(payload.id) {
        Ok(Some(_)) => {
            return Err(bad_request(format!(
                "Movie with id {} already exists",
                payload.id
            )));
        }
        Ok(None) => {}
        Err(e) => return Err(internal_error(e)),
    }

    match state.store().insert(&payload, true) {
        Ok(InsertOutcome::Inserted) => Ok(Json(AddMovieResponse {
            message: format!("Movie '{}' added", payload.title),
            id: payload.id,
            title: payload.title,
        })),
        // Lost the race between the existence check and the insert.
        Ok(InsertOutcome::Duplicate) => Err(bad_request(format!(
            "Movie with id {} already exists",
            payload.id
        ))),
        Err(e) => Err(internal_error(e)),
    }
}
