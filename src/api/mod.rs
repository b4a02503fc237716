//! REST API endpoints.
//!
//! Axum-based HTTP API for browsing players, matches and teams,
//! reading leaderboards and triggering standings refreshes.

pub mod routes;
pub mod state;

use axum::{
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::models::ValidationError;
use crate::standings::StandingsError;
use crate::storage::StorageError;
use state::AppState;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_FAILED"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        if let ApiError::Internal(message) = &self {
            error!("Request failed: {}", message);
        }

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            StorageError::Validation(inner) => inner.into(),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<StandingsError> for ApiError {
    fn from(err: StandingsError) -> Self {
        match err {
            StandingsError::Storage(inner) => inner.into(),
            StandingsError::LeagueNotFound(_) => ApiError::NotFound(err.to_string()),
            StandingsError::Ranking(inner) => ApiError::Validation(inner.to_string()),
            StandingsError::Validation(inner) => inner.into(),
        }
    }
}

/// Pagination parameters.
#[derive(Debug, Clone)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 50,
        }
    }
}

impl Pagination {
    pub fn new(page: Option<u32>, page_size: Option<u32>) -> Self {
        Self::with_limits(page, page_size, 50, 100)
    }

    /// Clamp against configured limits instead of the built-in ones.
    pub fn with_limits(
        page: Option<u32>,
        page_size: Option<u32>,
        default_size: u32,
        max_size: u32,
    ) -> Self {
        let max_size = max_size.max(1);
        Self {
            page: page.unwrap_or(1).max(1),
            page_size: page_size.unwrap_or(default_size).clamp(1, max_size),
        }
    }

    pub fn offset(&self) -> u32 {
        (self.page - 1).saturating_mul(self.page_size)
    }

    /// The page's window into `items`; empty past the end.
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = self.offset() as usize;
        if start >= items.len() {
            return &[];
        }
        let end = (start + self.page_size as usize).min(items.len());
        &items[start..end]
    }
}

/// Pagination metadata in responses.
#[derive(Debug, Serialize)]
pub struct PaginationMeta {
    pub page: u32,
    pub page_size: u32,
    pub total_items: u32,
    pub total_pages: u32,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PaginationMeta {
    pub fn new(pagination: &Pagination, total_items: u32) -> Self {
        let total_pages = total_items.div_ceil(pagination.page_size);
        Self {
            page: pagination.page,
            page_size: pagination.page_size,
            total_items,
            total_pages,
            has_next: pagination.page < total_pages,
            has_prev: pagination.page > 1,
        }
    }
}

fn cors_layer(origin: &str) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origin == "*" {
        return layer.allow_origin(Any);
    }
    match origin.parse::<HeaderValue>() {
        Ok(value) => layer.allow_origin(value),
        Err(_) => {
            warn!("Ignoring invalid CORS origin '{}'", origin);
            layer
        }
    }
}

/// Build the application router.
pub fn build_router(state: AppState, access_log: bool) -> Router {
    let cors = cors_layer(&state.config.server.cors_origin);

    let api = Router::new()
        .route("/teams", get(routes::teams::list_teams))
        .route("/teams/:id", get(routes::teams::get_team))
        .route("/players", get(routes::players::list_players))
        .route("/players/:id", get(routes::players::get_player))
        .route("/matches", get(routes::matches::list_matches))
        .route("/matches/:id", get(routes::matches::get_match))
        .route("/leaderboard", get(routes::leaderboard::global_leaderboard))
        .route("/leagues", get(routes::leagues::list_leagues))
        .route("/leagues/:id", get(routes::leagues::get_league))
        .route(
            "/leagues/:id/points-system",
            get(routes::leagues::get_points_system),
        )
        .route(
            "/leagues/:id/leaderboard",
            get(routes::leaderboard::league_leaderboard),
        )
        .route("/leagues/:id/recompute", post(routes::leagues::recompute))
        .route(
            "/fantasy-teams/:id",
            get(routes::fantasy_teams::get_fantasy_team),
        )
        .route(
            "/performances",
            post(routes::performances::create_performance),
        )
        .route("/top-performers", get(routes::overview::top_performers))
        .route("/stats-overview", get(routes::overview::stats_overview));

    let router = Router::new()
        .nest("/api", api)
        .layer(cors)
        .with_state(state);

    if access_log {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}
