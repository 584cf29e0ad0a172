//! API Handlers
//!
//! HTTP request handlers for each admin endpoint.

use axum::{extract::State, Json};

use crate::cache::SharedCache;
use crate::models::{EntriesResponse, EntrySummary, HealthResponse, StatsResponse};

/// Application state shared across all handlers.
///
/// Holds the same cache the proxy connections use.
#[derive(Clone)]
pub struct AppState {
    pub cache: SharedCache,
}

impl AppState {
    pub fn new(cache: SharedCache) -> Self {
        Self { cache }
    }
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let cache = state.cache.lock().await;
    Json(StatsResponse::new(cache.stats(), cache.capacity()))
}

/// Handler for GET /entries
///
/// Lists entries without touching their recency.
pub async fn entries_handler(State(state): State<AppState>) -> Json<EntriesResponse> {
    let cache = state.cache.lock().await;
    Json(EntriesResponse {
        entries: cache.entries().map(EntrySummary::from).collect(),
        total_bytes: cache.current_size(),
    })
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
