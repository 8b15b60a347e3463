//! Route definitions and handlers for the event log.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;

use nemon_db::repositories::{EventFilter, EventRepo};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /events
///
/// List events, newest first. Supports `event_type`, `severity`,
/// `source`, and `limit` query parameters.
async fn list_events(
    State(state): State<AppState>,
    Query(filter): Query<EventFilter>,
) -> AppResult<impl IntoResponse> {
    let events = EventRepo::list(&state.pool, &filter).await?;

    Ok(Json(DataResponse { data: events }))
}

/// GET /events/stats
///
/// Event counts overall, for the last 24 hours, and grouped by
/// severity and by type.
async fn get_stats(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let stats = EventRepo::stats(&state.pool, Utc::now()).await?;

    Ok(Json(DataResponse { data: stats }))
}

/// Routes mounted at `/events`.
///
/// ```text
/// GET /        -> list_events (?event_type, ?severity, ?source, ?limit)
/// GET /stats   -> get_stats
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_events))
        .route("/stats", get(get_stats))
}
