//! Route definitions and handlers for BGP session endpoints.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use nemon_core::error::CoreError;
use nemon_db::repositories::{BgpHistoryRepo, BgpSessionRepo};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for session listings.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub status: Option<String>,
    pub limit: Option<i64>,
}

/// Query parameters for history listings.
#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    pub limit: Option<i64>,
}

fn clamp_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(100).clamp(1, 1000)
}

/// GET /bgp/sessions
///
/// List monitored BGP sessions, optionally filtered by status.
async fn list_sessions(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<impl IntoResponse> {
    let sessions = BgpSessionRepo::list(
        &state.pool,
        params.status.as_deref(),
        clamp_limit(params.limit),
    )
    .await?;

    Ok(Json(DataResponse { data: sessions }))
}

/// GET /bgp/sessions/{peer}
///
/// Get a single session by peer address. Returns 404 for unknown peers.
async fn get_session(
    State(state): State<AppState>,
    Path(peer): Path<String>,
) -> AppResult<impl IntoResponse> {
    let session = BgpSessionRepo::get_by_peer(&state.pool, &peer)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "BGP session",
            key: peer,
        })?;

    Ok(Json(DataResponse { data: session }))
}

/// GET /bgp/sessions/{peer}/history
///
/// Status history for one peer, newest first.
async fn get_session_history(
    State(state): State<AppState>,
    Path(peer): Path<String>,
    Query(params): Query<HistoryParams>,
) -> AppResult<impl IntoResponse> {
    let history =
        BgpHistoryRepo::list_for_peer(&state.pool, &peer, clamp_limit(params.limit)).await?;

    Ok(Json(DataResponse { data: history }))
}

/// GET /bgp/stats
///
/// Aggregate counts over all sessions.
async fn get_stats(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let summary = BgpSessionRepo::summary(&state.pool).await?;

    Ok(Json(DataResponse { data: summary }))
}

/// Routes mounted at `/bgp`.
///
/// ```text
/// GET /sessions                 -> list_sessions (?status, ?limit)
/// GET /sessions/{peer}          -> get_session
/// GET /sessions/{peer}/history  -> get_session_history (?limit)
/// GET /stats                    -> get_stats
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sessions", get(list_sessions))
        .route("/sessions/{peer}", get(get_session))
        .route("/sessions/{peer}/history", get(get_session_history))
        .route("/stats", get(get_stats))
}
