//! Route definitions and handlers for interface endpoints.
//!
//! Interface names contain slashes (`GigabitEthernet0/0/1`), so path
//! segments must be URL-encoded by the caller (`%2F`).

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use nemon_core::error::CoreError;
use nemon_db::repositories::{InterfaceHistoryRepo, InterfaceRepo};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for interface listings.
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

/// GET /interfaces
///
/// List monitored interfaces, optionally filtered by status.
async fn list_interfaces(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<impl IntoResponse> {
    let interfaces = InterfaceRepo::list(
        &state.pool,
        params.status.as_deref(),
        clamp_limit(params.limit),
    )
    .await?;

    Ok(Json(DataResponse { data: interfaces }))
}

/// GET /interfaces/{name}
///
/// Get a single interface by name. Returns 404 for unknown names.
async fn get_interface(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<impl IntoResponse> {
    let interface = InterfaceRepo::get_by_name(&state.pool, &name)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Interface",
            key: name,
        })?;

    Ok(Json(DataResponse { data: interface }))
}

/// GET /interfaces/{name}/history
///
/// Metric history for one interface, newest first.
async fn get_interface_history(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(params): Query<HistoryParams>,
) -> AppResult<impl IntoResponse> {
    let history =
        InterfaceHistoryRepo::list_for_interface(&state.pool, &name, clamp_limit(params.limit))
            .await?;

    Ok(Json(DataResponse { data: history }))
}

/// GET /interfaces/stats
///
/// Aggregate counts over all interfaces.
async fn get_stats(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let summary = InterfaceRepo::summary(&state.pool).await?;

    Ok(Json(DataResponse { data: summary }))
}

/// Routes mounted at `/interfaces`.
///
/// ```text
/// GET /                 -> list_interfaces (?status, ?limit)
/// GET /stats            -> get_stats
/// GET /{name}           -> get_interface
/// GET /{name}/history   -> get_interface_history (?limit)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_interfaces))
        .route("/stats", get(get_stats))
        .route("/{name}", get(get_interface))
        .route("/{name}/history", get(get_interface_history))
}
