//! Route definitions and handlers for the command audit log.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use nemon_db::repositories::CommandLogRepo;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for audit log listings.
#[derive(Debug, Deserialize)]
pub struct LogParams {
    pub limit: Option<i64>,
}

/// GET /commands/log
///
/// Recent device commands with timing and outcome, newest first.
async fn list_log(
    State(state): State<AppState>,
    Query(params): Query<LogParams>,
) -> AppResult<impl IntoResponse> {
    let limit = params.limit.unwrap_or(100).clamp(1, 1000);
    let entries = CommandLogRepo::list_recent(&state.pool, limit).await?;

    Ok(Json(DataResponse { data: entries }))
}

/// Routes mounted at `/commands`.
///
/// ```text
/// GET /log   -> list_log (?limit)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/log", get(list_log))
}
