pub mod bgp;
pub mod commands;
pub mod events;
pub mod health;
pub mod interfaces;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Every endpoint is read-only; the collector writes, the API reads.
///
/// ```text
/// /bgp/sessions                  list sessions (?status, ?limit)
/// /bgp/sessions/{peer}           session detail
/// /bgp/sessions/{peer}/history   status history (?limit)
/// /bgp/stats                     session aggregates
///
/// /interfaces                    list interfaces (?status, ?limit)
/// /interfaces/{name}             interface detail (name URL-encoded)
/// /interfaces/{name}/history     metric history (?limit)
/// /interfaces/stats              interface aggregates
///
/// /events                        event log (?event_type, ?severity, ?source, ?limit)
/// /events/stats                  counts by severity and type
///
/// /commands/log                  device command audit trail (?limit)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // BGP session state and history.
        .nest("/bgp", bgp::router())
        // Interface state and history.
        .nest("/interfaces", interfaces::router())
        // Event log written by the reconciler and the alert evaluator.
        .nest("/events", events::router())
        // Command audit trail written by the gateway.
        .nest("/commands", commands::router())
}
