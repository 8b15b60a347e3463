//! Nemon API server entrypoint.
//!
//! Boots the database, starts the collection scheduler against the
//! configured device, and serves the read-only HTTP API until Ctrl+C
//! or SIGTERM.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderName, Method, StatusCode};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use nemon_api::config::ServerConfig;
use nemon_api::routes;
use nemon_api::state::AppState;
use nemon_collector::alerts::AlertConfig;
use nemon_collector::scheduler;
use nemon_gateway::{CommandGateway, DeviceConfig};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Filter directives match crate targets, so every nemon crate is
    // listed; "nemon" alone would match none of them.
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "nemon_api=debug,nemon_collector=debug,nemon_gateway=debug,nemon_core=debug,\
             tower_http=debug"
                .into()
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env();

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = nemon_db::create_pool(&database_url)
        .await
        .expect("Failed to create database pool");
    tracing::info!("Database pool created");

    nemon_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    nemon_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    let device = DeviceConfig::from_env();
    let gateway = Arc::new(CommandGateway::new(device, pool.clone()));

    let alert_config = AlertConfig::from_env();
    let jobs = scheduler::start(
        gateway,
        pool.clone(),
        alert_config,
        Duration::from_secs(config.collection_interval_secs),
    );
    tracing::info!(
        collection_interval_secs = config.collection_interval_secs,
        "Collection scheduler started"
    );

    let state = AppState { pool };

    let request_id_header = HeaderName::from_static("x-request-id");

    // The API is read-only, so CORS is wide open for GET.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers([CONTENT_TYPE]);

    let app = Router::new()
        .merge(routes::health::router())
        .nest("/api", routes::api_routes())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.request_timeout_secs),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state);

    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    let listener = TcpListener::bind(addr)
        .await
        .expect("Failed to bind server address");
    tracing::info!(%addr, "Nemon API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Stopping background jobs");
    jobs.shutdown(Duration::from_secs(5)).await;
    tracing::info!("Shutdown complete");
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
