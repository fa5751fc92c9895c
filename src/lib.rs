//! Backend for the EarlyShield campus risk dashboard.
//!
//! # General Infrastructure
//! - Thin HTTP layer over a Redis-backed document store
//! - Four flat collections: signals, zones, users, notifications
//! - Every request is a direct read/write against the store, no background
//!   work and no in-process caching
//! - Health score and trend are derived from the live signal set on each
//!   request, never persisted
//! - Store handle is built once at startup and shared through [`state::AppState`]
//!
//!
//!
//! # Notes
//!
//! ## Redis as a document store
//! The dataset is tiny (tens of documents per collection) and every access
//! is by collection + id, so each collection maps onto a single Redis hash
//! with JSON values. Partial updates are read-modify-write of one field;
//! there is no multi-document transaction, and the signal → notification
//! side effect on creation is deliberately best effort.
//!
//! ## Seeding
//! Startup seeds any collection that is empty with fixed demo data and
//! leaves non-empty collections alone, so redeploys never clobber live
//! records. A standalone `reseed_zones` binary force-replaces the zones
//! dataset when the campus list changes.
//!
//!
//!
//! # Setup
//!
//! Run against a local Redis.
//! ```sh
//! REDIS_URL=redis://127.0.0.1:6379 cargo run
//! ```
//!
//! View current docs.
//! ```sh
//! cargo doc --open
//! ```
use std::time::Duration;

use axum::{
    Router,
    http::{HeaderValue, Method, header::CONTENT_TYPE},
    routing::{get, patch, post},
};

use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod routes;
pub mod seed;
pub mod state;
pub mod stats;
pub mod store;

use routes::{
    create_notification, create_signal, delete_signal, get_signal, get_user, get_zone,
    health_handler, list_notifications, list_signals, list_zones, mark_all_read,
    mark_notification_read, root_handler, stats_handler, update_signal_status, update_user,
    update_zone,
};
use state::AppState;

pub async fn start_server() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let state = AppState::new().await;

    info!("Initializing store...");
    seed::initialize(&state.store)
        .await
        .expect("Store unavailable during bootstrap!");

    info!("Starting server...");

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list([
            HeaderValue::from_static("https://earlyshield.onrender.com"),
            HeaderValue::from_static("http://127.0.0.1:3000"),
            HeaderValue::from_static("http://127.0.0.1:5173"),
        ]))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(Duration::from_secs(60 * 60));

    let app = Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/api/signals", get(list_signals).post(create_signal))
        .route("/api/signals/{id}", get(get_signal).delete(delete_signal))
        .route("/api/signals/{id}/status", patch(update_signal_status))
        .route("/api/zones", get(list_zones))
        .route("/api/zones/{id}", get(get_zone).patch(update_zone))
        .route("/api/users/{user_type}", get(get_user).patch(update_user))
        .route(
            "/api/notifications",
            get(list_notifications).post(create_notification),
        )
        .route("/api/notifications/{id}/read", patch(mark_notification_read))
        .route("/api/notifications/mark-all-read", post(mark_all_read))
        .route("/api/stats", get(stats_handler))
        .layer(cors)
        .with_state(state.clone());

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await.unwrap();
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();

    println!("Server shutting down...");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
