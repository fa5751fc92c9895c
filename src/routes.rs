//! Request handlers. Each handler validates its payload via the typed
//! extractors, delegates to the repository, and maps `NotFound` outcomes to
//! 404 through [`AppError`].
use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::{Value, json};

use crate::error::AppError;
use crate::models::{
    Notification, NotificationCreate, NotificationReadUpdate, Signal, SignalCreate,
    SignalStatusUpdate, Stats, User, UserUpdate, Zone, ZoneUpdate,
};
use crate::repository::{self, to_fields};
use crate::state::AppState;

pub async fn root_handler() -> Json<Value> {
    Json(json!({
        "message": "EarlyShield API",
        "version": env!("CARGO_PKG_VERSION"),
        "database": "Redis",
    }))
}

pub async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "healthy", "database": "Redis" }))
}

pub async fn list_signals(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Signal>>, AppError> {
    Ok(Json(repository::get_all_signals(&state.store).await?))
}

pub async fn get_signal(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Signal>, AppError> {
    match repository::get_signal_by_id(&state.store, &id).await? {
        Some(signal) => Ok(Json(signal)),
        None => Err(AppError::NotFound("Signal")),
    }
}

pub async fn create_signal(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SignalCreate>,
) -> Result<Json<Signal>, AppError> {
    Ok(Json(repository::create_signal(&state.store, payload).await?))
}

pub async fn update_signal_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<SignalStatusUpdate>,
) -> Result<Json<Signal>, AppError> {
    let fields = to_fields(&payload)?;

    Ok(Json(
        repository::update_signal(&state.store, &id, &fields).await?,
    ))
}

pub async fn delete_signal(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    repository::delete_signal(&state.store, &id).await?;

    Ok(Json(json!({ "message": "Signal deleted" })))
}

pub async fn list_zones(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Zone>>, AppError> {
    Ok(Json(repository::get_all_zones(&state.store).await?))
}

pub async fn get_zone(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Zone>, AppError> {
    match repository::get_zone_by_id(&state.store, &id).await? {
        Some(zone) => Ok(Json(zone)),
        None => Err(AppError::NotFound("Zone")),
    }
}

pub async fn update_zone(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<ZoneUpdate>,
) -> Result<Json<Zone>, AppError> {
    let fields = to_fields(&payload)?;

    Ok(Json(
        repository::update_zone(&state.store, &id, &fields).await?,
    ))
}

pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(user_type): Path<String>,
) -> Result<Json<User>, AppError> {
    match repository::get_user_by_type(&state.store, &user_type).await? {
        Some(user) => Ok(Json(user)),
        None => Err(AppError::NotFound("User type")),
    }
}

pub async fn update_user(
    State(state): State<Arc<AppState>>,
    Path(user_type): Path<String>,
    Json(payload): Json<UserUpdate>,
) -> Result<Json<User>, AppError> {
    let fields = to_fields(&payload)?;

    Ok(Json(
        repository::update_user(&state.store, &user_type, &fields).await?,
    ))
}

pub async fn list_notifications(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Notification>>, AppError> {
    Ok(Json(repository::get_all_notifications(&state.store).await?))
}

pub async fn create_notification(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NotificationCreate>,
) -> Result<Json<Notification>, AppError> {
    Ok(Json(
        repository::create_notification(&state.store, payload.title).await?,
    ))
}

pub async fn mark_notification_read(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(payload): Json<NotificationReadUpdate>,
) -> Result<Json<Notification>, AppError> {
    let fields = to_fields(&payload)?;

    Ok(Json(
        repository::update_notification(&state.store, id, &fields).await?,
    ))
}

pub async fn mark_all_read(State(state): State<Arc<AppState>>) -> Result<Json<Value>, AppError> {
    repository::mark_all_notifications_read(&state.store).await?;

    Ok(Json(json!({ "message": "All notifications marked as read" })))
}

pub async fn stats_handler(State(state): State<Arc<AppState>>) -> Result<Json<Stats>, AppError> {
    Ok(Json(repository::get_stats(&state.store).await?))
}
