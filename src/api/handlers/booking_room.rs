use axum::{extract::{Path, State}, response::IntoResponse, Json};
use std::sync::Arc;

use tracing::info;

use crate::domain::services::booking_service;
use crate::error::AppError;
use crate::state::AppState;

pub async fn list_rooms_for_booking(
    State(state): State<Arc<AppState>>,
    Path(booking_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    state
        .booking_repo
        .find_by_id(booking_id)
        .await?
        .ok_or(AppError::NotFound("Booking not found".into()))?;

    let rooms = state.assignment_repo.rooms_for_booking(booking_id).await?;
    Ok(Json(rooms))
}

pub async fn remove_room_from_booking(
    State(state): State<Arc<AppState>>,
    Path(booking_room_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    booking_service::remove_room_from_booking(&state, booking_room_id).await?;
    info!("Booking room {} removed with its bed assignments", booking_room_id);
    Ok(Json(serde_json::json!({ "status": "removed" })))
}
