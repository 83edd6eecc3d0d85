use axum::{extract::{Path, Query, State}, response::IntoResponse, Json};
use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::info;

use crate::api::dtos::requests::{CreateRoomRequest, UpdateRoomRequest};
use crate::api::dtos::responses::AvailabilityResponse;
use crate::domain::models::room::RoomWithBeds;
use crate::domain::services::availability::available_bed_count;
use crate::error::AppError;
use crate::state::AppState;

pub async fn create_room(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateRoomRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.room_name.trim().is_empty() {
        return Err(AppError::Validation("room_name must not be empty".into()));
    }
    let room = state.room_repo.create(&payload.room_name, payload.capacity).await?;
    info!("Room created: {} ({})", room.room_name, room.room_id);
    Ok(Json(serde_json::json!({ "room": room })))
}

pub async fn list_rooms(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let rooms = state.room_repo.list().await?;
    let mut out = Vec::with_capacity(rooms.len());
    for room in rooms {
        let beds = state.bed_repo.list_by_room(room.room_id).await?;
        out.push(RoomWithBeds { room, beds });
    }
    Ok(Json(serde_json::json!({ "rooms": out })))
}

pub async fn get_room(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let room = state
        .room_repo
        .find_by_id(room_id)
        .await?
        .ok_or(AppError::NotFound("Room not found".into()))?;
    let beds = state.bed_repo.list_by_room(room_id).await?;
    Ok(Json(RoomWithBeds { room, beds }))
}

pub async fn update_room(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<i64>,
    Json(payload): Json<UpdateRoomRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut room = state
        .room_repo
        .find_by_id(room_id)
        .await?
        .ok_or(AppError::NotFound("Room not found".into()))?;

    if let Some(name) = payload.room_name {
        if name.trim().is_empty() {
            return Err(AppError::Validation("room_name must not be empty".into()));
        }
        room.room_name = name;
    }
    if let Some(capacity) = payload.capacity {
        if capacity < 0 {
            return Err(AppError::Validation("capacity must be non-negative".into()));
        }
        room.capacity = capacity;
    }

    let updated = state.room_repo.update(&room).await?;
    Ok(Json(updated))
}

/// Deletes a room and its bed inventory, beds first.
pub async fn delete_room(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    state
        .room_repo
        .find_by_id(room_id)
        .await?
        .ok_or(AppError::NotFound("Room not found".into()))?;

    state.bed_repo.delete_by_room(room_id).await?;
    state.room_repo.delete(room_id).await?;
    info!("Room {} and its beds deleted", room_id);
    Ok(Json(serde_json::json!({ "message": "Room and its beds deleted successfully" })))
}

/// Resyncs the room's stored capacity with its actual bed count.
pub async fn sync_room_capacity(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    state
        .room_repo
        .find_by_id(room_id)
        .await?
        .ok_or(AppError::NotFound("Room not found".into()))?;

    let capacity = state.bed_repo.list_by_room(room_id).await?.len() as i64;
    state.room_repo.set_capacity(room_id, capacity).await?;
    Ok(Json(serde_json::json!({ "room_id": room_id, "capacity": capacity })))
}

pub async fn get_room_availability(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<i64>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let check_in = params
        .get("check_in")
        .ok_or(AppError::Validation("Missing required parameter: check_in".into()))?;
    let check_out = params
        .get("check_out")
        .ok_or(AppError::Validation("Missing required parameter: check_out".into()))?;

    let check_in = NaiveDate::parse_from_str(check_in, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("check_in must be an ISO-8601 date (YYYY-MM-DD)".into()))?;
    let check_out = NaiveDate::parse_from_str(check_out, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("check_out must be an ISO-8601 date (YYYY-MM-DD)".into()))?;
    if check_out <= check_in {
        return Err(AppError::Validation("Check-out date must be after check-in date".into()));
    }

    let beds_required = match params.get("beds_required") {
        Some(raw) => Some(
            raw.parse::<i64>()
                .map_err(|_| AppError::Validation("beds_required must be a number".into()))?,
        ),
        None => None,
    };
    let exclude_booking_id = match params.get("exclude_booking_id") {
        Some(raw) => Some(
            raw.parse::<i64>()
                .map_err(|_| AppError::Validation("exclude_booking_id must be a number".into()))?,
        ),
        None => None,
    };

    state
        .room_repo
        .find_by_id(room_id)
        .await?
        .ok_or(AppError::NotFound("Room not found".into()))?;

    let available = available_bed_count(
        state.bed_repo.as_ref(),
        state.assignment_repo.as_ref(),
        room_id,
        check_in,
        check_out,
        exclude_booking_id,
    )
    .await?;

    Ok(Json(AvailabilityResponse {
        room_id,
        check_in: check_in.format("%Y-%m-%d").to_string(),
        check_out: check_out.format("%Y-%m-%d").to_string(),
        available_beds: available,
        is_available: beds_required.map(|needed| available >= needed),
    }))
}
