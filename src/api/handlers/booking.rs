use axum::{extract::{Path, Query, State}, response::IntoResponse, Json};
use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::info;

use crate::domain::services::booking_service::{self, CreateBookingData, UpdateBookingData};
use crate::error::AppError;
use crate::state::AppState;

pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateBookingData>,
) -> Result<impl IntoResponse, AppError> {
    let input = booking_service::validate_booking_data(&payload)?;
    info!(
        "create_booking: {} rooms, {} to {}",
        input.guests_per_room.len(),
        input.check_in,
        input.check_out
    );
    let booking = booking_service::create_booking(&state, input).await?;
    Ok(Json(booking))
}

pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let check_in = match params.get("check_in") {
        Some(raw) => Some(
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|_| AppError::Validation("check_in must be an ISO-8601 date (YYYY-MM-DD)".into()))?,
        ),
        None => None,
    };
    let bookings = state.booking_repo.list(check_in).await?;
    Ok(Json(serde_json::json!({ "bookings": bookings })))
}

pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    Path(booking_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state
        .booking_repo
        .find_by_id(booking_id)
        .await?
        .ok_or(AppError::NotFound("Booking not found".into()))?;
    Ok(Json(booking))
}

pub async fn get_booking_details(
    State(state): State<Arc<AppState>>,
    Path(booking_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let details = booking_service::booking_details(&state, booking_id).await?;
    Ok(Json(details))
}

pub async fn update_booking(
    State(state): State<Arc<AppState>>,
    Path(booking_id): Path<i64>,
    Json(payload): Json<UpdateBookingData>,
) -> Result<impl IntoResponse, AppError> {
    let booking = booking_service::update_booking(&state, booking_id, payload).await?;
    Ok(Json(booking))
}

pub async fn delete_booking(
    State(state): State<Arc<AppState>>,
    Path(booking_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    booking_service::delete_booking(&state, booking_id).await?;
    Ok(Json(serde_json::json!({ "status": "cancelled" })))
}

pub async fn get_calendar(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let start = params
        .get("startDate")
        .ok_or(AppError::Validation("Missing required parameter: startDate".into()))?;
    let end = params
        .get("endDate")
        .ok_or(AppError::Validation("Missing required parameter: endDate".into()))?;

    let start = NaiveDate::parse_from_str(start, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("startDate must be an ISO-8601 date (YYYY-MM-DD)".into()))?;
    let end = NaiveDate::parse_from_str(end, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("endDate must be an ISO-8601 date (YYYY-MM-DD)".into()))?;

    let map = booking_service::calendar_occupancy(&state, start, end).await?;
    Ok(Json(map))
}
