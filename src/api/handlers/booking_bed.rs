use axum::{extract::{Path, State}, response::IntoResponse, Json};
use std::sync::Arc;

use crate::api::dtos::requests::ReassignBedRequest;
use crate::domain::services::booking_service;
use crate::error::AppError;
use crate::state::AppState;

pub async fn list_beds_for_booking(
    State(state): State<Arc<AppState>>,
    Path(booking_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    state
        .booking_repo
        .find_by_id(booking_id)
        .await?
        .ok_or(AppError::NotFound("Booking not found".into()))?;

    let beds = state.assignment_repo.beds_for_booking(booking_id).await?;
    Ok(Json(beds))
}

/// Moves one assignment to another bed (calendar drag & drop). Rejected
/// with a conflict when the target bed is occupied for the window.
pub async fn reassign_bed(
    State(state): State<Arc<AppState>>,
    Path(booking_bed_id): Path<i64>,
    Json(payload): Json<ReassignBedRequest>,
) -> Result<impl IntoResponse, AppError> {
    let assignment = booking_service::reassign_bed(&state, booking_bed_id, payload.bed_id).await?;
    Ok(Json(assignment))
}

pub async fn unassign_bed(
    State(state): State<Arc<AppState>>,
    Path(booking_bed_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    state
        .assignment_repo
        .find_bed(booking_bed_id)
        .await?
        .ok_or(AppError::NotFound("Bed assignment not found".into()))?;

    state.assignment_repo.delete_bed_assignment(booking_bed_id).await?;
    Ok(Json(serde_json::json!({ "status": "unassigned" })))
}
