use axum::{extract::{Path, State}, response::IntoResponse, Json};
use std::sync::Arc;

use crate::api::dtos::requests::{CreateBedRequest, UpdateBedRequest};
use crate::error::AppError;
use crate::state::AppState;

pub async fn create_bed(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateBedRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.bed_name.trim().is_empty() {
        return Err(AppError::Validation("bed_name must not be empty".into()));
    }
    state
        .room_repo
        .find_by_id(payload.room_id)
        .await?
        .ok_or(AppError::NotFound(format!("Room {} not found", payload.room_id)))?;

    let status = payload.status.as_deref().unwrap_or("Available");
    let bed = state.bed_repo.create(payload.room_id, &payload.bed_name, status).await?;
    Ok(Json(serde_json::json!({ "bed": bed })))
}

pub async fn list_beds(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let beds = state.bed_repo.list().await?;
    Ok(Json(serde_json::json!({ "beds": beds })))
}

pub async fn get_bed(
    State(state): State<Arc<AppState>>,
    Path(bed_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let bed = state
        .bed_repo
        .find_by_id(bed_id)
        .await?
        .ok_or(AppError::NotFound("Bed not found".into()))?;
    Ok(Json(bed))
}

pub async fn update_bed(
    State(state): State<Arc<AppState>>,
    Path(bed_id): Path<i64>,
    Json(payload): Json<UpdateBedRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut bed = state
        .bed_repo
        .find_by_id(bed_id)
        .await?
        .ok_or(AppError::NotFound("Bed not found".into()))?;

    if let Some(name) = payload.bed_name {
        if name.trim().is_empty() {
            return Err(AppError::Validation("bed_name must not be empty".into()));
        }
        bed.bed_name = name;
    }
    if let Some(status) = payload.status {
        bed.status = status;
    }

    let updated = state.bed_repo.update(&bed).await?;
    Ok(Json(updated))
}

pub async fn delete_bed(
    State(state): State<Arc<AppState>>,
    Path(bed_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    state
        .bed_repo
        .find_by_id(bed_id)
        .await?
        .ok_or(AppError::NotFound("Bed not found".into()))?;

    state.bed_repo.delete(bed_id).await?;
    Ok(Json(serde_json::json!({ "message": "Bed deleted successfully" })))
}
