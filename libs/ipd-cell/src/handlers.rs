use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;

use shared_config::AppConfig;
use shared_models::error::AppError;
use shared_models::response;

use crate::models::{
    AddMedicineRequest, AddProgressNoteRequest, CreateIpdRecordRequest, DischargeRequest,
    IpdListQuery, UpdateIpdRecordRequest,
};
use crate::services::IpdService;

#[axum::debug_handler]
pub async fn list_patients(
    State(config): State<Arc<AppConfig>>,
    Query(query): Query<IpdListQuery>,
) -> Result<Json<Value>, AppError> {
    let service = IpdService::new(&config);
    let (patients, pagination) = service.list(query).await?;
    Ok(response::paginated(patients, pagination))
}

#[axum::debug_handler]
pub async fn get_patient(
    State(config): State<Arc<AppConfig>>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let service = IpdService::new(&config);
    let patient = service.get(id).await?;
    Ok(response::ok(patient))
}

#[axum::debug_handler]
pub async fn create_patient(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<CreateIpdRecordRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let service = IpdService::new(&config);
    let patient = service.create(request).await?;
    Ok(response::created(patient, "IPD patient added successfully"))
}

#[axum::debug_handler]
pub async fn update_patient(
    State(config): State<Arc<AppConfig>>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateIpdRecordRequest>,
) -> Result<Json<Value>, AppError> {
    let service = IpdService::new(&config);
    let patient = service.update(id, request).await?;
    Ok(response::ok_with_message(
        patient,
        "IPD patient updated successfully",
    ))
}

#[axum::debug_handler]
pub async fn delete_patient(
    State(config): State<Arc<AppConfig>>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let service = IpdService::new(&config);
    service.delete(id).await?;
    Ok(response::message("IPD patient deleted successfully"))
}

#[axum::debug_handler]
pub async fn discharge_patient(
    State(config): State<Arc<AppConfig>>,
    Path(id): Path<i64>,
    Json(request): Json<DischargeRequest>,
) -> Result<Json<Value>, AppError> {
    let service = IpdService::new(&config);
    service.discharge(id, request).await?;
    Ok(response::message("Patient discharged successfully"))
}

#[axum::debug_handler]
pub async fn add_medicine(
    State(config): State<Arc<AppConfig>>,
    Path(id): Path<i64>,
    Json(request): Json<AddMedicineRequest>,
) -> Result<Json<Value>, AppError> {
    let service = IpdService::new(&config);
    let medicines = service.add_medicine(id, request.medicine).await?;
    Ok(response::ok_with_message(
        medicines,
        "Medicine added successfully",
    ))
}

#[axum::debug_handler]
pub async fn add_progress_note(
    State(config): State<Arc<AppConfig>>,
    Path(id): Path<i64>,
    Json(request): Json<AddProgressNoteRequest>,
) -> Result<Json<Value>, AppError> {
    let service = IpdService::new(&config);
    let notes = service.add_progress_note(id, request.note).await?;
    Ok(response::ok_with_message(
        notes,
        "Progress note added successfully",
    ))
}

#[axum::debug_handler]
pub async fn get_progress_notes(
    State(config): State<Arc<AppConfig>>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let service = IpdService::new(&config);
    let notes = service.progress_notes(id).await?;
    Ok(response::ok(notes))
}

#[axum::debug_handler]
pub async fn ipd_statistics(
    State(config): State<Arc<AppConfig>>,
) -> Result<Json<Value>, AppError> {
    let service = IpdService::new(&config);
    let stats = service.statistics().await?;
    Ok(response::ok(stats))
}
