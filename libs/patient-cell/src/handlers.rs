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
    CreatePatientRequest, ImportPatientsRequest, PatientListQuery, UpdatePatientRequest,
};
use crate::services::PatientService;

#[axum::debug_handler]
pub async fn list_patients(
    State(config): State<Arc<AppConfig>>,
    Query(query): Query<PatientListQuery>,
) -> Result<Json<Value>, AppError> {
    let service = PatientService::new(&config);
    let (patients, pagination) = service.list(query).await?;
    Ok(response::paginated(patients, pagination))
}

#[axum::debug_handler]
pub async fn get_patient(
    State(config): State<Arc<AppConfig>>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let service = PatientService::new(&config);
    let patient = service.get(id).await?;
    Ok(response::ok(patient))
}

#[axum::debug_handler]
pub async fn create_patient(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<CreatePatientRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let service = PatientService::new(&config);
    let patient = service.create(request).await?;
    Ok(response::created(patient, "Patient created successfully"))
}

#[axum::debug_handler]
pub async fn update_patient(
    State(config): State<Arc<AppConfig>>,
    Path(id): Path<i64>,
    Json(request): Json<UpdatePatientRequest>,
) -> Result<Json<Value>, AppError> {
    let service = PatientService::new(&config);
    let patient = service.update(id, request).await?;
    Ok(response::ok_with_message(
        patient,
        "Patient updated successfully",
    ))
}

#[axum::debug_handler]
pub async fn delete_patient(
    State(config): State<Arc<AppConfig>>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let service = PatientService::new(&config);
    service.delete(id).await?;
    Ok(response::message("Patient deleted successfully"))
}

#[axum::debug_handler]
pub async fn import_patients(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<ImportPatientsRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let service = PatientService::new(&config);
    let report = service.import(request.patients).await?;
    Ok(response::created(report, "Patient import finished"))
}

#[axum::debug_handler]
pub async fn patient_statistics(
    State(config): State<Arc<AppConfig>>,
) -> Result<Json<Value>, AppError> {
    let service = PatientService::new(&config);
    let stats = service.statistics().await?;
    Ok(response::ok(stats))
}
