use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::error::AppError;
use shared_models::response;

use crate::models::{
    CreateOpdRecordRequest, CreatePrescriptionRequest, OpdListQuery, SaveMedicinesRequest,
    UpdateOpdRecordRequest,
};
use crate::services::{OpdService, PrescriptionService};

#[axum::debug_handler]
pub async fn list_records(
    State(config): State<Arc<AppConfig>>,
    Query(query): Query<OpdListQuery>,
) -> Result<Json<Value>, AppError> {
    let service = OpdService::new(&config);
    let (records, pagination) = service.list(query).await?;
    Ok(response::paginated(records, pagination))
}

#[axum::debug_handler]
pub async fn get_record(
    State(config): State<Arc<AppConfig>>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let service = OpdService::new(&config);
    let record = service.get(id).await?;
    Ok(response::ok(record))
}

#[axum::debug_handler]
pub async fn create_record(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<CreateOpdRecordRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let service = OpdService::new(&config);
    let record = service.create(request).await?;
    Ok(response::created(record, "Patient added successfully"))
}

#[axum::debug_handler]
pub async fn update_record(
    State(config): State<Arc<AppConfig>>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateOpdRecordRequest>,
) -> Result<Json<Value>, AppError> {
    let service = OpdService::new(&config);
    let record = service.update(id, request).await?;
    Ok(response::ok_with_message(
        record,
        "Patient updated successfully",
    ))
}

#[axum::debug_handler]
pub async fn delete_record(
    State(config): State<Arc<AppConfig>>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let service = OpdService::new(&config);
    service.delete(id).await?;
    Ok(response::message("Patient deleted successfully"))
}

#[axum::debug_handler]
pub async fn save_medicines(
    State(config): State<Arc<AppConfig>>,
    Path(id): Path<i64>,
    Json(request): Json<SaveMedicinesRequest>,
) -> Result<Json<Value>, AppError> {
    let service = OpdService::new(&config);
    let changes = service.save_medicines(id, request).await?;
    Ok(response::ok_with_message(
        json!({ "changedRows": changes }),
        "Medicines saved successfully",
    ))
}

#[axum::debug_handler]
pub async fn save_prescription(
    State(config): State<Arc<AppConfig>>,
    Path(id): Path<i64>,
    Json(request): Json<CreatePrescriptionRequest>,
) -> Result<Json<Value>, AppError> {
    // The visit record must exist before a prescription hangs off it.
    OpdService::new(&config).get(id).await?;

    let service = PrescriptionService::new(&config);
    let prescription_id = service.create(id, request).await?;
    Ok(response::ok_with_message(
        json!({ "prescriptionId": prescription_id }),
        "Prescription saved successfully",
    ))
}

#[axum::debug_handler]
pub async fn opd_statistics(
    State(config): State<Arc<AppConfig>>,
) -> Result<Json<Value>, AppError> {
    let service = OpdService::new(&config);
    let stats = service.statistics().await?;
    Ok(response::ok(stats))
}

#[axum::debug_handler]
pub async fn create_prescription(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<CreatePrescriptionRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let opd_patient_id = request
        .opd_patient_id
        .ok_or_else(|| AppError::Validation("Required field: opd_patient_id".to_string()))?;

    let service = PrescriptionService::new(&config);
    let prescription_id = service.create(opd_patient_id, request).await?;
    Ok(response::created(
        json!({ "prescriptionId": prescription_id }),
        "Prescription added successfully",
    ))
}

#[axum::debug_handler]
pub async fn get_prescription(
    State(config): State<Arc<AppConfig>>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let service = PrescriptionService::new(&config);
    let prescription = service.get(id).await?;
    Ok(response::ok(prescription))
}

#[axum::debug_handler]
pub async fn prescriptions_for_patient(
    State(config): State<Arc<AppConfig>>,
    Path(opd_patient_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let service = PrescriptionService::new(&config);
    let prescriptions = service.for_patient(opd_patient_id).await?;
    Ok(response::ok(prescriptions))
}
