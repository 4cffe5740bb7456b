use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::error::AppError;
use shared_models::response;

use crate::models::{CreateMedicineRequest, MedicineBillRequest};
use crate::services::medicines::{catalog_stats, MedicineState};
use crate::services::{DraftBillService, MedicineBillService};

// Medicine bills

#[axum::debug_handler]
pub async fn list_bills(State(config): State<Arc<AppConfig>>) -> Result<Json<Value>, AppError> {
    let service = MedicineBillService::new(&config);
    let bills = service.list().await?;
    Ok(response::ok(bills))
}

#[axum::debug_handler]
pub async fn get_bill(
    State(config): State<Arc<AppConfig>>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let service = MedicineBillService::new(&config);
    let bill = service.get(id).await?;
    Ok(response::ok(bill))
}

#[axum::debug_handler]
pub async fn bills_for_patient(
    State(config): State<Arc<AppConfig>>,
    Path(patient_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let service = MedicineBillService::new(&config);
    let bills = service.for_patient(&patient_id).await?;
    Ok(response::ok(bills))
}

#[axum::debug_handler]
pub async fn create_bill(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<MedicineBillRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let service = MedicineBillService::new(&config);
    let bill = service.create(request).await?;
    Ok(response::created(bill, "Medicine bill created successfully"))
}

#[axum::debug_handler]
pub async fn update_bill(
    State(config): State<Arc<AppConfig>>,
    Path(id): Path<i64>,
    Json(request): Json<MedicineBillRequest>,
) -> Result<Json<Value>, AppError> {
    let service = MedicineBillService::new(&config);
    let bill = service.update(id, request).await?;
    Ok(response::ok_with_message(
        bill,
        "Medicine bill updated successfully",
    ))
}

#[axum::debug_handler]
pub async fn delete_bill(
    State(config): State<Arc<AppConfig>>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let service = MedicineBillService::new(&config);
    service.delete(id).await?;
    Ok(response::message("Medicine bill deleted successfully"))
}

// Draft bills

#[axum::debug_handler]
pub async fn list_drafts(State(config): State<Arc<AppConfig>>) -> Result<Json<Value>, AppError> {
    let service = DraftBillService::new(&config);
    let drafts = service.list().await?;
    Ok(response::ok(drafts))
}

#[axum::debug_handler]
pub async fn get_draft(
    State(config): State<Arc<AppConfig>>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let service = DraftBillService::new(&config);
    let draft = service.get(id).await?;
    Ok(response::ok(draft))
}

#[axum::debug_handler]
pub async fn drafts_for_patient(
    State(config): State<Arc<AppConfig>>,
    Path(patient_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let service = DraftBillService::new(&config);
    let drafts = service.for_patient(&patient_id).await?;
    Ok(response::ok(drafts))
}

#[axum::debug_handler]
pub async fn create_draft(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<MedicineBillRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let service = DraftBillService::new(&config);
    let draft = service.create(request).await?;
    Ok(response::created(draft, "Draft bill created successfully"))
}

#[axum::debug_handler]
pub async fn update_draft(
    State(config): State<Arc<AppConfig>>,
    Path(id): Path<i64>,
    Json(request): Json<MedicineBillRequest>,
) -> Result<Json<Value>, AppError> {
    let service = DraftBillService::new(&config);
    let draft = service.update(id, request).await?;
    Ok(response::ok_with_message(
        draft,
        "Draft bill updated successfully",
    ))
}

#[axum::debug_handler]
pub async fn delete_draft(
    State(config): State<Arc<AppConfig>>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let service = DraftBillService::new(&config);
    service.delete(id).await?;
    Ok(response::message("Draft bill deleted successfully"))
}

#[axum::debug_handler]
pub async fn convert_draft(
    State(config): State<Arc<AppConfig>>,
    Path(id): Path<i64>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let service = DraftBillService::new(&config);
    let bill = service.convert_to_bill(id).await?;
    Ok(response::created(
        bill,
        "Draft converted to bill successfully",
    ))
}

// Medicine catalog

#[axum::debug_handler]
pub async fn list_medicines(State(state): State<MedicineState>) -> Result<Json<Value>, AppError> {
    let medicines = state.repo.list().await?;
    Ok(response::ok(medicines))
}

#[axum::debug_handler]
pub async fn get_medicine(
    State(state): State<MedicineState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let medicine = state.repo.get(id).await?;
    Ok(response::ok(medicine))
}

#[axum::debug_handler]
pub async fn create_medicine(
    State(state): State<MedicineState>,
    Json(request): Json<CreateMedicineRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    if request.name.is_empty() {
        return Err(AppError::Validation("Required field: name".to_string()));
    }

    let doc = json!({
        "name": request.name,
        "type": request.kind,
        "dose": request.dose,
        "batch": request.batch,
        "mfd": request.mfd,
        "exp": request.exp,
        "unitPrice": request.unit_price,
        "costPrice": request.cost_price,
        "stock": request.stock,
        "minStock": request.min_stock,
        "maxStock": request.max_stock,
        "status": request.status.as_deref().unwrap_or("In Stock"),
        "supplier": request.supplier,
        "location": request.location,
        "description": request.description,
        "properties": request.properties
    });
    let medicine = state.repo.create(doc).await?;
    Ok(response::created(medicine, "Medicine created successfully"))
}

#[axum::debug_handler]
pub async fn update_medicine(
    State(state): State<MedicineState>,
    Path(id): Path<i64>,
    Json(patch): Json<Value>,
) -> Result<Json<Value>, AppError> {
    let medicine = state.repo.update(id, patch).await?;
    Ok(response::ok_with_message(
        medicine,
        "Medicine updated successfully",
    ))
}

#[axum::debug_handler]
pub async fn delete_medicine(
    State(state): State<MedicineState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    state.repo.delete(id).await?;
    Ok(response::message("Medicine deleted"))
}

#[axum::debug_handler]
pub async fn medicine_statistics(
    State(state): State<MedicineState>,
) -> Result<Json<Value>, AppError> {
    let stats = catalog_stats(state.repo.as_ref()).await?;
    Ok(response::ok(stats))
}
