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

use crate::models::{BillListQuery, CreateBillRequest, UpdateBillRequest};
use crate::services::BillingService;

#[axum::debug_handler]
pub async fn list_bills(
    State(config): State<Arc<AppConfig>>,
    Query(query): Query<BillListQuery>,
) -> Result<Json<Value>, AppError> {
    let service = BillingService::new(&config);
    let (bills, pagination) = service.list(query).await?;
    Ok(response::paginated(bills, pagination))
}

#[axum::debug_handler]
pub async fn get_bill(
    State(config): State<Arc<AppConfig>>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let service = BillingService::new(&config);
    let bill = service.get(id).await?;
    Ok(response::ok(bill))
}

#[axum::debug_handler]
pub async fn create_bill(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<CreateBillRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let service = BillingService::new(&config);
    let bill = service.create(request).await?;
    Ok(response::created(bill, "Bill created successfully"))
}

#[axum::debug_handler]
pub async fn update_bill(
    State(config): State<Arc<AppConfig>>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateBillRequest>,
) -> Result<Json<Value>, AppError> {
    let service = BillingService::new(&config);
    let bill = service.update(id, request).await?;
    Ok(response::ok_with_message(bill, "Bill updated successfully"))
}

#[axum::debug_handler]
pub async fn delete_bill(
    State(config): State<Arc<AppConfig>>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let service = BillingService::new(&config);
    service.delete(id).await?;
    Ok(response::message("Bill deleted successfully"))
}

#[axum::debug_handler]
pub async fn billing_statistics(
    State(config): State<Arc<AppConfig>>,
) -> Result<Json<Value>, AppError> {
    let service = BillingService::new(&config);
    let stats = service.statistics().await?;
    Ok(response::ok(stats))
}
