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

use crate::models::{CreateStaffRequest, StaffListQuery, UpdateStaffRequest};
use crate::services::StaffService;

#[axum::debug_handler]
pub async fn list_staff(
    State(config): State<Arc<AppConfig>>,
    Query(query): Query<StaffListQuery>,
) -> Result<Json<Value>, AppError> {
    let service = StaffService::new(&config);
    let (staff, pagination) = service.list(query).await?;
    Ok(response::paginated(staff, pagination))
}

#[axum::debug_handler]
pub async fn get_staff(
    State(config): State<Arc<AppConfig>>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let service = StaffService::new(&config);
    let member = service.get(id).await?;
    Ok(response::ok(member))
}

#[axum::debug_handler]
pub async fn create_staff(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<CreateStaffRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let service = StaffService::new(&config);
    let member = service.create(request).await?;
    Ok(response::created(member, "Staff member created successfully"))
}

#[axum::debug_handler]
pub async fn update_staff(
    State(config): State<Arc<AppConfig>>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateStaffRequest>,
) -> Result<Json<Value>, AppError> {
    let service = StaffService::new(&config);
    let member = service.update(id, request).await?;
    Ok(response::ok_with_message(
        member,
        "Staff member updated successfully",
    ))
}

#[axum::debug_handler]
pub async fn delete_staff(
    State(config): State<Arc<AppConfig>>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let service = StaffService::new(&config);
    service.delete(id).await?;
    Ok(response::message("Staff member deleted successfully"))
}

#[axum::debug_handler]
pub async fn staff_statistics(
    State(config): State<Arc<AppConfig>>,
) -> Result<Json<Value>, AppError> {
    let service = StaffService::new(&config);
    let stats = service.statistics().await?;
    Ok(response::ok(stats))
}

#[axum::debug_handler]
pub async fn list_departments(
    State(config): State<Arc<AppConfig>>,
) -> Result<Json<Value>, AppError> {
    let service = StaffService::new(&config);
    let departments = service.departments().await?;
    Ok(response::ok(departments))
}
