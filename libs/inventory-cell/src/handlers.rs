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

use crate::models::{CreateItemRequest, ItemListQuery, StockMovementRequest, UpdateItemRequest};
use crate::services::InventoryService;

#[axum::debug_handler]
pub async fn list_items(
    State(config): State<Arc<AppConfig>>,
    Query(query): Query<ItemListQuery>,
) -> Result<Json<Value>, AppError> {
    let service = InventoryService::new(&config);
    let (items, pagination) = service.list(query).await?;
    Ok(response::paginated(items, pagination))
}

#[axum::debug_handler]
pub async fn get_item(
    State(config): State<Arc<AppConfig>>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let service = InventoryService::new(&config);
    let item = service.get(id).await?;
    Ok(response::ok(item))
}

#[axum::debug_handler]
pub async fn create_item(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<CreateItemRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let service = InventoryService::new(&config);
    let item = service.create(request).await?;
    Ok(response::created(item, "Inventory item added successfully"))
}

#[axum::debug_handler]
pub async fn update_item(
    State(config): State<Arc<AppConfig>>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateItemRequest>,
) -> Result<Json<Value>, AppError> {
    let service = InventoryService::new(&config);
    let item = service.update(id, request).await?;
    Ok(response::ok_with_message(
        item,
        "Inventory item updated successfully",
    ))
}

#[axum::debug_handler]
pub async fn delete_item(
    State(config): State<Arc<AppConfig>>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let service = InventoryService::new(&config);
    service.delete(id).await?;
    Ok(response::message("Inventory item deleted successfully"))
}

#[axum::debug_handler]
pub async fn low_stock_items(
    State(config): State<Arc<AppConfig>>,
) -> Result<Json<Value>, AppError> {
    let service = InventoryService::new(&config);
    let items = service.low_stock().await?;
    Ok(response::ok(items))
}

#[axum::debug_handler]
pub async fn inventory_statistics(
    State(config): State<Arc<AppConfig>>,
) -> Result<Json<Value>, AppError> {
    let service = InventoryService::new(&config);
    let stats = service.statistics().await?;
    Ok(response::ok(stats))
}

#[axum::debug_handler]
pub async fn record_movement(
    State(config): State<Arc<AppConfig>>,
    Path(id): Path<i64>,
    Json(request): Json<StockMovementRequest>,
) -> Result<Json<Value>, AppError> {
    let service = InventoryService::new(&config);
    let result = service.record_movement(id, request).await?;
    Ok(response::ok_with_message(
        result,
        "Stock movement recorded successfully",
    ))
}
