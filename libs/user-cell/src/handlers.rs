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

use crate::models::{CreateUserRequest, ResetPasswordRequest, UpdateUserRequest, UserListQuery};
use crate::services::UserService;

#[axum::debug_handler]
pub async fn list_users(
    State(config): State<Arc<AppConfig>>,
    Query(query): Query<UserListQuery>,
) -> Result<Json<Value>, AppError> {
    let service = UserService::new(&config);
    let (users, pagination) = service.list(query).await?;
    Ok(response::paginated(users, pagination))
}

#[axum::debug_handler]
pub async fn get_user(
    State(config): State<Arc<AppConfig>>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let service = UserService::new(&config);
    let user = service.get(id).await?;
    Ok(response::ok(user))
}

#[axum::debug_handler]
pub async fn create_user(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let service = UserService::new(&config);
    let user = service.create(request).await?;
    Ok(response::created(user, "User created successfully"))
}

#[axum::debug_handler]
pub async fn update_user(
    State(config): State<Arc<AppConfig>>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<Value>, AppError> {
    let service = UserService::new(&config);
    service.update(id, request).await?;
    Ok(response::message("User updated successfully"))
}

#[axum::debug_handler]
pub async fn delete_user(
    State(config): State<Arc<AppConfig>>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let service = UserService::new(&config);
    service.delete(id).await?;
    Ok(response::message("User deleted successfully"))
}

#[axum::debug_handler]
pub async fn reset_password(
    State(config): State<Arc<AppConfig>>,
    Path(id): Path<i64>,
    Json(request): Json<ResetPasswordRequest>,
) -> Result<Json<Value>, AppError> {
    let service = UserService::new(&config);
    service.reset_password(id, request.password).await?;
    Ok(response::message("Password reset successfully"))
}

#[axum::debug_handler]
pub async fn user_statistics(
    State(config): State<Arc<AppConfig>>,
) -> Result<Json<Value>, AppError> {
    let service = UserService::new(&config);
    let stats = service.statistics().await?;
    Ok(response::ok(stats))
}
