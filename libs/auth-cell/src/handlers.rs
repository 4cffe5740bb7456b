use std::sync::Arc;

use axum::{
    extract::{Extension, State},
    Json,
};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::auth::AuthUser;
use shared_models::error::AppError;
use shared_models::response;

use crate::models::LoginRequest;
use crate::services::AuthService;

#[axum::debug_handler]
pub async fn login(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<Value>, AppError> {
    let service = AuthService::new(&config);
    let (token, user) = service.login(request).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Login successful",
        "token": token,
        "user": user
    })))
}

#[axum::debug_handler]
pub async fn me(
    State(config): State<Arc<AppConfig>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Value>, AppError> {
    let service = AuthService::new(&config);
    let row = service.current_user(user.id).await?;
    Ok(response::ok(row))
}
