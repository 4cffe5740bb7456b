use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};

use shared_config::AppConfig;
use shared_models::auth::AuthUser;
use shared_models::error::AppError;

use crate::jwt::validate_token;

/// Validates the bearer token and attaches the decoded identity to request
/// extensions for downstream guards and handlers.
pub async fn auth_middleware(
    State(config): State<Arc<AppConfig>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get("Authorization")
        .ok_or_else(|| AppError::Auth("Access token required".to_string()))?;

    let auth_value = auth_header
        .to_str()
        .map_err(|_| AppError::Auth("Invalid authorization header format".to_string()))?;

    if !auth_value.starts_with("Bearer ") {
        return Err(AppError::Auth(
            "Invalid authorization header format".to_string(),
        ));
    }

    let token = &auth_value[7..];

    let user = validate_token(token, &config.jwt_secret)
        .map_err(|_| AppError::Auth("Invalid or expired token".to_string()))?;

    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

/// Admin-only gate; runs after `auth_middleware`.
pub async fn require_admin(request: Request<Body>, next: Next) -> Result<Response, AppError> {
    let user = current_user(&request)?;
    if !user.is_admin() {
        return Err(AppError::Forbidden("Admin access required".to_string()));
    }
    Ok(next.run(request).await)
}

/// Doctor-or-admin gate; runs after `auth_middleware`.
pub async fn require_doctor(request: Request<Body>, next: Next) -> Result<Response, AppError> {
    let user = current_user(&request)?;
    if !user.is_doctor() {
        return Err(AppError::Forbidden("Doctor access required".to_string()));
    }
    Ok(next.run(request).await)
}

fn current_user<B>(request: &Request<B>) -> Result<AuthUser, AppError> {
    request
        .extensions()
        .get::<AuthUser>()
        .cloned()
        .ok_or_else(|| AppError::Auth("Access token required".to_string()))
}
