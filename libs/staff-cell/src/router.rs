use std::sync::Arc;

use axum::{middleware, routing::get, Router};

use shared_config::AppConfig;
use shared_utils::extractor::{auth_middleware, require_admin};

use crate::handlers;

/// Staff records are admin-only.
pub fn staff_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(handlers::list_staff).post(handlers::create_staff))
        .route("/statistics", get(handlers::staff_statistics))
        .route("/departments", get(handlers::list_departments))
        .route(
            "/{id}",
            get(handlers::get_staff)
                .put(handlers::update_staff)
                .delete(handlers::delete_staff),
        )
        .layer(middleware::from_fn(require_admin))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}
