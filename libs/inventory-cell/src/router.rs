use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::{auth_middleware, require_admin};

use crate::handlers;

/// Reads need any authenticated user; writes are admin-only.
pub fn inventory_routes(state: Arc<AppConfig>) -> Router {
    let read_routes = Router::new()
        .route("/", get(handlers::list_items))
        .route("/low-stock", get(handlers::low_stock_items))
        .route("/statistics", get(handlers::inventory_statistics))
        .route("/{id}", get(handlers::get_item));

    let write_routes = Router::new()
        .route("/", post(handlers::create_item))
        .route(
            "/{id}",
            axum::routing::put(handlers::update_item).delete(handlers::delete_item),
        )
        .route("/{id}/movements", post(handlers::record_movement))
        .layer(middleware::from_fn(require_admin));

    Router::new()
        .merge(read_routes)
        .merge(write_routes)
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}
