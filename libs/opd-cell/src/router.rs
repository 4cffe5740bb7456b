use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::{auth_middleware, require_doctor};

use crate::handlers;

pub fn opd_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(handlers::list_records).post(handlers::create_record))
        .route("/statistics", get(handlers::opd_statistics))
        .route(
            "/{id}",
            get(handlers::get_record)
                .put(handlers::update_record)
                .delete(handlers::delete_record),
        )
        .route("/{id}/medicine", post(handlers::save_medicines))
        .route("/{id}/prescription", post(handlers::save_prescription))
        .layer(middleware::from_fn(require_doctor))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}

pub fn prescription_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", post(handlers::create_prescription))
        .route("/{id}", get(handlers::get_prescription))
        .route(
            "/patient/{opd_patient_id}",
            get(handlers::prescriptions_for_patient),
        )
        .layer(middleware::from_fn(require_doctor))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}
