use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;
use crate::services::medicines::MedicineState;

pub fn medicine_bill_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(handlers::list_bills).post(handlers::create_bill))
        .route(
            "/{id}",
            get(handlers::get_bill)
                .put(handlers::update_bill)
                .delete(handlers::delete_bill),
        )
        .route("/patient/{patient_id}", get(handlers::bills_for_patient))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}

pub fn medicine_draft_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(handlers::list_drafts).post(handlers::create_draft))
        .route(
            "/{id}",
            get(handlers::get_draft)
                .put(handlers::update_draft)
                .delete(handlers::delete_draft),
        )
        .route("/{id}/convert-to-bill", post(handlers::convert_draft))
        .route("/patient/{patient_id}", get(handlers::drafts_for_patient))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}

pub fn medicine_routes(state: MedicineState) -> Router {
    Router::new()
        .route(
            "/",
            get(handlers::list_medicines).post(handlers::create_medicine),
        )
        .route("/stats", get(handlers::medicine_statistics))
        .route(
            "/{id}",
            get(handlers::get_medicine)
                .put(handlers::update_medicine)
                .delete(handlers::delete_medicine),
        )
        .layer(middleware::from_fn_with_state(
            state.config.clone(),
            auth_middleware,
        ))
        .with_state(state)
}
