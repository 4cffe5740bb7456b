use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::{auth_middleware, require_doctor};

use crate::handlers;

pub fn ipd_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route(
            "/patients",
            get(handlers::list_patients).post(handlers::create_patient),
        )
        .route("/statistics", get(handlers::ipd_statistics))
        .route(
            "/patients/{id}",
            get(handlers::get_patient)
                .put(handlers::update_patient)
                .delete(handlers::delete_patient),
        )
        .route("/patients/{id}/discharge", post(handlers::discharge_patient))
        .route("/patients/{id}/medicine", post(handlers::add_medicine))
        .route(
            "/patients/{id}/progress-note",
            post(handlers::add_progress_note),
        )
        .route(
            "/patients/{id}/progress-notes",
            get(handlers::get_progress_notes),
        )
        .layer(middleware::from_fn(require_doctor))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}
