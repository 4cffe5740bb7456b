use std::sync::Arc;

use axum::{routing::get, Json, Router};
use serde_json::json;

use auth_cell::router::auth_routes;
use billing_cell::router::billing_routes;
use inventory_cell::router::inventory_routes;
use ipd_cell::router::ipd_routes;
use opd_cell::router::{opd_routes, prescription_routes};
use patient_cell::router::patient_routes;
use pharmacy_cell::{
    build_medicine_state, medicine_bill_routes, medicine_draft_routes, medicine_routes,
};
use shared_config::AppConfig;
use staff_cell::router::staff_routes;
use user_cell::router::user_routes;

pub fn create_router(state: Arc<AppConfig>) -> Router {
    let medicine_state = build_medicine_state(state.clone());

    Router::new()
        .route(
            "/",
            get(|| async { "Hospital Management System API is running!" }),
        )
        .route(
            "/api/health",
            get(|| async {
                Json(json!({
                    "status": "OK",
                    "message": "Hospital Management System API is running"
                }))
            }),
        )
        .nest("/api/auth", auth_routes(state.clone()))
        .nest("/api/users", user_routes(state.clone()))
        .nest("/api/patients", patient_routes(state.clone()))
        .nest("/api/opd", opd_routes(state.clone()))
        .nest("/api/prescriptions", prescription_routes(state.clone()))
        .nest("/api/ipd", ipd_routes(state.clone()))
        .nest("/api/staff", staff_routes(state.clone()))
        .nest("/api/inventory", inventory_routes(state.clone()))
        .nest("/api/billing", billing_routes(state.clone()))
        .nest("/api/medicine-bills", medicine_bill_routes(state.clone()))
        .nest("/api/medicine-drafts", medicine_draft_routes(state.clone()))
        .nest("/api/medicines", medicine_routes(medicine_state))
}
