use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use assert_matches::assert_matches;
use opd_cell::handlers::{create_prescription, get_record, save_medicines, save_prescription};
use opd_cell::models::{CreatePrescriptionRequest, SaveMedicinesRequest};
use shared_models::error::AppError;
use shared_utils::test_utils::{test_config, MockD1};

fn opd_row() -> serde_json::Value {
    json!({
        "id": 12,
        "patient_name": "Meera",
        "case_id": "C-2031",
        "medicines": "[{\"name\":\"Triphala\",\"dosage\":\"2x daily\"}]",
        "present_complaints": "{\"primary\":\"back pain\"}",
        "status": "active"
    })
}

async fn mount_record_lookup(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/query"))
        .and(body_string_contains("SELECT * FROM opd_records WHERE id = ?"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockD1::rows(vec![opd_row()])))
        .mount(server)
        .await;
}

#[tokio::test]
async fn get_decodes_the_json_blob_columns() {
    let server = MockServer::start().await;
    mount_record_lookup(&server).await;

    let config = Arc::new(test_config(&server.uri()));
    let body = get_record(State(config), Path(12)).await.unwrap().0;

    assert_eq!(body["data"]["medicines"][0]["name"], "Triphala");
    assert_eq!(body["data"]["present_complaints"]["primary"], "back pain");
}

#[tokio::test]
async fn get_of_missing_record_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockD1::empty()))
        .mount(&server)
        .await;

    let config = Arc::new(test_config(&server.uri()));
    let result = get_record(State(config), Path(404)).await;
    assert_matches!(result.unwrap_err(), AppError::NotFound(_));
}

#[tokio::test]
async fn save_medicines_replaces_the_blob() {
    let server = MockServer::start().await;
    mount_record_lookup(&server).await;
    Mock::given(method("POST"))
        .and(path("/query"))
        .and(body_string_contains("UPDATE opd_records SET medicines = ?"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockD1::exec(1, 0)))
        .expect(1)
        .mount(&server)
        .await;

    let config = Arc::new(test_config(&server.uri()));
    let body = save_medicines(
        State(config),
        Path(12),
        Json(SaveMedicinesRequest {
            medicines: json!([{ "name": "Brahmi", "dosage": "1x daily" }]),
            notes: None,
        }),
    )
    .await
    .unwrap()
    .0;

    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["changedRows"], 1);
}

#[tokio::test]
async fn prescription_for_missing_record_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockD1::empty()))
        .mount(&server)
        .await;

    let config = Arc::new(test_config(&server.uri()));
    let result = save_prescription(
        State(config),
        Path(404),
        Json(CreatePrescriptionRequest {
            opd_patient_id: None,
            prescription_date: Some("2026-08-26".to_string()),
            doctor_name: Some("Dr. Rao".to_string()),
            medicines: Some(json!([])),
            instructions: None,
            notes: None,
            follow_up_date: None,
            complaints: None,
            ayurvedic_assessment: None,
            examination: None,
            roga: None,
        }),
    )
    .await;
    assert_matches!(result.unwrap_err(), AppError::NotFound(_));
}

#[tokio::test]
async fn standalone_prescription_requires_the_patient_id() {
    let server = MockServer::start().await;
    let config = Arc::new(test_config(&server.uri()));

    let result = create_prescription(
        State(config),
        Json(CreatePrescriptionRequest {
            opd_patient_id: None,
            prescription_date: None,
            doctor_name: None,
            medicines: None,
            instructions: None,
            notes: None,
            follow_up_date: None,
            complaints: None,
            ayurvedic_assessment: None,
            examination: None,
            roga: None,
        }),
    )
    .await;
    assert_matches!(result.unwrap_err(), AppError::Validation(_));
}

#[tokio::test]
async fn standalone_prescription_returns_the_new_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/query"))
        .and(body_string_contains("INSERT INTO prescriptions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockD1::exec(1, 31)))
        .mount(&server)
        .await;

    let config = Arc::new(test_config(&server.uri()));
    let (status, body) = create_prescription(
        State(config),
        Json(CreatePrescriptionRequest {
            opd_patient_id: Some(12),
            prescription_date: Some("2026-08-26".to_string()),
            doctor_name: Some("Dr. Rao".to_string()),
            medicines: Some(json!([{ "name": "Triphala" }])),
            instructions: Some("After food".to_string()),
            notes: None,
            follow_up_date: None,
            complaints: None,
            ayurvedic_assessment: None,
            examination: None,
            roga: None,
        }),
    )
    .await
    .unwrap();

    assert_eq!(status, axum::http::StatusCode::CREATED);
    assert_eq!(body.0["data"]["prescriptionId"], 31);
}
