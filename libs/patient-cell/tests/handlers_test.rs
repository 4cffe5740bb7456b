use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use assert_matches::assert_matches;
use patient_cell::handlers::{create_patient, delete_patient, import_patients};
use patient_cell::models::{CreatePatientRequest, ImportPatientsRequest};
use shared_models::error::AppError;
use shared_utils::test_utils::{test_config, MockD1};

fn minimal_patient(name: &str, phone: &str) -> CreatePatientRequest {
    CreatePatientRequest {
        patient_id: None,
        name: name.to_string(),
        age: Some(34),
        gender: Some("F".to_string()),
        phone: phone.to_string(),
        email: None,
        address: None,
        city: None,
        state: None,
        postal_code: None,
        country: None,
        date_of_birth: None,
        blood_group: None,
        constitution: None,
        primary_treatment: None,
        patient_type: None,
        status: None,
        last_visit: None,
        emergency_contact: None,
        medical_history: None,
        allergies: None,
        current_medication: None,
    }
}

#[tokio::test]
async fn create_generates_a_patient_id_and_returns_the_row() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/query"))
        .and(body_string_contains("INSERT INTO patients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockD1::exec(1, 5)))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/query"))
        .and(body_string_contains("SELECT * FROM patients WHERE id = ?"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockD1::rows(vec![json!({
            "id": 5,
            "patient_id": "P1724650000000123",
            "name": "Meera",
            "phone": "9999999999",
            "patient_type": "OPD",
            "status": "active"
        })])))
        .mount(&server)
        .await;

    let config = Arc::new(test_config(&server.uri()));
    let (status, body) = create_patient(State(config), Json(minimal_patient("Meera", "9999999999")))
        .await
        .unwrap();

    assert_eq!(status, axum::http::StatusCode::CREATED);
    assert_eq!(body.0["data"]["id"], 5);
    assert!(body.0["data"]["patient_id"]
        .as_str()
        .unwrap()
        .starts_with('P'));
}

#[tokio::test]
async fn create_without_phone_is_a_validation_error() {
    let server = MockServer::start().await;
    let config = Arc::new(test_config(&server.uri()));

    let result = create_patient(State(config), Json(minimal_patient("Meera", ""))).await;
    assert_matches!(result.unwrap_err(), AppError::Validation(_));
}

#[tokio::test]
async fn delete_of_missing_patient_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/query"))
        .and(body_string_contains("DELETE FROM patients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockD1::exec(0, 0)))
        .mount(&server)
        .await;

    let config = Arc::new(test_config(&server.uri()));
    let result = delete_patient(State(config), Path(404)).await;
    assert_matches!(result.unwrap_err(), AppError::NotFound(_));
}

#[tokio::test]
async fn import_collects_per_row_errors_without_failing_the_batch() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/query"))
        .and(body_string_contains("INSERT INTO patients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockD1::exec(1, 1)))
        .mount(&server)
        .await;

    let config = Arc::new(test_config(&server.uri()));
    let (status, body) = import_patients(
        State(config),
        Json(ImportPatientsRequest {
            patients: vec![
                minimal_patient("Meera", "9999999999"),
                minimal_patient("", "8888888888"),
                minimal_patient("Ravi", "7777777777"),
            ],
        }),
    )
    .await
    .unwrap();

    assert_eq!(status, axum::http::StatusCode::CREATED);
    assert_eq!(body.0["data"]["imported"], 2);
    assert_eq!(body.0["data"]["failed"], 1);
    assert_eq!(body.0["data"]["errors"][0]["index"], 1);
}

#[tokio::test]
async fn import_with_no_rows_is_a_validation_error() {
    let server = MockServer::start().await;
    let config = Arc::new(test_config(&server.uri()));

    let result = import_patients(
        State(config),
        Json(ImportPatientsRequest { patients: vec![] }),
    )
    .await;
    assert_matches!(result.unwrap_err(), AppError::Validation(_));
}
