use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use assert_matches::assert_matches;
use billing_cell::handlers::{create_bill, get_bill, update_bill};
use billing_cell::models::{CreateBillRequest, UpdateBillRequest};
use shared_models::error::AppError;
use shared_utils::test_utils::{test_config, MockD1};

fn bill_row() -> serde_json::Value {
    json!({
        "id": 9,
        "invoiceId": "INV-1724650000000",
        "patientName": "Meera",
        "services": "[{\"name\":\"Consultation\",\"price\":500}]",
        "amount": 500,
        "paid": 0,
        "status": "Pending"
    })
}

#[tokio::test]
async fn create_generates_an_invoice_id_when_absent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/query"))
        .and(body_string_contains("INSERT INTO billing"))
        .and(body_string_contains("INV-"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockD1::exec(1, 9)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/query"))
        .and(body_string_contains("SELECT * FROM billing WHERE id = ?"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockD1::rows(vec![bill_row()])))
        .mount(&server)
        .await;

    let config = Arc::new(test_config(&server.uri()));
    let (status, body) = create_bill(
        State(config),
        Json(CreateBillRequest {
            invoice_id: None,
            patient_name: "Meera".to_string(),
            patient_id: Some("P17".to_string()),
            date: Some("2026-08-26".to_string()),
            services: Some(json!([{ "name": "Consultation", "price": 500 }])),
            amount: 500.0,
            paid: None,
            status: None,
            payment_method: None,
            phone: None,
            due_date: None,
        }),
    )
    .await
    .unwrap();

    assert_eq!(status, axum::http::StatusCode::CREATED);
    assert!(body.0["data"]["invoiceId"]
        .as_str()
        .unwrap()
        .starts_with("INV-"));
    // Services blob comes back decoded.
    assert_eq!(body.0["data"]["services"][0]["name"], "Consultation");
}

#[tokio::test]
async fn create_without_patient_name_is_a_validation_error() {
    let server = MockServer::start().await;
    let config = Arc::new(test_config(&server.uri()));

    let result = create_bill(
        State(config),
        Json(CreateBillRequest {
            invoice_id: None,
            patient_name: String::new(),
            patient_id: None,
            date: None,
            services: None,
            amount: 100.0,
            paid: None,
            status: None,
            payment_method: None,
            phone: None,
            due_date: None,
        }),
    )
    .await;
    assert_matches!(result.unwrap_err(), AppError::Validation(_));
}

#[tokio::test]
async fn get_decodes_the_services_blob() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockD1::rows(vec![bill_row()])))
        .mount(&server)
        .await;

    let config = Arc::new(test_config(&server.uri()));
    let body = get_bill(State(config), Path(9)).await.unwrap().0;
    assert_eq!(body["data"]["services"][0]["price"], 500);
}

#[tokio::test]
async fn update_with_no_fields_is_a_validation_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockD1::rows(vec![bill_row()])))
        .mount(&server)
        .await;

    let config = Arc::new(test_config(&server.uri()));
    let result = update_bill(State(config), Path(9), Json(UpdateBillRequest::default())).await;
    assert_matches!(result.unwrap_err(), AppError::Validation(_));
}

#[tokio::test]
async fn update_of_missing_bill_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockD1::empty()))
        .mount(&server)
        .await;

    let config = Arc::new(test_config(&server.uri()));
    let result = update_bill(
        State(config),
        Path(404),
        Json(UpdateBillRequest {
            paid: Some(100.0),
            ..Default::default()
        }),
    )
    .await;
    assert_matches!(result.unwrap_err(), AppError::NotFound(_));
}
