use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use assert_matches::assert_matches;
use pharmacy_cell::handlers::{convert_draft, create_bill, create_medicine, medicine_statistics};
use pharmacy_cell::models::{CreateMedicineRequest, MedicineBillRequest};
use pharmacy_cell::services::medicines::{InMemoryMedicineRepository, MedicineState};
use shared_models::error::AppError;
use shared_utils::test_utils::{test_config, MockD1};

fn bill_request() -> MedicineBillRequest {
    MedicineBillRequest {
        patient_id: "P1724650000123".to_string(),
        patient_name: "Meera".to_string(),
        patient_age: Some(34),
        patient_gender: Some("female".to_string()),
        case_id: Some("C-102".to_string()),
        doctor_id: Some(3),
        doctor_name: Some("Dr. Rao".to_string()),
        medicines: vec![json!({ "name": "Triphala", "qty": 2, "price": 500 })],
        total: Some(1000.0),
        discount: Some(100.0),
        reminder_date: None,
    }
}

fn bill_row() -> serde_json::Value {
    json!({
        "id": 12,
        "patient_id": "P1724650000123",
        "patient_name": "Meera",
        "medicines_json": "[{\"name\":\"Triphala\",\"qty\":2,\"price\":500}]",
        "total_amount": 1000.0,
        "discount": 100.0,
        "final_total": 900.0
    })
}

#[tokio::test]
async fn create_bill_recomputes_the_final_total() {
    let server = MockServer::start().await;
    // The insert must carry 900 (1000 - 100), not any client-sent figure.
    Mock::given(method("POST"))
        .and(path("/query"))
        .and(body_string_contains("INSERT INTO medicine_bills"))
        .and(body_string_contains("900"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockD1::exec(1, 12)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/query"))
        .and(body_string_contains("FROM medicine_bills WHERE id = ?"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockD1::rows(vec![bill_row()])))
        .mount(&server)
        .await;

    let config = Arc::new(test_config(&server.uri()));
    let (status, body) = create_bill(State(config), Json(bill_request()))
        .await
        .unwrap();

    assert_eq!(status, axum::http::StatusCode::CREATED);
    assert_eq!(body.0["data"]["final_total"], 900.0);
    assert_eq!(body.0["data"]["medicines_json"][0]["name"], "Triphala");
}

#[tokio::test]
async fn create_bill_without_medicines_is_a_validation_error() {
    let server = MockServer::start().await;
    let config = Arc::new(test_config(&server.uri()));

    let mut request = bill_request();
    request.medicines.clear();
    let result = create_bill(State(config), Json(request)).await;
    assert_matches!(result.unwrap_err(), AppError::Validation(_));
}

#[tokio::test]
async fn convert_runs_insert_and_delete_as_one_batch() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/query"))
        .and(body_string_contains("SELECT * FROM draft_bills WHERE id = ?"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockD1::rows(vec![json!({
            "id": 5,
            "patient_id": "P1724650000123",
            "patient_name": "Meera",
            "medicines_json": "[{\"name\":\"Triphala\",\"qty\":2,\"price\":500}]",
            "total_amount": 1000.0,
            "discount": 100.0,
            "final_total": 900.0,
            "status": "draft"
        })])))
        .expect(1)
        .mount(&server)
        .await;
    // Insert into medicine_bills and delete of the draft arrive together.
    Mock::given(method("POST"))
        .and(path("/query"))
        .and(body_string_contains("INSERT INTO medicine_bills"))
        .and(body_string_contains("DELETE FROM draft_bills"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(MockD1::batch(vec![(1, 12), (1, 0)])),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/query"))
        .and(body_string_contains("FROM medicine_bills WHERE id = ?"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockD1::rows(vec![bill_row()])))
        .mount(&server)
        .await;

    let config = Arc::new(test_config(&server.uri()));
    let (status, body) = convert_draft(State(config), Path(5)).await.unwrap();
    assert_eq!(status, axum::http::StatusCode::CREATED);
    assert_eq!(body.0["data"]["id"], 12);
}

#[tokio::test]
async fn converting_a_missing_draft_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockD1::empty()))
        .mount(&server)
        .await;

    let config = Arc::new(test_config(&server.uri()));
    let result = convert_draft(State(config), Path(5)).await;
    assert_matches!(result.unwrap_err(), AppError::NotFound(_));
}

fn memory_state(server_uri: &str) -> MedicineState {
    MedicineState {
        config: Arc::new(test_config(server_uri)),
        repo: Arc::new(InMemoryMedicineRepository::default()),
    }
}

#[tokio::test]
async fn catalog_create_and_stats_through_the_handlers() {
    let server = MockServer::start().await;
    let state = memory_state(&server.uri());

    let (status, body) = create_medicine(
        State(state.clone()),
        Json(CreateMedicineRequest {
            name: "Ashwagandha".to_string(),
            kind: Some("Churna".to_string()),
            dose: None,
            batch: Some("B-77".to_string()),
            mfd: None,
            exp: None,
            unit_price: Some(120.0),
            cost_price: Some(80.0),
            stock: Some(10),
            min_stock: Some(2),
            max_stock: Some(50),
            status: None,
            supplier: None,
            location: None,
            description: None,
            properties: None,
        }),
    )
    .await
    .unwrap();

    assert_eq!(status, axum::http::StatusCode::CREATED);
    assert_eq!(body.0["data"]["status"], "In Stock");

    let stats = medicine_statistics(State(state)).await.unwrap().0;
    assert_eq!(stats["data"]["totalMedicines"], 1);
    assert_eq!(stats["data"]["totalInventoryValue"], 1200.0);
    assert_eq!(stats["data"]["profitMargin"], 400.0);
}

#[tokio::test]
async fn catalog_create_requires_a_name() {
    let server = MockServer::start().await;
    let state = memory_state(&server.uri());

    let result = create_medicine(
        State(state),
        Json(CreateMedicineRequest {
            name: String::new(),
            kind: None,
            dose: None,
            batch: None,
            mfd: None,
            exp: None,
            unit_price: None,
            cost_price: None,
            stock: None,
            min_stock: None,
            max_stock: None,
            status: None,
            supplier: None,
            location: None,
            description: None,
            properties: None,
        }),
    )
    .await;
    assert_matches!(result.unwrap_err(), AppError::Validation(_));
}
