use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shared_config::{AppConfig, MedicineStore};
use shared_database::{D1Client, Statement};

fn config_for(server: &MockServer) -> AppConfig {
    AppConfig {
        d1_database_url: format!("{}/query", server.uri()),
        d1_auth_token: "test-token".to_string(),
        jwt_secret: "test-secret".to_string(),
        port: 0,
        medicine_store: MedicineStore::D1,
    }
}

#[tokio::test]
async fn query_returns_rows_from_standard_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/query"))
        .and(body_partial_json(json!({ "sql": "SELECT * FROM staff" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "result": [{ "results": [{"id": 1, "name": "A"}], "meta": {} }]
        })))
        .mount(&server)
        .await;

    let client = D1Client::new(&config_for(&server));
    let rows = client.query("SELECT * FROM staff", &[]).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["name"], "A");
}

#[tokio::test]
async fn query_one_returns_none_for_empty_result() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "result": [{ "results": [], "meta": {} }]
        })))
        .mount(&server)
        .await;

    let client = D1Client::new(&config_for(&server));
    let row = client
        .query_one("SELECT * FROM staff WHERE id = ?", &[json!(99)])
        .await
        .unwrap();
    assert!(row.is_none());
}

#[tokio::test]
async fn execute_reads_changes_and_last_row_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "result": [{ "results": [], "meta": { "changes": 1, "last_row_id": 42 } }]
        })))
        .mount(&server)
        .await;

    let client = D1Client::new(&config_for(&server));
    let meta = client
        .execute("INSERT INTO staff (name) VALUES (?)", &[json!("B")])
        .await
        .unwrap();
    assert_eq!(meta.changes, 1);
    assert_eq!(meta.last_row_id, Some(42));
}

#[tokio::test]
async fn api_level_failure_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "errors": [{ "message": "no such table: ghosts" }]
        })))
        .mount(&server)
        .await;

    let client = D1Client::new(&config_for(&server));
    let err = client.query("SELECT * FROM ghosts", &[]).await.unwrap_err();
    assert!(err.to_string().contains("no such table"));
}

#[tokio::test]
async fn transport_failure_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "success": false })))
        .mount(&server)
        .await;

    let client = D1Client::new(&config_for(&server));
    assert!(client.query("SELECT 1", &[]).await.is_err());
}

#[tokio::test]
async fn batch_sends_all_statements_in_one_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/query"))
        .and(body_partial_json(json!([
            { "sql": "INSERT INTO medicine_bills (patient_id) VALUES (?)" },
            { "sql": "DELETE FROM draft_bills WHERE id = ?" }
        ])))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "result": [
                { "results": [], "meta": { "changes": 1, "last_row_id": 9 } },
                { "results": [], "meta": { "changes": 1 } }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = D1Client::new(&config_for(&server));
    let results = client
        .batch(vec![
            Statement::new(
                "INSERT INTO medicine_bills (patient_id) VALUES (?)",
                vec![json!("P1")],
            ),
            Statement::new("DELETE FROM draft_bills WHERE id = ?", vec![json!(3)]),
        ])
        .await
        .unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].meta["last_row_id"], 9);
}
