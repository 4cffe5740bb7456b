use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::json;
use tower::ServiceExt;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shared_utils::test_utils::{test_config, JwtTestUtils, MockD1, TestUser};
use staff_cell::router::staff_routes;

async fn mount_staff_list(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/query"))
        .and(body_string_contains("SELECT COUNT(*)"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockD1::count(1)))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/query"))
        .and(body_string_contains("ORDER BY name ASC"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockD1::rows(vec![json!({
            "id": 1,
            "employee_id": "EMP001",
            "name": "Kiran",
            "email": "kiran@example.com",
            "department": "Pharmacy",
            "status": "Active"
        })])))
        .mount(server)
        .await;
}

fn get_request(token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri("/");
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn list_without_a_token_is_unauthorized() {
    let server = MockServer::start().await;
    let app = staff_routes(Arc::new(test_config(&server.uri())));

    let response = app.oneshot(get_request(None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn list_with_a_staff_token_is_forbidden() {
    let server = MockServer::start().await;
    let app = staff_routes(Arc::new(test_config(&server.uri())));

    let token = JwtTestUtils::create_test_token(&TestUser::staff("kiran@example.com"));
    let response = app.oneshot(get_request(Some(&token))).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn list_with_an_expired_token_is_unauthorized() {
    let server = MockServer::start().await;
    let app = staff_routes(Arc::new(test_config(&server.uri())));

    let token = JwtTestUtils::create_expired_token(&TestUser::admin("root@example.com"));
    let response = app.oneshot(get_request(Some(&token))).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn list_with_an_admin_token_returns_the_page() {
    let server = MockServer::start().await;
    mount_staff_list(&server).await;
    let app = staff_routes(Arc::new(test_config(&server.uri())));

    let token = JwtTestUtils::create_test_token(&TestUser::admin("root@example.com"));
    let response = app.oneshot(get_request(Some(&token))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["data"][0]["employee_id"], "EMP001");
    assert_eq!(json["pagination"]["total"], 1);
}

#[tokio::test]
async fn departments_endpoint_shapes_the_rollup() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/query"))
        .and(body_string_contains("GROUP BY department ORDER BY department"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockD1::rows(vec![
            json!({ "department": "OPD", "staff_count": 4 }),
            json!({ "department": "Pharmacy", "staff_count": 2 }),
        ])))
        .mount(&server)
        .await;
    let app = staff_routes(Arc::new(test_config(&server.uri())));

    let token = JwtTestUtils::create_test_token(&TestUser::admin("root@example.com"));
    let response = app
        .oneshot(
            Request::builder()
                .uri("/departments")
                .header("Authorization", format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["data"][0]["name"], "OPD");
    assert_eq!(json["data"][0]["staff_count"], 4);
}

#[tokio::test]
async fn create_without_required_fields_is_a_bad_request() {
    let server = MockServer::start().await;
    let app = staff_routes(Arc::new(test_config(&server.uri())));

    let token = JwtTestUtils::create_test_token(&TestUser::admin("root@example.com"));
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/")
                .header("Authorization", format!("Bearer {token}"))
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({ "employee_id": "", "name": "", "email": "" }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
