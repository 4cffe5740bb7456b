use std::sync::Arc;

use axum::extract::{Extension, State};
use axum::Json;
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use assert_matches::assert_matches;
use auth_cell::handlers::{login, me};
use auth_cell::models::LoginRequest;
use shared_models::error::AppError;
use shared_utils::test_utils::{test_config, MockD1, TestUser};

fn user_row(password: &str, is_active: i64) -> serde_json::Value {
    json!({
        "id": 1,
        "username": "asha",
        "email": "asha@example.com",
        "password": password,
        "role": "doctor",
        "first_name": "Asha",
        "last_name": "Rao",
        "department": "OPD",
        "is_active": is_active
    })
}

async fn mount_user_lookup(server: &MockServer, row: Option<serde_json::Value>) {
    let body = match row {
        Some(row) => MockD1::rows(vec![row]),
        None => MockD1::empty(),
    };
    Mock::given(method("POST"))
        .and(path("/query"))
        .and(body_string_contains("FROM users WHERE email = ?"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_login_stamp(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/query"))
        .and(body_string_contains("UPDATE users SET updated_at"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockD1::exec(1, 0)))
        .mount(server)
        .await;
}

#[tokio::test]
async fn login_with_correct_credentials_returns_token_with_role() {
    let server = MockServer::start().await;
    let hash = bcrypt::hash("s3cret", 4).unwrap();
    mount_user_lookup(&server, Some(user_row(&hash, 1))).await;
    mount_login_stamp(&server).await;

    let config = Arc::new(test_config(&server.uri()));
    let result = login(
        State(config.clone()),
        Json(LoginRequest {
            email: "asha@example.com".to_string(),
            password: "s3cret".to_string(),
        }),
    )
    .await;

    let body = result.unwrap().0;
    assert_eq!(body["success"], true);
    assert_eq!(body["user"]["role"], "doctor");
    assert_eq!(body["user"]["name"], "Asha Rao");

    let token = body["token"].as_str().unwrap();
    let decoded = shared_utils::jwt::validate_token(token, &config.jwt_secret).unwrap();
    assert_eq!(decoded.role, "doctor");
    assert_eq!(decoded.id, 1);
}

#[tokio::test]
async fn login_with_wrong_password_is_unauthorized() {
    let server = MockServer::start().await;
    let hash = bcrypt::hash("s3cret", 4).unwrap();
    mount_user_lookup(&server, Some(user_row(&hash, 1))).await;

    let config = Arc::new(test_config(&server.uri()));
    let result = login(
        State(config),
        Json(LoginRequest {
            email: "asha@example.com".to_string(),
            password: "wrong".to_string(),
        }),
    )
    .await;

    assert_matches!(result.unwrap_err(), AppError::Auth(msg) => {
        assert_eq!(msg, "Invalid email or password");
    });
}

#[tokio::test]
async fn login_with_unknown_email_uses_the_same_message() {
    let server = MockServer::start().await;
    mount_user_lookup(&server, None).await;

    let config = Arc::new(test_config(&server.uri()));
    let result = login(
        State(config),
        Json(LoginRequest {
            email: "nobody@example.com".to_string(),
            password: "whatever".to_string(),
        }),
    )
    .await;

    assert_matches!(result.unwrap_err(), AppError::Auth(msg) => {
        assert_eq!(msg, "Invalid email or password");
    });
}

#[tokio::test]
async fn login_rejects_legacy_plaintext_rows() {
    let server = MockServer::start().await;
    // Stored value is the correct password but not a bcrypt hash: the row
    // needs migration and must not authenticate.
    mount_user_lookup(&server, Some(user_row("s3cret", 1))).await;

    let config = Arc::new(test_config(&server.uri()));
    let result = login(
        State(config),
        Json(LoginRequest {
            email: "asha@example.com".to_string(),
            password: "s3cret".to_string(),
        }),
    )
    .await;

    assert_matches!(result.unwrap_err(), AppError::Auth(_));
}

#[tokio::test]
async fn login_rejects_inactive_accounts() {
    let server = MockServer::start().await;
    let hash = bcrypt::hash("s3cret", 4).unwrap();
    mount_user_lookup(&server, Some(user_row(&hash, 0))).await;

    let config = Arc::new(test_config(&server.uri()));
    let result = login(
        State(config),
        Json(LoginRequest {
            email: "asha@example.com".to_string(),
            password: "s3cret".to_string(),
        }),
    )
    .await;

    assert_matches!(result.unwrap_err(), AppError::Auth(_));
}

#[tokio::test]
async fn login_with_missing_fields_is_a_validation_error() {
    let server = MockServer::start().await;
    let config = Arc::new(test_config(&server.uri()));

    let result = login(
        State(config),
        Json(LoginRequest {
            email: String::new(),
            password: String::new(),
        }),
    )
    .await;

    assert_matches!(result.unwrap_err(), AppError::Validation(_));
}

#[tokio::test]
async fn me_returns_the_fresh_store_row() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/query"))
        .and(body_string_contains("FROM users WHERE id = ?"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockD1::rows(vec![json!({
            "id": 1,
            "username": "asha",
            "email": "asha@example.com",
            "role": "doctor",
            "first_name": "Asha",
            "last_name": "Rao",
            "is_active": 1
        })])))
        .mount(&server)
        .await;

    let config = Arc::new(test_config(&server.uri()));
    let caller = TestUser::doctor("asha@example.com").to_auth_user();

    let body = me(State(config), Extension(caller)).await.unwrap().0;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["username"], "asha");
}

#[tokio::test]
async fn me_is_not_found_for_soft_deleted_users() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockD1::empty()))
        .mount(&server)
        .await;

    let config = Arc::new(test_config(&server.uri()));
    let caller = TestUser::doctor("gone@example.com").to_auth_user();

    let result = me(State(config), Extension(caller)).await;
    assert_matches!(result.unwrap_err(), AppError::NotFound(_));
}
