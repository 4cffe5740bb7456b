//! Shared fixtures for cell tests: config pointed at a mock D1 endpoint,
//! token minting for each role, and canned D1 REST response bodies.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use serde_json::{json, Value};
use sha2::Sha256;

use shared_config::{AppConfig, MedicineStore};
use shared_models::auth::AuthUser;

pub const TEST_JWT_SECRET: &str = "test-secret-key-for-jwt-validation-must-be-long-enough";

/// Config pointing at a mock D1 endpoint (`<base>/query`).
pub fn test_config(d1_base_url: &str) -> AppConfig {
    AppConfig {
        d1_database_url: format!("{d1_base_url}/query"),
        d1_auth_token: "test-token".to_string(),
        jwt_secret: TEST_JWT_SECRET.to_string(),
        port: 0,
        medicine_store: MedicineStore::D1,
    }
}

pub struct TestUser {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub name: String,
    pub role: String,
}

impl TestUser {
    pub fn new(email: &str, role: &str) -> Self {
        Self {
            id: 1,
            username: email.split('@').next().unwrap_or("user").to_string(),
            email: email.to_string(),
            name: "Test User".to_string(),
            role: role.to_string(),
        }
    }

    pub fn admin(email: &str) -> Self {
        Self::new(email, "admin")
    }

    pub fn doctor(email: &str) -> Self {
        Self::new(email, "doctor")
    }

    pub fn staff(email: &str) -> Self {
        Self::new(email, "staff")
    }

    pub fn to_auth_user(&self) -> AuthUser {
        AuthUser {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            name: self.name.clone(),
            role: self.role.clone(),
        }
    }
}

pub struct JwtTestUtils;

impl JwtTestUtils {
    pub fn create_token(user: &TestUser, secret: &str, ttl_hours: i64) -> String {
        let now = Utc::now();
        let header = json!({ "alg": "HS256", "typ": "JWT" });
        let payload = json!({
            "sub": user.id,
            "username": user.username,
            "email": user.email,
            "name": user.name,
            "role": user.role,
            "iat": now.timestamp(),
            "exp": (now + Duration::hours(ttl_hours)).timestamp()
        });

        let header_encoded = URL_SAFE_NO_PAD.encode(header.to_string());
        let payload_encoded = URL_SAFE_NO_PAD.encode(payload.to_string());
        let signing_input = format!("{header_encoded}.{payload_encoded}");

        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(signing_input.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        format!("{signing_input}.{signature}")
    }

    pub fn create_test_token(user: &TestUser) -> String {
        Self::create_token(user, TEST_JWT_SECRET, 24)
    }

    pub fn create_expired_token(user: &TestUser) -> String {
        Self::create_token(user, TEST_JWT_SECRET, -1)
    }

    pub fn create_invalid_signature_token(user: &TestUser) -> String {
        Self::create_token(user, "wrong-secret", 24)
    }
}

/// Canned bodies in the D1 REST response shape.
pub struct MockD1;

impl MockD1 {
    pub fn rows(rows: Vec<Value>) -> Value {
        json!({
            "success": true,
            "result": [{ "results": rows, "meta": {} }]
        })
    }

    pub fn count(total: u64) -> Value {
        Self::rows(vec![json!({ "total": total, "count": total })])
    }

    pub fn empty() -> Value {
        Self::rows(vec![])
    }

    pub fn exec(changes: u64, last_row_id: i64) -> Value {
        json!({
            "success": true,
            "result": [{
                "results": [],
                "meta": { "changes": changes, "last_row_id": last_row_id }
            }]
        })
    }

    pub fn batch(metas: Vec<(u64, i64)>) -> Value {
        let sets: Vec<Value> = metas
            .into_iter()
            .map(|(changes, last_row_id)| {
                json!({
                    "results": [],
                    "meta": { "changes": changes, "last_row_id": last_row_id }
                })
            })
            .collect();
        json!({ "success": true, "result": sets })
    }

    pub fn error(message: &str) -> Value {
        json!({
            "success": false,
            "errors": [{ "message": message }]
        })
    }
}
