use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// User fields safe to return to clients; the password hash never leaves the
/// service layer.
#[derive(Debug, Clone, Serialize)]
pub struct SafeUser {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub name: String,
    pub role: String,
    pub department: Option<String>,
}

impl SafeUser {
    pub fn from_row(row: &Value) -> Self {
        let first = row["first_name"].as_str().unwrap_or_default();
        let last = row["last_name"].as_str().unwrap_or_default();
        Self {
            id: row["id"].as_i64().unwrap_or_default(),
            username: row["username"].as_str().unwrap_or_default().to_string(),
            email: row["email"].as_str().unwrap_or_default().to_string(),
            name: format!("{first} {last}").trim().to_string(),
            role: row["role"].as_str().unwrap_or_default().to_string(),
            department: row["department"].as_str().map(str::to_string),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub token: String,
    pub user: SafeUser,
}
