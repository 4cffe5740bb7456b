use serde_json::{json, Value};
use tracing::{debug, warn};

use shared_config::AppConfig;
use shared_database::D1Client;
use shared_models::auth::AuthUser;
use shared_models::error::AppError;
use shared_utils::jwt::issue_token;

use crate::models::{LoginRequest, SafeUser};

const LOGIN_COLUMNS: &str =
    "id, username, email, password, role, first_name, last_name, department, is_active";

pub struct AuthService {
    d1: D1Client,
    jwt_secret: String,
}

impl AuthService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            d1: D1Client::new(config),
            jwt_secret: config.jwt_secret.clone(),
        }
    }

    /// Checks credentials and issues a signed token. Unknown email, inactive
    /// account, non-bcrypt stored value, and wrong password all yield the
    /// same 401 so responses never reveal whether the account exists.
    pub async fn login(&self, request: LoginRequest) -> Result<(String, SafeUser), AppError> {
        if request.email.is_empty() || request.password.is_empty() {
            return Err(AppError::Validation(
                "Email and password are required".to_string(),
            ));
        }

        debug!("Login attempt for {}", request.email);

        let row = self
            .d1
            .query_one(
                &format!("SELECT {LOGIN_COLUMNS} FROM users WHERE email = ? AND deleted_at IS NULL"),
                &[json!(request.email)],
            )
            .await
            .map_err(AppError::upstream)?;

        let Some(row) = row else {
            return Err(invalid_credentials());
        };

        if !is_truthy(&row["is_active"]) {
            return Err(invalid_credentials());
        }

        let stored = row["password"].as_str().unwrap_or_default().to_string();
        if !stored.starts_with("$2") {
            // Legacy rows with non-bcrypt values must be migrated via the
            // admin password-reset endpoint; they can no longer log in.
            warn!(
                "stored password for {} is not a bcrypt hash; row needs migration",
                request.email
            );
            return Err(invalid_credentials());
        }

        let password = request.password.clone();
        let valid = tokio::task::spawn_blocking(move || bcrypt::verify(&password, &stored))
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?
            .map_err(|e| AppError::Internal(e.to_string()))?;

        if !valid {
            return Err(invalid_credentials());
        }

        let user = SafeUser::from_row(&row);

        // Record the login; failure here should not block authentication.
        if let Err(err) = self
            .d1
            .execute(
                "UPDATE users SET updated_at = CURRENT_TIMESTAMP WHERE id = ?",
                &[json!(user.id)],
            )
            .await
        {
            warn!("failed to record login timestamp: {err:#}");
        }

        let claims_user = AuthUser {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role.clone(),
        };
        let token = issue_token(&claims_user, &self.jwt_secret).map_err(AppError::Internal)?;

        debug!("Login successful for {} ({})", user.email, user.role);
        Ok((token, user))
    }

    /// Fresh store row for the authenticated caller.
    pub async fn current_user(&self, user_id: i64) -> Result<Value, AppError> {
        let row = self
            .d1
            .query_one(
                "SELECT id, username, email, role, first_name, last_name, phone, department, \
                 is_active, created_at, updated_at \
                 FROM users WHERE id = ? AND deleted_at IS NULL",
                &[json!(user_id)],
            )
            .await
            .map_err(AppError::upstream)?;

        row.ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }
}

fn invalid_credentials() -> AppError {
    AppError::Auth("Invalid email or password".to_string())
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_i64().unwrap_or(0) != 0,
        _ => false,
    }
}
