use regex::Regex;
use serde_json::{json, Value};
use tracing::debug;

use shared_config::AppConfig;
use shared_database::D1Client;
use shared_models::auth::VALID_ROLES;
use shared_models::error::AppError;
use shared_models::response::Pagination;
use shared_utils::sql::{UpdateBuilder, WhereBuilder};

use crate::models::{CreateUserRequest, UpdateUserRequest, UserListQuery};

/// Columns returned to clients; the password column stays out of every SELECT.
const USER_COLUMNS: &str = "id, username, email, role, first_name, last_name, phone, \
                            department, is_active, created_at, updated_at";

pub struct UserService {
    d1: D1Client,
}

impl UserService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            d1: D1Client::new(config),
        }
    }

    pub async fn list(&self, query: UserListQuery) -> Result<(Vec<Value>, Pagination), AppError> {
        let page = query.page.unwrap_or(1).max(1);
        let limit = query.limit.unwrap_or(10).max(1);
        let offset = (page - 1) * limit;

        let mut filter = WhereBuilder::new();
        filter
            .condition("deleted_at IS NULL")
            .eq_opt("role", query.role)
            .eq_opt("department", query.department)
            .eq_opt("is_active", query.is_active.map(|a| a as i64))
            .search_opt(
                &["username", "email", "first_name", "last_name"],
                query.search.as_deref(),
            );

        let count_row = self
            .d1
            .query_one(
                &format!("SELECT COUNT(*) as total FROM users {}", filter.clause()),
                &filter.params(),
            )
            .await
            .map_err(AppError::upstream)?;
        let total = count_row
            .and_then(|row| row["total"].as_u64())
            .unwrap_or(0);

        let mut params = filter.params();
        params.push(json!(limit));
        params.push(json!(offset));
        let rows = self
            .d1
            .query(
                &format!(
                    "SELECT {USER_COLUMNS} FROM users {} ORDER BY created_at DESC LIMIT ? OFFSET ?",
                    filter.clause()
                ),
                &params,
            )
            .await
            .map_err(AppError::upstream)?;

        Ok((rows, Pagination::new(page, limit, total)))
    }

    pub async fn get(&self, id: i64) -> Result<Value, AppError> {
        let row = self
            .d1
            .query_one(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ? AND deleted_at IS NULL"),
                &[json!(id)],
            )
            .await
            .map_err(AppError::upstream)?;

        row.ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    pub async fn create(&self, request: CreateUserRequest) -> Result<Value, AppError> {
        if request.username.is_empty()
            || request.email.is_empty()
            || request.password.is_empty()
            || request.role.is_empty()
            || request.first_name.is_empty()
            || request.last_name.is_empty()
        {
            return Err(AppError::Validation(
                "Required fields: username, email, password, role, first_name, last_name"
                    .to_string(),
            ));
        }

        if !email_is_valid(&request.email) {
            return Err(AppError::Validation("Invalid email format".to_string()));
        }

        validate_role(&request.role)?;

        let duplicate = self
            .d1
            .query_one(
                "SELECT id FROM users WHERE (email = ? OR username = ?) AND deleted_at IS NULL",
                &[json!(request.email), json!(request.username)],
            )
            .await
            .map_err(AppError::upstream)?;
        if duplicate.is_some() {
            return Err(AppError::Conflict(
                "User with this email or username already exists".to_string(),
            ));
        }

        let hashed = hash_password(request.password).await?;

        let meta = self
            .d1
            .execute(
                "INSERT INTO users (username, email, password, role, first_name, last_name, \
                 phone, department, is_active, created_at, updated_at) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, 1, CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)",
                &[
                    json!(request.username),
                    json!(request.email),
                    json!(hashed),
                    json!(request.role),
                    json!(request.first_name),
                    json!(request.last_name),
                    json!(request.phone),
                    json!(request.department),
                ],
            )
            .await
            .map_err(AppError::upstream)?;

        debug!("User created: {} ({})", request.username, request.role);
        Ok(json!({
            "id": meta.last_row_id,
            "username": request.username,
            "email": request.email,
            "role": request.role,
            "first_name": request.first_name,
            "last_name": request.last_name,
            "department": request.department
        }))
    }

    pub async fn update(&self, id: i64, request: UpdateUserRequest) -> Result<(), AppError> {
        self.get(id).await?;

        if let Some(role) = &request.role {
            validate_role(role)?;
        }

        if request.username.is_some() || request.email.is_some() {
            let duplicate = self
                .d1
                .query_one(
                    "SELECT id FROM users WHERE (username = ? OR email = ?) AND id != ? \
                     AND deleted_at IS NULL",
                    &[
                        json!(request.username.clone().unwrap_or_default()),
                        json!(request.email.clone().unwrap_or_default()),
                        json!(id),
                    ],
                )
                .await
                .map_err(AppError::upstream)?;
            if duplicate.is_some() {
                return Err(AppError::Conflict(
                    "Username or email already exists for another user".to_string(),
                ));
            }
        }

        let mut builder = UpdateBuilder::new("users");
        builder
            .set_opt("username", request.username)
            .set_opt("email", request.email)
            .set_opt("role", request.role)
            .set_opt("first_name", request.first_name)
            .set_opt("last_name", request.last_name)
            .set_opt("phone", request.phone)
            .set_opt("department", request.department)
            .set_opt("is_active", request.is_active.map(|a| a as i64));

        if builder.is_empty() {
            return Err(AppError::Validation("No fields to update".to_string()));
        }
        builder.set_raw("updated_at = CURRENT_TIMESTAMP");

        let (sql, params) = builder.build(id);
        self.d1
            .execute(&sql, &params)
            .await
            .map_err(AppError::upstream)?;

        debug!("User updated: {id}");
        Ok(())
    }

    /// Soft delete. The last remaining active admin can never be deleted.
    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        let existing = self.get(id).await?;

        if existing["role"].as_str() == Some("admin") {
            let count_row = self
                .d1
                .query_one(
                    "SELECT COUNT(*) as total FROM users WHERE role = 'admin' \
                     AND deleted_at IS NULL",
                    &[],
                )
                .await
                .map_err(AppError::upstream)?;
            let admins = count_row
                .and_then(|row| row["total"].as_u64())
                .unwrap_or(0);
            if admins <= 1 {
                return Err(AppError::Conflict(
                    "Cannot delete the last admin user".to_string(),
                ));
            }
        }

        self.d1
            .execute(
                "UPDATE users SET deleted_at = CURRENT_TIMESTAMP, is_active = 0 WHERE id = ?",
                &[json!(id)],
            )
            .await
            .map_err(AppError::upstream)?;

        debug!("User soft-deleted: {id}");
        Ok(())
    }

    /// Admin-set password; also the migration path for legacy rows whose
    /// stored value predates bcrypt hashing.
    pub async fn reset_password(&self, id: i64, password: String) -> Result<(), AppError> {
        if password.is_empty() {
            return Err(AppError::Validation("Password is required".to_string()));
        }
        self.get(id).await?;

        let hashed = hash_password(password).await?;
        self.d1
            .execute(
                "UPDATE users SET password = ?, updated_at = CURRENT_TIMESTAMP WHERE id = ?",
                &[json!(hashed), json!(id)],
            )
            .await
            .map_err(AppError::upstream)?;

        debug!("Password reset for user {id}");
        Ok(())
    }

    pub async fn statistics(&self) -> Result<Value, AppError> {
        let total = self.count("deleted_at IS NULL").await?;
        let active = self.count("is_active = 1 AND deleted_at IS NULL").await?;
        let recent = self
            .count("created_at >= datetime('now', '-30 days') AND deleted_at IS NULL")
            .await?;
        let active_last_week = self
            .count("updated_at >= datetime('now', '-7 days') AND deleted_at IS NULL")
            .await?;

        let by_role = self
            .d1
            .query(
                "SELECT role, COUNT(*) as count FROM users \
                 WHERE is_active = 1 AND deleted_at IS NULL GROUP BY role",
                &[],
            )
            .await
            .map_err(AppError::upstream)?;

        Ok(json!({
            "total": total,
            "active": active,
            "inactive": total.saturating_sub(active),
            "byRole": by_role,
            "recentSignups": recent,
            "activeLastWeek": active_last_week
        }))
    }

    async fn count(&self, predicate: &str) -> Result<u64, AppError> {
        let row = self
            .d1
            .query_one(
                &format!("SELECT COUNT(*) as total FROM users WHERE {predicate}"),
                &[],
            )
            .await
            .map_err(AppError::upstream)?;
        Ok(row.and_then(|r| r["total"].as_u64()).unwrap_or(0))
    }
}

async fn hash_password(password: String) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || bcrypt::hash(&password, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
        .map_err(|e| AppError::Internal(e.to_string()))
}

fn validate_role(role: &str) -> Result<(), AppError> {
    if VALID_ROLES.contains(&role) {
        Ok(())
    } else {
        Err(AppError::Validation(
            "Invalid role. Must be one of: admin, doctor, staff, patient".to_string(),
        ))
    }
}

fn email_is_valid(email: &str) -> bool {
    // Same shape check the login form applies; not RFC-complete on purpose.
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
        .map(|re| re.is_match(email))
        .unwrap_or(false)
}
