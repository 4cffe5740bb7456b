use serde_json::{json, Value};
use tracing::debug;

use shared_config::AppConfig;
use shared_database::D1Client;
use shared_models::error::AppError;
use shared_models::response::Pagination;
use shared_utils::sql::{UpdateBuilder, WhereBuilder};

use crate::models::{CreateStaffRequest, StaffListQuery, UpdateStaffRequest};

pub struct StaffService {
    d1: D1Client,
}

impl StaffService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            d1: D1Client::new(config),
        }
    }

    pub async fn list(&self, query: StaffListQuery) -> Result<(Vec<Value>, Pagination), AppError> {
        let page = query.page.unwrap_or(1).max(1);
        let limit = query.limit.unwrap_or(10).max(1);
        let offset = (page - 1) * limit;

        let mut filter = WhereBuilder::new();
        filter
            .eq_opt("department", query.department)
            .eq_opt("status", query.status)
            .search_opt(&["name", "employee_id", "email"], query.search.as_deref());

        let count_row = self
            .d1
            .query_one(
                &format!("SELECT COUNT(*) as total FROM staff {}", filter.clause()),
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
                    "SELECT * FROM staff {} ORDER BY name ASC LIMIT ? OFFSET ?",
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
            .query_one("SELECT * FROM staff WHERE id = ?", &[json!(id)])
            .await
            .map_err(AppError::upstream)?;

        row.ok_or_else(|| AppError::NotFound("Staff member not found".to_string()))
    }

    pub async fn create(&self, request: CreateStaffRequest) -> Result<Value, AppError> {
        if request.employee_id.is_empty() || request.name.is_empty() || request.email.is_empty() {
            return Err(AppError::Validation(
                "Required fields: employee_id, name, email".to_string(),
            ));
        }

        let meta = self
            .d1
            .execute(
                "INSERT INTO staff (employee_id, name, email, phone, position, department, \
                 join_date, salary, status, address, experience, qualification, \
                 emergency_contact, blood_group, working_hours, created_at, updated_at) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, \
                 CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)",
                &[
                    json!(request.employee_id),
                    json!(request.name),
                    json!(request.email),
                    json!(request.phone),
                    json!(request.position),
                    json!(request.department),
                    json!(request.join_date),
                    json!(request.salary),
                    json!(request.status.as_deref().unwrap_or("Active")),
                    json!(request.address),
                    json!(request.experience),
                    json!(request.qualification),
                    json!(request.emergency_contact),
                    json!(request.blood_group),
                    json!(request.working_hours),
                ],
            )
            .await
            .map_err(AppError::upstream)?;

        debug!("Staff member created: {}", request.employee_id);
        self.get(meta.last_row_id.unwrap_or_default()).await
    }

    pub async fn update(&self, id: i64, request: UpdateStaffRequest) -> Result<Value, AppError> {
        self.get(id).await?;

        let mut builder = UpdateBuilder::new("staff");
        builder
            .set_opt("employee_id", request.employee_id)
            .set_opt("name", request.name)
            .set_opt("email", request.email)
            .set_opt("phone", request.phone)
            .set_opt("position", request.position)
            .set_opt("department", request.department)
            .set_opt("join_date", request.join_date)
            .set_opt("salary", request.salary)
            .set_opt("status", request.status)
            .set_opt("address", request.address)
            .set_opt("experience", request.experience)
            .set_opt("qualification", request.qualification)
            .set_opt("emergency_contact", request.emergency_contact)
            .set_opt("blood_group", request.blood_group)
            .set_opt("working_hours", request.working_hours);

        if builder.is_empty() {
            return Err(AppError::Validation("No fields to update".to_string()));
        }
        builder.set_raw("updated_at = CURRENT_TIMESTAMP");

        let (sql, params) = builder.build(id);
        self.d1
            .execute(&sql, &params)
            .await
            .map_err(AppError::upstream)?;

        self.get(id).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        let meta = self
            .d1
            .execute("DELETE FROM staff WHERE id = ?", &[json!(id)])
            .await
            .map_err(AppError::upstream)?;

        if meta.changes == 0 {
            return Err(AppError::NotFound("Staff member not found".to_string()));
        }
        debug!("Staff member deleted: {id}");
        Ok(())
    }

    pub async fn statistics(&self) -> Result<Value, AppError> {
        let total = self.count(None).await?;
        let active = self.count(Some("Active")).await?;
        let on_leave = self.count(Some("On Leave")).await?;
        let inactive = self.count(Some("Inactive")).await?;

        let distribution = self
            .d1
            .query(
                "SELECT department, COUNT(*) as count FROM staff \
                 WHERE department IS NOT NULL GROUP BY department",
                &[],
            )
            .await
            .map_err(AppError::upstream)?;
        let departments: Vec<Value> = distribution
            .iter()
            .filter_map(|row| row.get("department").cloned())
            .collect();

        Ok(json!({
            "total_staff": total,
            "active_staff": active,
            "on_leave_staff": on_leave,
            "inactive_staff": inactive,
            "total_departments": departments.len(),
            "departments": departments,
            "departmentDistribution": distribution
        }))
    }

    pub async fn departments(&self) -> Result<Vec<Value>, AppError> {
        let rows = self
            .d1
            .query(
                "SELECT DISTINCT department, COUNT(*) as staff_count FROM staff \
                 WHERE department IS NOT NULL GROUP BY department ORDER BY department",
                &[],
            )
            .await
            .map_err(AppError::upstream)?;

        Ok(rows
            .into_iter()
            .map(|row| {
                json!({
                    "name": row["department"],
                    "staff_count": row["staff_count"]
                })
            })
            .collect())
    }

    async fn count(&self, status: Option<&str>) -> Result<u64, AppError> {
        let row = match status {
            Some(status) => {
                self.d1
                    .query_one(
                        "SELECT COUNT(*) as total FROM staff WHERE status = ?",
                        &[json!(status)],
                    )
                    .await
            }
            None => {
                self.d1
                    .query_one("SELECT COUNT(*) as total FROM staff", &[])
                    .await
            }
        }
        .map_err(AppError::upstream)?;

        Ok(row.and_then(|r| r["total"].as_u64()).unwrap_or(0))
    }
}
