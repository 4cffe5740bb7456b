use chrono::Utc;
use serde_json::{json, Value};
use tracing::debug;

use shared_config::AppConfig;
use shared_database::D1Client;
use shared_models::error::AppError;
use shared_models::response::Pagination;
use shared_utils::json::{decode_columns, encode_column};
use shared_utils::sql::{UpdateBuilder, WhereBuilder};

use crate::models::{BillListQuery, CreateBillRequest, UpdateBillRequest};

pub struct BillingService {
    d1: D1Client,
}

impl BillingService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            d1: D1Client::new(config),
        }
    }

    pub async fn list(&self, query: BillListQuery) -> Result<(Vec<Value>, Pagination), AppError> {
        let page = query.page.unwrap_or(1).max(1);
        let limit = query.limit.unwrap_or(10).max(1);
        let offset = (page - 1) * limit;

        let mut filter = WhereBuilder::new();
        filter.eq_opt("status", query.status).search_opt(
            &["patientName", "invoiceId", "phone"],
            query.search.as_deref(),
        );

        let count_row = self
            .d1
            .query_one(
                &format!("SELECT COUNT(*) as total FROM billing {}", filter.clause()),
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
        let mut rows = self
            .d1
            .query(
                &format!(
                    "SELECT * FROM billing {} ORDER BY date DESC LIMIT ? OFFSET ?",
                    filter.clause()
                ),
                &params,
            )
            .await
            .map_err(AppError::upstream)?;

        for row in &mut rows {
            decode_columns(row, &["services"]);
        }
        Ok((rows, Pagination::new(page, limit, total)))
    }

    pub async fn get(&self, id: i64) -> Result<Value, AppError> {
        let row = self
            .d1
            .query_one("SELECT * FROM billing WHERE id = ?", &[json!(id)])
            .await
            .map_err(AppError::upstream)?;

        let mut bill = row.ok_or_else(|| AppError::NotFound("Bill not found".to_string()))?;
        decode_columns(&mut bill, &["services"]);
        Ok(bill)
    }

    pub async fn create(&self, request: CreateBillRequest) -> Result<Value, AppError> {
        if request.patient_name.is_empty() {
            return Err(AppError::Validation(
                "Required field: patientName".to_string(),
            ));
        }
        if request.amount < 0.0 {
            return Err(AppError::Validation(
                "Amount must not be negative".to_string(),
            ));
        }

        let invoice_id = request
            .invoice_id
            .clone()
            .filter(|i| !i.is_empty())
            .unwrap_or_else(generate_invoice_id);
        let services = request.services.unwrap_or(Value::Null);

        let meta = self
            .d1
            .execute(
                "INSERT INTO billing (invoiceId, patientName, patientId, date, services, \
                 amount, paid, status, paymentMethod, phone, dueDate) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                &[
                    json!(invoice_id),
                    json!(request.patient_name),
                    json!(request.patient_id),
                    json!(request.date),
                    encode_column(&services),
                    json!(request.amount),
                    json!(request.paid.unwrap_or(0.0)),
                    json!(request.status.as_deref().unwrap_or("Pending")),
                    json!(request.payment_method),
                    json!(request.phone),
                    json!(request.due_date),
                ],
            )
            .await
            .map_err(AppError::upstream)?;

        debug!("Bill created: {invoice_id}");
        self.get(meta.last_row_id.unwrap_or_default()).await
    }

    pub async fn update(&self, id: i64, request: UpdateBillRequest) -> Result<Value, AppError> {
        self.get(id).await?;

        let mut builder = UpdateBuilder::new("billing");
        builder
            .set_opt("patientName", request.patient_name)
            .set_opt("patientId", request.patient_id)
            .set_opt("date", request.date)
            .set_opt("services", request.services.as_ref().map(encode_column))
            .set_opt("amount", request.amount)
            .set_opt("paid", request.paid)
            .set_opt("status", request.status)
            .set_opt("paymentMethod", request.payment_method)
            .set_opt("phone", request.phone)
            .set_opt("dueDate", request.due_date);

        if builder.is_empty() {
            return Err(AppError::Validation("No fields to update".to_string()));
        }

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
            .execute("DELETE FROM billing WHERE id = ?", &[json!(id)])
            .await
            .map_err(AppError::upstream)?;

        if meta.changes == 0 {
            return Err(AppError::NotFound("Bill not found".to_string()));
        }
        debug!("Bill deleted: {id}");
        Ok(())
    }

    pub async fn statistics(&self) -> Result<Value, AppError> {
        let row = self
            .d1
            .query_one(
                "SELECT COUNT(*) as totalBills, \
                 SUM(amount) as totalAmount, \
                 SUM(paid) as totalPaid, \
                 SUM(amount - paid) as totalDue, \
                 COUNT(CASE WHEN status = 'Paid' THEN 1 END) as paidCount, \
                 COUNT(CASE WHEN status = 'Pending' THEN 1 END) as pendingCount, \
                 COUNT(CASE WHEN status = 'Overdue' THEN 1 END) as overdueCount \
                 FROM billing",
                &[],
            )
            .await
            .map_err(AppError::upstream)?;

        Ok(row.unwrap_or_else(|| json!({})))
    }
}

/// `INV-` + epoch millis, matching existing invoice keys.
fn generate_invoice_id() -> String {
    format!("INV-{}", Utc::now().timestamp_millis())
}
