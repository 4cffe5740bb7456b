use serde_json::{json, Value};
use tracing::debug;

use shared_config::AppConfig;
use shared_database::D1Client;
use shared_models::error::AppError;
use shared_utils::json::decode_columns;

use crate::models::MedicineBillRequest;

const BILL_JSON_COLUMNS: &[&str] = &["medicines_json"];

pub struct MedicineBillService {
    d1: D1Client,
}

impl MedicineBillService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            d1: D1Client::new(config),
        }
    }

    pub async fn list(&self) -> Result<Vec<Value>, AppError> {
        let mut rows = self
            .d1
            .query(
                "SELECT * FROM medicine_bills ORDER BY created_at DESC",
                &[],
            )
            .await
            .map_err(AppError::upstream)?;

        for row in &mut rows {
            decode_columns(row, BILL_JSON_COLUMNS);
        }
        Ok(rows)
    }

    pub async fn for_patient(&self, patient_id: &str) -> Result<Vec<Value>, AppError> {
        let mut rows = self
            .d1
            .query(
                "SELECT * FROM medicine_bills WHERE patient_id = ? ORDER BY created_at DESC",
                &[json!(patient_id)],
            )
            .await
            .map_err(AppError::upstream)?;

        for row in &mut rows {
            decode_columns(row, BILL_JSON_COLUMNS);
        }
        Ok(rows)
    }

    pub async fn get(&self, id: i64) -> Result<Value, AppError> {
        let row = self
            .d1
            .query_one("SELECT * FROM medicine_bills WHERE id = ?", &[json!(id)])
            .await
            .map_err(AppError::upstream)?;

        let mut bill = row.ok_or_else(|| AppError::NotFound("Bill not found".to_string()))?;
        decode_columns(&mut bill, BILL_JSON_COLUMNS);
        Ok(bill)
    }

    pub async fn create(&self, request: MedicineBillRequest) -> Result<Value, AppError> {
        validate(&request)?;

        let total = request.total.unwrap_or(0.0);
        let discount = request.discount.unwrap_or(0.0);
        let final_total = total - discount;

        let meta = self
            .d1
            .execute(
                "INSERT INTO medicine_bills (patient_id, patient_name, patient_age, \
                 patient_gender, case_id, doctor_id, doctor_name, medicines_json, \
                 total_amount, discount, final_total, reminder_date, finalized_at) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, datetime('now'))",
                &[
                    json!(request.patient_id),
                    json!(request.patient_name),
                    json!(request.patient_age),
                    json!(request.patient_gender),
                    json!(request.case_id),
                    json!(request.doctor_id),
                    json!(request.doctor_name),
                    json!(Value::Array(request.medicines.clone()).to_string()),
                    json!(total),
                    json!(discount),
                    json!(final_total),
                    json!(request.reminder_date),
                ],
            )
            .await
            .map_err(AppError::upstream)?;

        debug!("Medicine bill created for patient {}", request.patient_id);
        self.get(meta.last_row_id.unwrap_or_default()).await
    }

    pub async fn update(&self, id: i64, request: MedicineBillRequest) -> Result<Value, AppError> {
        validate(&request)?;
        self.get(id).await?;

        let total = request.total.unwrap_or(0.0);
        let discount = request.discount.unwrap_or(0.0);
        let final_total = total - discount;

        self.d1
            .execute(
                "UPDATE medicine_bills SET patient_id = ?, patient_name = ?, patient_age = ?, \
                 patient_gender = ?, case_id = ?, doctor_id = ?, doctor_name = ?, \
                 medicines_json = ?, total_amount = ?, discount = ?, final_total = ?, \
                 reminder_date = ? WHERE id = ?",
                &[
                    json!(request.patient_id),
                    json!(request.patient_name),
                    json!(request.patient_age),
                    json!(request.patient_gender),
                    json!(request.case_id),
                    json!(request.doctor_id),
                    json!(request.doctor_name),
                    json!(Value::Array(request.medicines.clone()).to_string()),
                    json!(total),
                    json!(discount),
                    json!(final_total),
                    json!(request.reminder_date),
                    json!(id),
                ],
            )
            .await
            .map_err(AppError::upstream)?;

        self.get(id).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        let meta = self
            .d1
            .execute("DELETE FROM medicine_bills WHERE id = ?", &[json!(id)])
            .await
            .map_err(AppError::upstream)?;

        if meta.changes == 0 {
            return Err(AppError::NotFound("Bill not found".to_string()));
        }
        debug!("Medicine bill deleted: {id}");
        Ok(())
    }
}

fn validate(request: &MedicineBillRequest) -> Result<(), AppError> {
    if request.patient_id.is_empty() || request.patient_name.is_empty() {
        return Err(AppError::Validation(
            "Required fields: patientId, patientName".to_string(),
        ));
    }
    if request.medicines.is_empty() {
        return Err(AppError::Validation(
            "At least one medicine is required".to_string(),
        ));
    }
    Ok(())
}
