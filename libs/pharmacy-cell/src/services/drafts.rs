use serde_json::{json, Value};
use tracing::debug;

use shared_config::AppConfig;
use shared_database::{D1Client, Statement};
use shared_models::error::AppError;
use shared_utils::json::decode_columns;

use crate::models::MedicineBillRequest;

const DRAFT_JSON_COLUMNS: &[&str] = &["medicines_json"];

pub struct DraftBillService {
    d1: D1Client,
}

impl DraftBillService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            d1: D1Client::new(config),
        }
    }

    pub async fn list(&self) -> Result<Vec<Value>, AppError> {
        let mut rows = self
            .d1
            .query("SELECT * FROM draft_bills ORDER BY created_at DESC", &[])
            .await
            .map_err(AppError::upstream)?;

        for row in &mut rows {
            decode_columns(row, DRAFT_JSON_COLUMNS);
        }
        Ok(rows)
    }

    pub async fn for_patient(&self, patient_id: &str) -> Result<Vec<Value>, AppError> {
        let mut rows = self
            .d1
            .query(
                "SELECT * FROM draft_bills WHERE patient_id = ? ORDER BY created_at DESC",
                &[json!(patient_id)],
            )
            .await
            .map_err(AppError::upstream)?;

        for row in &mut rows {
            decode_columns(row, DRAFT_JSON_COLUMNS);
        }
        Ok(rows)
    }

    pub async fn get(&self, id: i64) -> Result<Value, AppError> {
        let row = self
            .d1
            .query_one("SELECT * FROM draft_bills WHERE id = ?", &[json!(id)])
            .await
            .map_err(AppError::upstream)?;

        let mut draft = row.ok_or_else(|| AppError::NotFound("Draft not found".to_string()))?;
        decode_columns(&mut draft, DRAFT_JSON_COLUMNS);
        Ok(draft)
    }

    pub async fn create(&self, request: MedicineBillRequest) -> Result<Value, AppError> {
        validate(&request)?;

        let total = request.total.unwrap_or(0.0);
        let discount = request.discount.unwrap_or(0.0);
        let final_total = total - discount;

        let meta = self
            .d1
            .execute(
                "INSERT INTO draft_bills (patient_id, patient_name, patient_age, \
                 patient_gender, case_id, doctor_id, doctor_name, medicines_json, \
                 total_amount, discount, final_total, reminder_date, status) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 'draft')",
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

        debug!("Draft bill created for patient {}", request.patient_id);
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
                "UPDATE draft_bills SET patient_id = ?, patient_name = ?, patient_age = ?, \
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
            .execute("DELETE FROM draft_bills WHERE id = ?", &[json!(id)])
            .await
            .map_err(AppError::upstream)?;

        if meta.changes == 0 {
            return Err(AppError::NotFound("Draft not found".to_string()));
        }
        debug!("Draft bill deleted: {id}");
        Ok(())
    }

    /// Copies the draft into `medicine_bills` and deletes the draft as one
    /// atomic batch. A draft that was already converted no longer exists, so
    /// a second conversion is a plain 404 and can never duplicate the bill.
    pub async fn convert_to_bill(&self, id: i64) -> Result<Value, AppError> {
        let draft = self
            .d1
            .query_one("SELECT * FROM draft_bills WHERE id = ?", &[json!(id)])
            .await
            .map_err(AppError::upstream)?
            .ok_or_else(|| AppError::NotFound("Draft not found".to_string()))?;

        let results = self
            .d1
            .batch(vec![
                Statement::new(
                    "INSERT INTO medicine_bills (patient_id, patient_name, patient_age, \
                     patient_gender, case_id, doctor_id, doctor_name, medicines_json, \
                     total_amount, discount, final_total, reminder_date, finalized_at) \
                     VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, datetime('now'))",
                    vec![
                        draft["patient_id"].clone(),
                        draft["patient_name"].clone(),
                        draft["patient_age"].clone(),
                        draft["patient_gender"].clone(),
                        draft["case_id"].clone(),
                        draft["doctor_id"].clone(),
                        draft["doctor_name"].clone(),
                        draft["medicines_json"].clone(),
                        draft["total_amount"].clone(),
                        draft["discount"].clone(),
                        draft["final_total"].clone(),
                        draft["reminder_date"].clone(),
                    ],
                ),
                Statement::new("DELETE FROM draft_bills WHERE id = ?", vec![json!(id)]),
            ])
            .await
            .map_err(AppError::upstream)?;

        let bill_id = results
            .first()
            .and_then(|r| r.meta["last_row_id"].as_i64())
            .unwrap_or_default();

        debug!("Draft {id} converted to medicine bill {bill_id}");

        let row = self
            .d1
            .query_one("SELECT * FROM medicine_bills WHERE id = ?", &[json!(bill_id)])
            .await
            .map_err(AppError::upstream)?;
        let mut bill = row.ok_or_else(|| {
            AppError::Internal("Converted bill could not be read back".to_string())
        })?;
        decode_columns(&mut bill, DRAFT_JSON_COLUMNS);
        Ok(bill)
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
