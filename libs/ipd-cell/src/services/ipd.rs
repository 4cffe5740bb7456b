use chrono::Utc;
use serde_json::{json, Value};
use tracing::debug;

use shared_config::AppConfig;
use shared_database::D1Client;
use shared_models::error::AppError;
use shared_models::response::Pagination;
use shared_utils::json::{decode_array, decode_columns, encode_column};
use shared_utils::sql::{UpdateBuilder, WhereBuilder};

use crate::models::{
    CreateIpdRecordRequest, DischargeRequest, IpdListQuery, UpdateIpdRecordRequest,
};

const IPD_JSON_COLUMNS: &[&str] = &["medicines", "progress_notes"];

pub struct IpdService {
    d1: D1Client,
}

impl IpdService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            d1: D1Client::new(config),
        }
    }

    pub async fn list(&self, query: IpdListQuery) -> Result<(Vec<Value>, Pagination), AppError> {
        let page = query.page.unwrap_or(1).max(1);
        let limit = query.limit.unwrap_or(10).max(1);
        let offset = (page - 1) * limit;

        let mut filter = WhereBuilder::new();
        filter
            .eq_opt("status", query.status)
            .search_opt(&["patient_name", "phone", "diagnosis"], query.search.as_deref());

        let count_row = self
            .d1
            .query_one(
                &format!(
                    "SELECT COUNT(*) as total FROM ipd_records {}",
                    filter.clause()
                ),
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
                    "SELECT * FROM ipd_records {} \
                     ORDER BY admission_date DESC LIMIT ? OFFSET ?",
                    filter.clause()
                ),
                &params,
            )
            .await
            .map_err(AppError::upstream)?;

        for row in &mut rows {
            decode_columns(row, IPD_JSON_COLUMNS);
        }
        Ok((rows, Pagination::new(page, limit, total)))
    }

    pub async fn get(&self, id: i64) -> Result<Value, AppError> {
        let row = self
            .d1
            .query_one("SELECT * FROM ipd_records WHERE id = ?", &[json!(id)])
            .await
            .map_err(AppError::upstream)?;

        let mut record = row.ok_or_else(|| AppError::NotFound("Patient not found".to_string()))?;
        decode_columns(&mut record, IPD_JSON_COLUMNS);
        Ok(record)
    }

    pub async fn create(&self, request: CreateIpdRecordRequest) -> Result<Value, AppError> {
        if request.patient_name.is_empty() {
            return Err(AppError::Validation(
                "Required field: patient_name".to_string(),
            ));
        }

        let meta = self
            .d1
            .execute(
                "INSERT INTO ipd_records (patient_name, age, gender, phone, address, diagnosis, \
                 doctor_name, admission_date, room_number, bed_number, daily_charges, status, \
                 created_at, updated_at) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, \
                 CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)",
                &[
                    json!(request.patient_name),
                    json!(request.age),
                    json!(request.gender),
                    json!(request.phone),
                    json!(request.address),
                    json!(request.diagnosis),
                    json!(request.doctor_name),
                    json!(request.admission_date),
                    json!(request.room_number),
                    json!(request.bed_number),
                    json!(request.daily_charges),
                    json!(request.status.as_deref().unwrap_or("admitted")),
                ],
            )
            .await
            .map_err(AppError::upstream)?;

        debug!("IPD admission created for {}", request.patient_name);
        self.get(meta.last_row_id.unwrap_or_default()).await
    }

    pub async fn update(&self, id: i64, request: UpdateIpdRecordRequest) -> Result<Value, AppError> {
        self.get(id).await?;

        let mut builder = UpdateBuilder::new("ipd_records");
        builder
            .set_opt("patient_name", request.patient_name)
            .set_opt("age", request.age)
            .set_opt("gender", request.gender)
            .set_opt("phone", request.phone)
            .set_opt("address", request.address)
            .set_opt("diagnosis", request.diagnosis)
            .set_opt("doctor_name", request.doctor_name)
            .set_opt("admission_date", request.admission_date)
            .set_opt("room_number", request.room_number)
            .set_opt("bed_number", request.bed_number)
            .set_opt("daily_charges", request.daily_charges)
            .set_opt("status", request.status);

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
            .execute("DELETE FROM ipd_records WHERE id = ?", &[json!(id)])
            .await
            .map_err(AppError::upstream)?;

        if meta.changes == 0 {
            return Err(AppError::NotFound("Patient not found".to_string()));
        }
        debug!("IPD record deleted: {id}");
        Ok(())
    }

    pub async fn discharge(&self, id: i64, request: DischargeRequest) -> Result<(), AppError> {
        self.get(id).await?;

        self.d1
            .execute(
                "UPDATE ipd_records SET status = 'discharged', discharge_date = ?, \
                 discharge_summary = ?, final_charges = ?, updated_at = CURRENT_TIMESTAMP \
                 WHERE id = ?",
                &[
                    json!(request.discharge_date),
                    json!(request.discharge_summary),
                    json!(request.final_charges),
                    json!(id),
                ],
            )
            .await
            .map_err(AppError::upstream)?;

        debug!("IPD patient discharged: {id}");
        Ok(())
    }

    /// Appends one entry to the medicines blob, stamped with `added_at`.
    pub async fn add_medicine(&self, id: i64, medicine: Value) -> Result<Vec<Value>, AppError> {
        self.append_to_blob(id, "medicines", medicine).await
    }

    /// Appends one entry to the progress notes blob, stamped with `added_at`.
    pub async fn add_progress_note(&self, id: i64, note: Value) -> Result<Vec<Value>, AppError> {
        self.append_to_blob(id, "progress_notes", note).await
    }

    pub async fn progress_notes(&self, id: i64) -> Result<Vec<Value>, AppError> {
        let row = self
            .d1
            .query_one(
                "SELECT progress_notes FROM ipd_records WHERE id = ?",
                &[json!(id)],
            )
            .await
            .map_err(AppError::upstream)?;

        let record = row.ok_or_else(|| AppError::NotFound("Patient not found".to_string()))?;
        Ok(decode_array(record.get("progress_notes")))
    }

    pub async fn statistics(&self) -> Result<Value, AppError> {
        let total = self.count(None).await?;
        let admitted = self.count(Some("admitted")).await?;
        let discharged = self.count(Some("discharged")).await?;

        let occupancy_rate = if total > 0 {
            admitted as f64 / total as f64 * 100.0
        } else {
            0.0
        };

        Ok(json!({
            "total_patients": total,
            "admitted_patients": admitted,
            "discharged_patients": discharged,
            "occupancy_rate": occupancy_rate
        }))
    }

    async fn append_to_blob(
        &self,
        id: i64,
        column: &'static str,
        entry: Value,
    ) -> Result<Vec<Value>, AppError> {
        let record = self.raw_get(id).await?;

        let mut entries = decode_array(record.get(column));
        let mut entry = entry;
        if let Some(object) = entry.as_object_mut() {
            object.insert("added_at".to_string(), json!(Utc::now().to_rfc3339()));
        }
        entries.push(entry);

        self.d1
            .execute(
                &format!(
                    "UPDATE ipd_records SET {column} = ?, updated_at = CURRENT_TIMESTAMP \
                     WHERE id = ?"
                ),
                &[encode_column(&json!(entries)), json!(id)],
            )
            .await
            .map_err(AppError::upstream)?;

        debug!("Appended to {column} for IPD record {id}");
        Ok(entries)
    }

    /// Row without blob decoding, for read-modify-write on a single column.
    async fn raw_get(&self, id: i64) -> Result<Value, AppError> {
        let row = self
            .d1
            .query_one("SELECT * FROM ipd_records WHERE id = ?", &[json!(id)])
            .await
            .map_err(AppError::upstream)?;
        row.ok_or_else(|| AppError::NotFound("Patient not found".to_string()))
    }

    async fn count(&self, status: Option<&str>) -> Result<u64, AppError> {
        let row = match status {
            Some(status) => {
                self.d1
                    .query_one(
                        "SELECT COUNT(*) as total FROM ipd_records WHERE status = ?",
                        &[json!(status)],
                    )
                    .await
            }
            None => {
                self.d1
                    .query_one("SELECT COUNT(*) as total FROM ipd_records", &[])
                    .await
            }
        }
        .map_err(AppError::upstream)?;

        Ok(row.and_then(|r| r["total"].as_u64()).unwrap_or(0))
    }
}
