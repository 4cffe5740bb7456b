use serde_json::{json, Value};
use tracing::debug;

use shared_config::AppConfig;
use shared_database::D1Client;
use shared_models::error::AppError;
use shared_models::response::Pagination;
use shared_utils::json::{decode_columns, encode_column};
use shared_utils::sql::{UpdateBuilder, WhereBuilder};

use crate::models::{
    CreateOpdRecordRequest, OpdListQuery, SaveMedicinesRequest, UpdateOpdRecordRequest,
    OPD_JSON_COLUMNS,
};

pub struct OpdService {
    d1: D1Client,
}

impl OpdService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            d1: D1Client::new(config),
        }
    }

    pub async fn list(&self, query: OpdListQuery) -> Result<(Vec<Value>, Pagination), AppError> {
        let page = query.page.unwrap_or(1).max(1);
        let limit = query.limit.unwrap_or(10).max(1);
        let offset = (page - 1) * limit;

        let mut filter = WhereBuilder::new();
        filter
            .search_opt(
                &["patient_name", "patient_phone", "case_id"],
                query.search.as_deref(),
            )
            .eq_opt("status", query.status)
            .ge_opt("visit_date", query.date_from)
            .le_opt("visit_date", query.date_to);

        let count_row = self
            .d1
            .query_one(
                &format!(
                    "SELECT COUNT(*) as total FROM opd_records {}",
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
                    "SELECT * FROM opd_records {} \
                     ORDER BY visit_date DESC, created_at DESC LIMIT ? OFFSET ?",
                    filter.clause()
                ),
                &params,
            )
            .await
            .map_err(AppError::upstream)?;

        for row in &mut rows {
            decode_columns(row, OPD_JSON_COLUMNS);
        }
        Ok((rows, Pagination::new(page, limit, total)))
    }

    pub async fn get(&self, id: i64) -> Result<Value, AppError> {
        let row = self
            .d1
            .query_one("SELECT * FROM opd_records WHERE id = ?", &[json!(id)])
            .await
            .map_err(AppError::upstream)?;

        let mut record = row.ok_or_else(|| AppError::NotFound("Patient not found".to_string()))?;
        decode_columns(&mut record, OPD_JSON_COLUMNS);
        Ok(record)
    }

    pub async fn create(&self, request: CreateOpdRecordRequest) -> Result<Value, AppError> {
        if request.patient_name.is_empty() {
            return Err(AppError::Validation(
                "Required field: patientName".to_string(),
            ));
        }

        let meta = self
            .d1
            .execute(
                "INSERT INTO opd_records (patient_name, case_id, appointment_date, \
                 appointment_time, consultant, reference, present_complaints, \
                 ayurvedic_assessment, examination, clinical_assessment, family_history, \
                 medicines, treatment_plan, panchkarma, patient_age, patient_gender, \
                 patient_phone, patient_email, blood_group, marital_status, patient_address, \
                 documents, created_at, updated_at) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, \
                 CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)",
                &[
                    json!(request.patient_name),
                    json!(request.case_id),
                    json!(request.appointment_date),
                    json!(request.appointment_time),
                    json!(request.consultant),
                    json!(request.reference),
                    encode_opt(&request.present_complaints),
                    encode_opt(&request.ayurvedic_assessment),
                    encode_opt(&request.examination),
                    encode_opt(&request.clinical_assessment),
                    encode_opt(&request.family_history),
                    encode_opt(&request.medicines),
                    json!(request.treatment_plan),
                    encode_opt(&request.panchkarmas),
                    json!(request.patient_age),
                    json!(request.patient_gender),
                    json!(request.patient_phone),
                    json!(request.patient_email),
                    json!(request.blood_group),
                    json!(request.marital_status),
                    json!(request.patient_address),
                    encode_opt(&request.documents),
                ],
            )
            .await
            .map_err(AppError::upstream)?;

        debug!("OPD record created for {}", request.patient_name);
        self.get(meta.last_row_id.unwrap_or_default()).await
    }

    pub async fn update(&self, id: i64, request: UpdateOpdRecordRequest) -> Result<Value, AppError> {
        self.get(id).await?;

        let mut builder = UpdateBuilder::new("opd_records");
        builder
            .set_opt("patient_name", request.patient_name)
            .set_opt("case_id", request.case_id)
            .set_opt("appointment_date", request.appointment_date)
            .set_opt("appointment_time", request.appointment_time)
            .set_opt("consultant", request.consultant)
            .set_opt("reference", request.reference)
            .set_opt(
                "present_complaints",
                request.present_complaints.as_ref().map(encode_column),
            )
            .set_opt(
                "ayurvedic_assessment",
                request.ayurvedic_assessment.as_ref().map(encode_column),
            )
            .set_opt("examination", request.examination.as_ref().map(encode_column))
            .set_opt(
                "clinical_assessment",
                request.clinical_assessment.as_ref().map(encode_column),
            )
            .set_opt(
                "family_history",
                request.family_history.as_ref().map(encode_column),
            )
            .set_opt("medicines", request.medicines.as_ref().map(encode_column))
            .set_opt("treatment_plan", request.treatment_plan)
            .set_opt("panchkarma", request.panchkarmas.as_ref().map(encode_column))
            .set_opt("patient_age", request.patient_age)
            .set_opt("patient_gender", request.patient_gender)
            .set_opt("patient_phone", request.patient_phone)
            .set_opt("patient_email", request.patient_email)
            .set_opt("blood_group", request.blood_group)
            .set_opt("marital_status", request.marital_status)
            .set_opt("patient_address", request.patient_address)
            .set_opt("documents", request.documents.as_ref().map(encode_column))
            .set_opt("status", request.status)
            .set_opt("visit_date", request.visit_date);

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
            .execute("DELETE FROM opd_records WHERE id = ?", &[json!(id)])
            .await
            .map_err(AppError::upstream)?;

        if meta.changes == 0 {
            return Err(AppError::NotFound("Patient not found".to_string()));
        }
        debug!("OPD record deleted: {id}");
        Ok(())
    }

    /// Replaces the medicines blob on the visit record.
    pub async fn save_medicines(
        &self,
        id: i64,
        request: SaveMedicinesRequest,
    ) -> Result<u64, AppError> {
        self.get(id).await?;

        let meta = self
            .d1
            .execute(
                "UPDATE opd_records SET medicines = ?, updated_at = CURRENT_TIMESTAMP \
                 WHERE id = ?",
                &[encode_column(&request.medicines), json!(id)],
            )
            .await
            .map_err(AppError::upstream)?;

        debug!("Medicines saved for OPD record {id}");
        Ok(meta.changes)
    }

    pub async fn statistics(&self) -> Result<Value, AppError> {
        let total = self
            .scalar("SELECT COUNT(*) as v FROM opd_records")
            .await?;
        let today = self
            .scalar("SELECT COUNT(*) as v FROM opd_records WHERE DATE(visit_date) = DATE('now')")
            .await?;
        let this_month = self
            .scalar(
                "SELECT COUNT(*) as v FROM opd_records \
                 WHERE strftime('%Y-%m', visit_date) = strftime('%Y-%m', 'now')",
            )
            .await?;

        let by_status = self
            .d1
            .query(
                "SELECT status, COUNT(*) as count FROM opd_records GROUP BY status",
                &[],
            )
            .await
            .map_err(AppError::upstream)?;
        let recent = self
            .d1
            .query(
                "SELECT id, patient_name, visit_date, status FROM opd_records \
                 ORDER BY visit_date DESC, created_at DESC LIMIT 5",
                &[],
            )
            .await
            .map_err(AppError::upstream)?;

        Ok(json!({
            "total": total,
            "today": today,
            "thisMonth": this_month,
            "byStatus": by_status,
            "recent": recent
        }))
    }

    async fn scalar(&self, sql: &str) -> Result<u64, AppError> {
        let row = self
            .d1
            .query_one(sql, &[])
            .await
            .map_err(AppError::upstream)?;
        Ok(row.and_then(|r| r["v"].as_u64()).unwrap_or(0))
    }
}

fn encode_opt(value: &Option<Value>) -> Value {
    match value {
        Some(value) => encode_column(value),
        None => Value::Null,
    }
}
