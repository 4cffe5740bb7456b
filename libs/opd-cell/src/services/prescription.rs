use serde_json::{json, Value};
use tracing::debug;

use shared_config::AppConfig;
use shared_database::D1Client;
use shared_models::error::AppError;
use shared_utils::json::{decode_columns, encode_column};

use crate::models::CreatePrescriptionRequest;

const PRESCRIPTION_JSON_COLUMNS: &[&str] =
    &["medicines", "complaints", "ayurvedic_assessment", "examination"];

/// Prescriptions are write-once children of OPD records.
pub struct PrescriptionService {
    d1: D1Client,
}

impl PrescriptionService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            d1: D1Client::new(config),
        }
    }

    pub async fn create(
        &self,
        opd_patient_id: i64,
        request: CreatePrescriptionRequest,
    ) -> Result<Option<i64>, AppError> {
        let meta = self
            .d1
            .execute(
                "INSERT INTO prescriptions (opd_patient_id, prescription_date, doctor_name, \
                 medicines, instructions, notes, follow_up_date, complaints, \
                 ayurvedic_assessment, examination, roga) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                &[
                    json!(opd_patient_id),
                    json!(request.prescription_date),
                    json!(request.doctor_name),
                    encode_opt(&request.medicines),
                    json!(request.instructions),
                    json!(request.notes),
                    json!(request.follow_up_date),
                    encode_opt(&request.complaints),
                    encode_opt(&request.ayurvedic_assessment),
                    encode_opt(&request.examination),
                    json!(request.roga),
                ],
            )
            .await
            .map_err(AppError::upstream)?;

        debug!("Prescription saved for OPD record {opd_patient_id}");
        Ok(meta.last_row_id)
    }

    pub async fn get(&self, id: i64) -> Result<Value, AppError> {
        let row = self
            .d1
            .query_one("SELECT * FROM prescriptions WHERE id = ?", &[json!(id)])
            .await
            .map_err(AppError::upstream)?;

        let mut prescription =
            row.ok_or_else(|| AppError::NotFound("Prescription not found".to_string()))?;
        decode_columns(&mut prescription, PRESCRIPTION_JSON_COLUMNS);
        Ok(prescription)
    }

    pub async fn for_patient(&self, opd_patient_id: i64) -> Result<Vec<Value>, AppError> {
        let mut rows = self
            .d1
            .query(
                "SELECT * FROM prescriptions WHERE opd_patient_id = ? \
                 ORDER BY prescription_date DESC",
                &[json!(opd_patient_id)],
            )
            .await
            .map_err(AppError::upstream)?;

        for row in &mut rows {
            decode_columns(row, PRESCRIPTION_JSON_COLUMNS);
        }
        Ok(rows)
    }
}

fn encode_opt(value: &Option<Value>) -> Value {
    match value {
        Some(value) => encode_column(value),
        None => Value::Null,
    }
}
