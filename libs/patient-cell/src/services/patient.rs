use chrono::Utc;
use rand::Rng;
use serde_json::{json, Value};
use tracing::debug;

use shared_config::AppConfig;
use shared_database::D1Client;
use shared_models::error::AppError;
use shared_models::response::Pagination;
use shared_utils::sql::{UpdateBuilder, WhereBuilder};

use crate::models::{CreatePatientRequest, PatientListQuery, UpdatePatientRequest};

pub struct PatientService {
    d1: D1Client,
}

impl PatientService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            d1: D1Client::new(config),
        }
    }

    pub async fn list(
        &self,
        query: PatientListQuery,
    ) -> Result<(Vec<Value>, Pagination), AppError> {
        let page = query.page.unwrap_or(1).max(1);
        let limit = query.limit.unwrap_or(10).max(1);
        let offset = (page - 1) * limit;

        let mut filter = WhereBuilder::new();
        filter
            .eq_opt("status", query.status)
            .eq_opt("patient_type", query.patient_type)
            .search_opt(
                &["name", "patient_id", "phone", "email"],
                query.search.as_deref(),
            );

        let count_row = self
            .d1
            .query_one(
                &format!("SELECT COUNT(*) as total FROM patients {}", filter.clause()),
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
                    "SELECT * FROM patients {} ORDER BY created_at DESC LIMIT ? OFFSET ?",
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
            .query_one("SELECT * FROM patients WHERE id = ?", &[json!(id)])
            .await
            .map_err(AppError::upstream)?;

        row.ok_or_else(|| AppError::NotFound("Patient not found".to_string()))
    }

    pub async fn create(&self, request: CreatePatientRequest) -> Result<Value, AppError> {
        validate(&request)?;
        let patient_id = request
            .patient_id
            .clone()
            .filter(|p| !p.is_empty())
            .unwrap_or_else(generate_patient_id);

        let meta = self
            .d1
            .execute(
                "INSERT INTO patients (patient_id, name, age, gender, phone, email, address, \
                 city, state, postal_code, country, date_of_birth, blood_group, constitution, \
                 primary_treatment, patient_type, status, last_visit, emergency_contact, \
                 medical_history, allergies, current_medication, created_at, updated_at) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, \
                 CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)",
                &insert_params(&patient_id, &request),
            )
            .await
            .map_err(AppError::upstream)?;

        debug!("Patient created: {patient_id}");
        self.get(meta.last_row_id.unwrap_or_default()).await
    }

    pub async fn update(&self, id: i64, request: UpdatePatientRequest) -> Result<Value, AppError> {
        self.get(id).await?;

        let mut builder = UpdateBuilder::new("patients");
        builder
            .set_opt("name", request.name)
            .set_opt("age", request.age)
            .set_opt("gender", request.gender)
            .set_opt("phone", request.phone)
            .set_opt("email", request.email)
            .set_opt("address", request.address)
            .set_opt("city", request.city)
            .set_opt("state", request.state)
            .set_opt("postal_code", request.postal_code)
            .set_opt("country", request.country)
            .set_opt("date_of_birth", request.date_of_birth)
            .set_opt("blood_group", request.blood_group)
            .set_opt("constitution", request.constitution)
            .set_opt("primary_treatment", request.primary_treatment)
            .set_opt("patient_type", request.patient_type)
            .set_opt("status", request.status)
            .set_opt("last_visit", request.last_visit)
            .set_opt("emergency_contact", request.emergency_contact)
            .set_opt("medical_history", request.medical_history)
            .set_opt("allergies", request.allergies)
            .set_opt("current_medication", request.current_medication);

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
            .execute("DELETE FROM patients WHERE id = ?", &[json!(id)])
            .await
            .map_err(AppError::upstream)?;

        if meta.changes == 0 {
            return Err(AppError::NotFound("Patient not found".to_string()));
        }
        debug!("Patient deleted: {id}");
        Ok(())
    }

    /// Valid rows insert, invalid rows are collected as `{index, error}`; a bad
    /// row never fails the batch.
    pub async fn import(&self, patients: Vec<CreatePatientRequest>) -> Result<Value, AppError> {
        if patients.is_empty() {
            return Err(AppError::Validation("Invalid patients data".to_string()));
        }

        let mut imported = 0u64;
        let mut errors = Vec::new();
        for (index, request) in patients.into_iter().enumerate() {
            if let Err(err) = validate(&request) {
                errors.push(json!({ "index": index, "error": err.to_string() }));
                continue;
            }
            let patient_id = request
                .patient_id
                .clone()
                .filter(|p| !p.is_empty())
                .unwrap_or_else(generate_patient_id);

            let result = self
                .d1
                .execute(
                    "INSERT INTO patients (patient_id, name, age, gender, phone, email, address, \
                     city, state, postal_code, country, date_of_birth, blood_group, constitution, \
                     primary_treatment, patient_type, status, last_visit, emergency_contact, \
                     medical_history, allergies, current_medication, created_at, updated_at) \
                     VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, \
                     CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)",
                    &insert_params(&patient_id, &request),
                )
                .await;

            match result {
                Ok(_) => imported += 1,
                Err(err) => errors.push(json!({ "index": index, "error": err.to_string() })),
            }
        }

        debug!("Patient import finished: {imported} inserted, {} failed", errors.len());
        Ok(json!({
            "imported": imported,
            "failed": errors.len(),
            "errors": errors
        }))
    }

    pub async fn statistics(&self) -> Result<Value, AppError> {
        let total = self.count(None).await?;
        let active = self.count(Some("active")).await?;
        let admitted = self.count(Some("admitted")).await?;
        let discharged = self.count(Some("discharged")).await?;

        Ok(json!({
            "totalPatients": total,
            "activePatients": active,
            "admittedPatients": admitted,
            "dischargedPatients": discharged
        }))
    }

    async fn count(&self, status: Option<&str>) -> Result<u64, AppError> {
        let row = match status {
            Some(status) => {
                self.d1
                    .query_one(
                        "SELECT COUNT(*) as total FROM patients WHERE status = ?",
                        &[json!(status)],
                    )
                    .await
            }
            None => {
                self.d1
                    .query_one("SELECT COUNT(*) as total FROM patients", &[])
                    .await
            }
        }
        .map_err(AppError::upstream)?;

        Ok(row.and_then(|r| r["total"].as_u64()).unwrap_or(0))
    }
}

fn validate(request: &CreatePatientRequest) -> Result<(), AppError> {
    if request.name.is_empty() || request.phone.is_empty() {
        return Err(AppError::Validation(
            "Required fields: name, phone".to_string(),
        ));
    }
    Ok(())
}

/// `P` + epoch millis + three random digits, matching existing registry keys.
fn generate_patient_id() -> String {
    let suffix = rand::thread_rng().gen_range(0..1000);
    format!("P{}{}", Utc::now().timestamp_millis(), suffix)
}

fn insert_params(patient_id: &str, request: &CreatePatientRequest) -> Vec<Value> {
    vec![
        json!(patient_id),
        json!(request.name),
        json!(request.age),
        json!(request.gender),
        json!(request.phone),
        json!(request.email),
        json!(request.address),
        json!(request.city),
        json!(request.state),
        json!(request.postal_code),
        json!(request.country.as_deref().unwrap_or("India")),
        json!(request.date_of_birth),
        json!(request.blood_group),
        json!(request.constitution),
        json!(request.primary_treatment),
        json!(request.patient_type.as_deref().unwrap_or("OPD")),
        json!(request.status.as_deref().unwrap_or("active")),
        json!(request.last_visit),
        json!(request.emergency_contact),
        json!(request.medical_history),
        json!(request.allergies),
        json!(request.current_medication),
    ]
}
