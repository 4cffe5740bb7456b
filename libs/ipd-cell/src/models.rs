use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateIpdRecordRequest {
    pub patient_name: String,
    pub age: Option<i64>,
    pub gender: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub diagnosis: Option<String>,
    pub doctor_name: Option<String>,
    pub admission_date: Option<String>,
    pub room_number: Option<String>,
    pub bed_number: Option<String>,
    pub daily_charges: Option<f64>,
    pub status: Option<String>,
}

/// Partial update: absent fields are left untouched, never nulled.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateIpdRecordRequest {
    pub patient_name: Option<String>,
    pub age: Option<i64>,
    pub gender: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub diagnosis: Option<String>,
    pub doctor_name: Option<String>,
    pub admission_date: Option<String>,
    pub room_number: Option<String>,
    pub bed_number: Option<String>,
    pub daily_charges: Option<f64>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IpdListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub status: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DischargeRequest {
    pub discharge_date: Option<String>,
    pub discharge_summary: Option<String>,
    pub final_charges: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddMedicineRequest {
    pub medicine: Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddProgressNoteRequest {
    pub note: Value,
}
