use serde::Deserialize;
use serde_json::Value;

/// Columns stored as JSON text and decoded on every read.
pub const OPD_JSON_COLUMNS: &[&str] = &[
    "present_complaints",
    "ayurvedic_assessment",
    "examination",
    "clinical_assessment",
    "family_history",
    "medicines",
    "panchkarma",
    "documents",
];

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOpdRecordRequest {
    pub patient_name: String,
    pub case_id: Option<String>,
    pub appointment_date: Option<String>,
    pub appointment_time: Option<String>,
    pub consultant: Option<String>,
    pub reference: Option<String>,
    pub present_complaints: Option<Value>,
    pub ayurvedic_assessment: Option<Value>,
    pub examination: Option<Value>,
    pub clinical_assessment: Option<Value>,
    pub family_history: Option<Value>,
    pub medicines: Option<Value>,
    pub treatment_plan: Option<String>,
    pub panchkarmas: Option<Value>,
    pub patient_age: Option<i64>,
    pub patient_gender: Option<String>,
    pub patient_phone: Option<String>,
    pub patient_email: Option<String>,
    pub blood_group: Option<String>,
    pub marital_status: Option<String>,
    pub patient_address: Option<String>,
    pub documents: Option<Value>,
}

/// Partial update: absent fields are left untouched, never nulled.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOpdRecordRequest {
    pub patient_name: Option<String>,
    pub case_id: Option<String>,
    pub appointment_date: Option<String>,
    pub appointment_time: Option<String>,
    pub consultant: Option<String>,
    pub reference: Option<String>,
    pub present_complaints: Option<Value>,
    pub ayurvedic_assessment: Option<Value>,
    pub examination: Option<Value>,
    pub clinical_assessment: Option<Value>,
    pub family_history: Option<Value>,
    pub medicines: Option<Value>,
    pub treatment_plan: Option<String>,
    pub panchkarmas: Option<Value>,
    pub patient_age: Option<i64>,
    pub patient_gender: Option<String>,
    pub patient_phone: Option<String>,
    pub patient_email: Option<String>,
    pub blood_group: Option<String>,
    pub marital_status: Option<String>,
    pub patient_address: Option<String>,
    pub documents: Option<Value>,
    pub status: Option<String>,
    pub visit_date: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OpdListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
    pub status: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SaveMedicinesRequest {
    pub medicines: Value,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePrescriptionRequest {
    pub opd_patient_id: Option<i64>,
    pub prescription_date: Option<String>,
    pub doctor_name: Option<String>,
    pub medicines: Option<Value>,
    pub instructions: Option<String>,
    pub notes: Option<String>,
    pub follow_up_date: Option<String>,
    pub complaints: Option<Value>,
    pub ayurvedic_assessment: Option<Value>,
    pub examination: Option<Value>,
    pub roga: Option<String>,
}
