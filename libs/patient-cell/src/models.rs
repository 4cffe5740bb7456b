use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePatientRequest {
    pub patient_id: Option<String>,
    pub name: String,
    pub age: Option<i64>,
    pub gender: Option<String>,
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub date_of_birth: Option<String>,
    pub blood_group: Option<String>,
    pub constitution: Option<String>,
    pub primary_treatment: Option<String>,
    pub patient_type: Option<String>,
    pub status: Option<String>,
    pub last_visit: Option<String>,
    pub emergency_contact: Option<String>,
    pub medical_history: Option<String>,
    pub allergies: Option<String>,
    pub current_medication: Option<String>,
}

/// Partial update: absent fields are left untouched, never nulled.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePatientRequest {
    pub name: Option<String>,
    pub age: Option<i64>,
    pub gender: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub date_of_birth: Option<String>,
    pub blood_group: Option<String>,
    pub constitution: Option<String>,
    pub primary_treatment: Option<String>,
    pub patient_type: Option<String>,
    pub status: Option<String>,
    pub last_visit: Option<String>,
    pub emergency_contact: Option<String>,
    pub medical_history: Option<String>,
    pub allergies: Option<String>,
    pub current_medication: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PatientListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
    pub status: Option<String>,
    pub patient_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImportPatientsRequest {
    pub patients: Vec<CreatePatientRequest>,
}
