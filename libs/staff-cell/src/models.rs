use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateStaffRequest {
    pub employee_id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub position: Option<String>,
    pub department: Option<String>,
    pub join_date: Option<String>,
    pub salary: Option<f64>,
    pub status: Option<String>,
    pub address: Option<String>,
    pub experience: Option<String>,
    pub qualification: Option<String>,
    pub emergency_contact: Option<String>,
    pub blood_group: Option<String>,
    pub working_hours: Option<String>,
}

/// Partial update: absent fields are left untouched, never nulled.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateStaffRequest {
    pub employee_id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub position: Option<String>,
    pub department: Option<String>,
    pub join_date: Option<String>,
    pub salary: Option<f64>,
    pub status: Option<String>,
    pub address: Option<String>,
    pub experience: Option<String>,
    pub qualification: Option<String>,
    pub emergency_contact: Option<String>,
    pub blood_group: Option<String>,
    pub working_hours: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StaffListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub department: Option<String>,
    pub status: Option<String>,
    pub search: Option<String>,
}
