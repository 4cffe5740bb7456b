use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBillRequest {
    pub invoice_id: Option<String>,
    pub patient_name: String,
    pub patient_id: Option<String>,
    pub date: Option<String>,
    pub services: Option<Value>,
    pub amount: f64,
    pub paid: Option<f64>,
    pub status: Option<String>,
    pub payment_method: Option<String>,
    pub phone: Option<String>,
    pub due_date: Option<String>,
}

/// Partial update: absent fields are left untouched, never nulled.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBillRequest {
    pub patient_name: Option<String>,
    pub patient_id: Option<String>,
    pub date: Option<String>,
    pub services: Option<Value>,
    pub amount: Option<f64>,
    pub paid: Option<f64>,
    pub status: Option<String>,
    pub payment_method: Option<String>,
    pub phone: Option<String>,
    pub due_date: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BillListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub status: Option<String>,
    pub search: Option<String>,
}
