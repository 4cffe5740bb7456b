use serde::Deserialize;
use serde_json::Value;

/// Shared shape for medicine bills and draft bills. `final_total` is derived
/// server-side from `total` and `discount`; a client-sent value is ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicineBillRequest {
    pub patient_id: String,
    pub patient_name: String,
    pub patient_age: Option<i64>,
    pub patient_gender: Option<String>,
    pub case_id: Option<String>,
    pub doctor_id: Option<i64>,
    pub doctor_name: Option<String>,
    pub medicines: Vec<Value>,
    pub total: Option<f64>,
    pub discount: Option<f64>,
    pub reminder_date: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateMedicineRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub dose: Option<Value>,
    pub batch: Option<String>,
    pub mfd: Option<String>,
    pub exp: Option<String>,
    #[serde(rename = "unitPrice")]
    pub unit_price: Option<f64>,
    #[serde(rename = "costPrice")]
    pub cost_price: Option<f64>,
    pub stock: Option<i64>,
    #[serde(rename = "minStock")]
    pub min_stock: Option<i64>,
    #[serde(rename = "maxStock")]
    pub max_stock: Option<i64>,
    pub status: Option<String>,
    pub supplier: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub properties: Option<Value>,
}
