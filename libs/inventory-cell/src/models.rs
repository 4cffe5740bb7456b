use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateItemRequest {
    pub item_code: String,
    pub name: String,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub description: Option<String>,
    pub unit: Option<String>,
    pub current_stock: i64,
    pub min_stock: Option<i64>,
    pub max_stock: Option<i64>,
    pub unit_price: f64,
    pub supplier: Option<String>,
    pub batch_number: Option<String>,
    pub manufacturing_date: Option<String>,
    pub expiry_date: Option<String>,
    pub location: Option<String>,
    pub status: Option<String>,
}

/// Partial update. `total_value` is derived server-side and deliberately
/// absent: client-sent values for it are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateItemRequest {
    pub item_code: Option<String>,
    pub name: Option<String>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub description: Option<String>,
    pub unit: Option<String>,
    pub current_stock: Option<i64>,
    pub min_stock: Option<i64>,
    pub max_stock: Option<i64>,
    pub unit_price: Option<f64>,
    pub supplier: Option<String>,
    pub batch_number: Option<String>,
    pub manufacturing_date: Option<String>,
    pub expiry_date: Option<String>,
    pub location: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub category: Option<String>,
    pub status: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StockMovementRequest {
    pub movement_type: String,
    pub quantity: i64,
    pub reason: Option<String>,
    pub reference: Option<String>,
}
