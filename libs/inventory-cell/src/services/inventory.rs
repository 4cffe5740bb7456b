use serde_json::{json, Value};
use tracing::debug;

use shared_config::AppConfig;
use shared_database::{D1Client, Statement};
use shared_models::error::AppError;
use shared_models::response::Pagination;
use shared_utils::sql::{UpdateBuilder, WhereBuilder};

use crate::models::{CreateItemRequest, ItemListQuery, StockMovementRequest, UpdateItemRequest};

pub struct InventoryService {
    d1: D1Client,
}

impl InventoryService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            d1: D1Client::new(config),
        }
    }

    pub async fn list(&self, query: ItemListQuery) -> Result<(Vec<Value>, Pagination), AppError> {
        let page = query.page.unwrap_or(1).max(1);
        let limit = query.limit.unwrap_or(10).max(1);
        let offset = (page - 1) * limit;

        let mut filter = WhereBuilder::new();
        filter
            .eq_opt("category", query.category)
            .eq_opt("status", query.status)
            .search_opt(&["name", "item_code"], query.search.as_deref());

        let count_row = self
            .d1
            .query_one(
                &format!(
                    "SELECT COUNT(*) as total FROM inventory {}",
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
        let rows = self
            .d1
            .query(
                &format!(
                    "SELECT * FROM inventory {} ORDER BY name ASC LIMIT ? OFFSET ?",
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
            .query_one("SELECT * FROM inventory WHERE id = ?", &[json!(id)])
            .await
            .map_err(AppError::upstream)?;

        row.ok_or_else(|| AppError::NotFound("Inventory item not found".to_string()))
    }

    pub async fn create(&self, request: CreateItemRequest) -> Result<Value, AppError> {
        if request.item_code.is_empty() || request.name.is_empty() {
            return Err(AppError::Validation(
                "Required fields: item_code, name".to_string(),
            ));
        }
        if request.current_stock < 0 || request.unit_price < 0.0 {
            return Err(AppError::Validation(
                "Stock and price must not be negative".to_string(),
            ));
        }

        // Derived, never taken from the client.
        let total_value = request.current_stock as f64 * request.unit_price;

        let meta = self
            .d1
            .execute(
                "INSERT INTO inventory (item_code, name, category, subcategory, description, \
                 unit, current_stock, min_stock, max_stock, unit_price, total_value, supplier, \
                 batch_number, manufacturing_date, expiry_date, location, status, \
                 created_at, updated_at) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, \
                 CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)",
                &[
                    json!(request.item_code),
                    json!(request.name),
                    json!(request.category),
                    json!(request.subcategory),
                    json!(request.description),
                    json!(request.unit),
                    json!(request.current_stock),
                    json!(request.min_stock),
                    json!(request.max_stock),
                    json!(request.unit_price),
                    json!(total_value),
                    json!(request.supplier),
                    json!(request.batch_number),
                    json!(request.manufacturing_date),
                    json!(request.expiry_date),
                    json!(request.location),
                    json!(request.status.as_deref().unwrap_or("in stock")),
                ],
            )
            .await
            .map_err(AppError::upstream)?;

        debug!("Inventory item added: {}", request.item_code);
        self.get(meta.last_row_id.unwrap_or_default()).await
    }

    pub async fn update(&self, id: i64, request: UpdateItemRequest) -> Result<Value, AppError> {
        let existing = self.get(id).await?;

        // When only one component changes, the other comes from the stored
        // row so the recomputed value stays consistent.
        let derived = match (request.current_stock, request.unit_price) {
            (None, None) => None,
            (stock, price) => {
                let stock = stock
                    .or_else(|| existing["current_stock"].as_i64())
                    .unwrap_or(0);
                let price = price
                    .or_else(|| existing["unit_price"].as_f64())
                    .unwrap_or(0.0);
                Some(stock as f64 * price)
            }
        };

        let mut builder = UpdateBuilder::new("inventory");
        builder
            .set_opt("item_code", request.item_code)
            .set_opt("name", request.name)
            .set_opt("category", request.category)
            .set_opt("subcategory", request.subcategory)
            .set_opt("description", request.description)
            .set_opt("unit", request.unit)
            .set_opt("current_stock", request.current_stock)
            .set_opt("min_stock", request.min_stock)
            .set_opt("max_stock", request.max_stock)
            .set_opt("unit_price", request.unit_price)
            .set_opt("total_value", derived)
            .set_opt("supplier", request.supplier)
            .set_opt("batch_number", request.batch_number)
            .set_opt("manufacturing_date", request.manufacturing_date)
            .set_opt("expiry_date", request.expiry_date)
            .set_opt("location", request.location)
            .set_opt("status", request.status);

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
            .execute("DELETE FROM inventory WHERE id = ?", &[json!(id)])
            .await
            .map_err(AppError::upstream)?;

        if meta.changes == 0 {
            return Err(AppError::NotFound("Inventory item not found".to_string()));
        }
        debug!("Inventory item deleted: {id}");
        Ok(())
    }

    pub async fn low_stock(&self) -> Result<Vec<Value>, AppError> {
        self.d1
            .query(
                "SELECT * FROM inventory WHERE current_stock <= min_stock \
                 ORDER BY current_stock ASC",
                &[],
            )
            .await
            .map_err(AppError::upstream)
    }

    pub async fn statistics(&self) -> Result<Value, AppError> {
        let total_items = self
            .scalar("SELECT COUNT(*) as v FROM inventory")
            .await?
            .unwrap_or(json!(0));
        let total_value = self
            .scalar("SELECT SUM(total_value) as v FROM inventory")
            .await?
            .unwrap_or(json!(0));
        let low_stock = self
            .scalar("SELECT COUNT(*) as v FROM inventory WHERE current_stock <= min_stock")
            .await?
            .unwrap_or(json!(0));
        let out_of_stock = self
            .scalar("SELECT COUNT(*) as v FROM inventory WHERE current_stock = 0")
            .await?
            .unwrap_or(json!(0));

        let categories = self
            .d1
            .query(
                "SELECT category, COUNT(*) as count, SUM(total_value) as value \
                 FROM inventory GROUP BY category",
                &[],
            )
            .await
            .map_err(AppError::upstream)?;

        Ok(json!({
            "total_items": total_items,
            "total_value": total_value,
            "low_stock_count": low_stock,
            "out_of_stock_count": out_of_stock,
            "categories": categories
        }))
    }

    /// Applies a stock movement and writes the ledger row in one atomic
    /// batch, so the item row and the ledger can never disagree.
    pub async fn record_movement(
        &self,
        id: i64,
        request: StockMovementRequest,
    ) -> Result<Value, AppError> {
        if request.quantity <= 0 {
            return Err(AppError::Validation(
                "Quantity must be greater than zero".to_string(),
            ));
        }

        let item = self.get(id).await?;
        let current = item["current_stock"].as_i64().unwrap_or(0);
        let unit_price = item["unit_price"].as_f64().unwrap_or(0.0);

        let new_stock = match request.movement_type.as_str() {
            "in" => current + request.quantity,
            // Outbound clamps at zero rather than going negative.
            "out" => (current - request.quantity).max(0),
            _ => {
                return Err(AppError::Validation(
                    "Invalid movement type. Must be 'in' or 'out'".to_string(),
                ))
            }
        };
        let new_value = new_stock as f64 * unit_price;

        self.d1
            .batch(vec![
                Statement::new(
                    "UPDATE inventory SET current_stock = ?, total_value = ?, \
                     updated_at = CURRENT_TIMESTAMP WHERE id = ?",
                    vec![json!(new_stock), json!(new_value), json!(id)],
                ),
                Statement::new(
                    "INSERT INTO stock_movements (item_id, item_name, movement_type, quantity, \
                     previous_stock, new_stock, reason, reference, created_at) \
                     VALUES (?, ?, ?, ?, ?, ?, ?, ?, CURRENT_TIMESTAMP)",
                    vec![
                        json!(id),
                        item["name"].clone(),
                        json!(request.movement_type),
                        json!(request.quantity),
                        json!(current),
                        json!(new_stock),
                        json!(request.reason),
                        json!(request.reference),
                    ],
                ),
            ])
            .await
            .map_err(AppError::upstream)?;

        debug!(
            "Stock movement for item {id}: {} {} ({current} -> {new_stock})",
            request.movement_type, request.quantity
        );
        Ok(json!({ "new_stock": new_stock, "total_value": new_value }))
    }

    async fn scalar(&self, sql: &str) -> Result<Option<Value>, AppError> {
        let row = self
            .d1
            .query_one(sql, &[])
            .await
            .map_err(AppError::upstream)?;
        Ok(row.and_then(|r| r.get("v").cloned()).filter(|v| !v.is_null()))
    }
}
