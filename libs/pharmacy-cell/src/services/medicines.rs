use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::RwLock;
use tracing::debug;

use shared_config::{AppConfig, MedicineStore};
use shared_database::D1Client;
use shared_models::error::AppError;

/// Catalog storage behind a seam, injected per configuration instead of
/// living in shared module state. The store-backed implementation keeps each
/// medicine as a JSON document in one column; the in-memory implementation
/// backs tests and single-node deployments without a catalog table.
#[async_trait]
pub trait MedicineRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Value>, AppError>;
    async fn get(&self, id: i64) -> Result<Value, AppError>;
    async fn create(&self, medicine: Value) -> Result<Value, AppError>;
    async fn update(&self, id: i64, patch: Value) -> Result<Value, AppError>;
    async fn delete(&self, id: i64) -> Result<(), AppError>;
}

#[derive(Clone)]
pub struct MedicineState {
    pub config: Arc<AppConfig>,
    pub repo: Arc<dyn MedicineRepository>,
}

pub fn build_medicine_state(config: Arc<AppConfig>) -> MedicineState {
    let repo: Arc<dyn MedicineRepository> = match config.medicine_store {
        MedicineStore::D1 => Arc::new(D1MedicineRepository::new(&config)),
        MedicineStore::Memory => Arc::new(InMemoryMedicineRepository::default()),
    };
    MedicineState { config, repo }
}

pub struct D1MedicineRepository {
    d1: D1Client,
}

impl D1MedicineRepository {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            d1: D1Client::new(config),
        }
    }

    fn decode(row: &Value) -> Value {
        let id = row["id"].as_i64();
        let mut doc = row["doc"]
            .as_str()
            .and_then(|text| serde_json::from_str::<Value>(text).ok())
            .unwrap_or_else(|| json!({}));
        if let (Some(id), Some(object)) = (id, doc.as_object_mut()) {
            object.insert("id".to_string(), json!(id));
        }
        doc
    }
}

#[async_trait]
impl MedicineRepository for D1MedicineRepository {
    async fn list(&self) -> Result<Vec<Value>, AppError> {
        let rows = self
            .d1
            .query("SELECT id, doc FROM medicines ORDER BY id ASC", &[])
            .await
            .map_err(AppError::upstream)?;
        Ok(rows.iter().map(Self::decode).collect())
    }

    async fn get(&self, id: i64) -> Result<Value, AppError> {
        let row = self
            .d1
            .query_one("SELECT id, doc FROM medicines WHERE id = ?", &[json!(id)])
            .await
            .map_err(AppError::upstream)?;
        row.map(|r| Self::decode(&r))
            .ok_or_else(|| AppError::NotFound("Medicine not found".to_string()))
    }

    async fn create(&self, medicine: Value) -> Result<Value, AppError> {
        let meta = self
            .d1
            .execute(
                "INSERT INTO medicines (doc, created_at, updated_at) \
                 VALUES (?, CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)",
                &[json!(medicine.to_string())],
            )
            .await
            .map_err(AppError::upstream)?;

        self.get(meta.last_row_id.unwrap_or_default()).await
    }

    async fn update(&self, id: i64, patch: Value) -> Result<Value, AppError> {
        let mut merged = self.get(id).await?;
        merge(&mut merged, &patch);

        self.d1
            .execute(
                "UPDATE medicines SET doc = ?, updated_at = CURRENT_TIMESTAMP WHERE id = ?",
                &[json!(merged.to_string()), json!(id)],
            )
            .await
            .map_err(AppError::upstream)?;

        self.get(id).await
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let meta = self
            .d1
            .execute("DELETE FROM medicines WHERE id = ?", &[json!(id)])
            .await
            .map_err(AppError::upstream)?;
        if meta.changes == 0 {
            return Err(AppError::NotFound("Medicine not found".to_string()));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryMedicineRepository {
    medicines: RwLock<Vec<Value>>,
    next_id: RwLock<i64>,
}

#[async_trait]
impl MedicineRepository for InMemoryMedicineRepository {
    async fn list(&self) -> Result<Vec<Value>, AppError> {
        Ok(self.medicines.read().await.clone())
    }

    async fn get(&self, id: i64) -> Result<Value, AppError> {
        self.medicines
            .read()
            .await
            .iter()
            .find(|m| m["id"].as_i64() == Some(id))
            .cloned()
            .ok_or_else(|| AppError::NotFound("Medicine not found".to_string()))
    }

    async fn create(&self, medicine: Value) -> Result<Value, AppError> {
        let mut next_id = self.next_id.write().await;
        *next_id += 1;

        let mut medicine = medicine;
        if let Some(object) = medicine.as_object_mut() {
            object.insert("id".to_string(), json!(*next_id));
        }
        self.medicines.write().await.push(medicine.clone());
        Ok(medicine)
    }

    async fn update(&self, id: i64, patch: Value) -> Result<Value, AppError> {
        let mut medicines = self.medicines.write().await;
        let medicine = medicines
            .iter_mut()
            .find(|m| m["id"].as_i64() == Some(id))
            .ok_or_else(|| AppError::NotFound("Medicine not found".to_string()))?;
        merge(medicine, &patch);
        Ok(medicine.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let mut medicines = self.medicines.write().await;
        let before = medicines.len();
        medicines.retain(|m| m["id"].as_i64() != Some(id));
        if medicines.len() == before {
            return Err(AppError::NotFound("Medicine not found".to_string()));
        }
        Ok(())
    }
}

/// Shallow merge of patch keys into the stored document. The id never moves.
fn merge(target: &mut Value, patch: &Value) {
    let (Some(target), Some(patch)) = (target.as_object_mut(), patch.as_object()) else {
        return;
    };
    for (key, value) in patch {
        if key == "id" {
            continue;
        }
        target.insert(key.clone(), value.clone());
    }
}

/// Aggregates computed from the full catalog; both repositories share this.
pub async fn catalog_stats(repo: &dyn MedicineRepository) -> Result<Value, AppError> {
    let medicines = repo.list().await?;

    let total = medicines.len();
    let low_stock = medicines
        .iter()
        .filter(|m| {
            matches!(
                m["status"].as_str(),
                Some("Low Stock") | Some("Critical Low")
            )
        })
        .count();
    let expired = medicines
        .iter()
        .filter(|m| m["status"].as_str() == Some("Expired"))
        .count();

    let mut inventory_value = 0.0;
    let mut cost_value = 0.0;
    for medicine in &medicines {
        let stock = medicine["stock"].as_f64().unwrap_or(0.0);
        inventory_value += medicine["unitPrice"].as_f64().unwrap_or(0.0) * stock;
        cost_value += medicine["costPrice"].as_f64().unwrap_or(0.0) * stock;
    }

    debug!("Catalog stats over {total} medicines");
    Ok(json!({
        "totalMedicines": total,
        "lowStockMedicines": low_stock,
        "expiredMedicines": expired,
        "totalInventoryValue": inventory_value,
        "totalCostValue": cost_value,
        "profitMargin": inventory_value - cost_value
    }))
}
