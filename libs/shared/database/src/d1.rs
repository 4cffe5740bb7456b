use anyhow::{anyhow, Result};
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client,
};
use serde_json::{json, Value};
use tracing::{debug, error};

use shared_config::AppConfig;

/// One parameterized SQL statement, positional `?` placeholders bound in order.
#[derive(Debug, Clone)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<Value>,
}

impl Statement {
    pub fn new(sql: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }
}

/// Normalized result of a single statement.
#[derive(Debug, Clone)]
pub struct QueryResult {
    pub rows: Vec<Value>,
    pub meta: Value,
}

/// Write-statement metadata.
#[derive(Debug, Clone, Copy)]
pub struct ExecMeta {
    pub changes: u64,
    pub last_row_id: Option<i64>,
}

/// Thin client for the Cloudflare D1 REST query endpoint. No pooling, no
/// retries, no caching: one HTTP round trip per call, and any non-success
/// response is an error for the caller to map.
pub struct D1Client {
    client: Client,
    endpoint: String,
    auth_token: String,
}

impl D1Client {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            endpoint: config.d1_database_url.clone(),
            auth_token: config.d1_auth_token.clone(),
        }
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", self.auth_token)) {
            headers.insert(AUTHORIZATION, value);
        }
        headers
    }

    async fn send(&self, body: Value) -> Result<Value> {
        debug!("D1 request to {}", self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .headers(self.headers())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let data: Value = response.json().await?;

        if !status.is_success() || data["success"] != json!(true) {
            let message = data["errors"][0]["message"]
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| format!("HTTP {status}"));
            error!("D1 query failed: {}", message);
            return Err(anyhow!("D1 query failed: {message}"));
        }

        Ok(data)
    }

    /// The REST API is inconsistent about shape: `result` may be an array of
    /// result sets or a bare object, and rows may sit under `results` or
    /// `rows`. Collapse all variants into one structure.
    fn normalize(result: &Value) -> QueryResult {
        let result_set = match result {
            Value::Array(sets) => sets.first().cloned().unwrap_or(Value::Null),
            other => other.clone(),
        };

        let rows = result_set
            .get("results")
            .or_else(|| result_set.get("rows"))
            .or_else(|| result.get("rows"))
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        let meta = result_set.get("meta").cloned().unwrap_or_else(|| json!({}));

        QueryResult { rows, meta }
    }

    async fn run(&self, sql: &str, params: &[Value]) -> Result<QueryResult> {
        let data = self.send(json!({ "sql": sql, "params": params })).await?;
        Ok(Self::normalize(&data["result"]))
    }

    /// All rows of a SELECT.
    pub async fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Value>> {
        Ok(self.run(sql, params).await?.rows)
    }

    /// First row of a SELECT, or None.
    pub async fn query_one(&self, sql: &str, params: &[Value]) -> Result<Option<Value>> {
        Ok(self.run(sql, params).await?.rows.into_iter().next())
    }

    /// INSERT/UPDATE/DELETE; returns change count and last inserted rowid.
    pub async fn execute(&self, sql: &str, params: &[Value]) -> Result<ExecMeta> {
        let result = self.run(sql, params).await?;
        Ok(ExecMeta {
            changes: result.meta["changes"].as_u64().unwrap_or(0),
            last_row_id: result.meta["last_row_id"].as_i64(),
        })
    }

    /// Multiple statements in one request. D1 applies the batch atomically,
    /// which gives multi-statement sequences (draft conversion, stock
    /// movement plus ledger insert) an all-or-nothing boundary.
    pub async fn batch(&self, statements: Vec<Statement>) -> Result<Vec<QueryResult>> {
        let body: Vec<Value> = statements
            .iter()
            .map(|s| json!({ "sql": s.sql, "params": s.params }))
            .collect();

        let data = self.send(Value::Array(body)).await?;

        let sets = match &data["result"] {
            Value::Array(sets) => sets.iter().map(Self::normalize_set).collect(),
            other => vec![Self::normalize(other)],
        };
        Ok(sets)
    }

    fn normalize_set(result_set: &Value) -> QueryResult {
        let rows = result_set
            .get("results")
            .or_else(|| result_set.get("rows"))
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        let meta = result_set.get("meta").cloned().unwrap_or_else(|| json!({}));
        QueryResult { rows, meta }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_handles_array_result_with_results_key() {
        let result = json!([{ "results": [{"id": 1}], "meta": {"changes": 1} }]);
        let normalized = D1Client::normalize(&result);
        assert_eq!(normalized.rows, vec![json!({"id": 1})]);
        assert_eq!(normalized.meta["changes"], 1);
    }

    #[test]
    fn normalize_handles_object_result_with_rows_key() {
        let result = json!({ "rows": [{"id": 2}, {"id": 3}] });
        let normalized = D1Client::normalize(&result);
        assert_eq!(normalized.rows.len(), 2);
        assert_eq!(normalized.meta, json!({}));
    }

    #[test]
    fn normalize_handles_missing_rows() {
        let result = json!([{ "meta": { "last_row_id": 7 } }]);
        let normalized = D1Client::normalize(&result);
        assert!(normalized.rows.is_empty());
        assert_eq!(normalized.meta["last_row_id"], 7);
    }

    #[test]
    fn normalize_handles_null_result() {
        let normalized = D1Client::normalize(&Value::Null);
        assert!(normalized.rows.is_empty());
    }
}
