use axum::{http::StatusCode, Json};
use serde::Serialize;
use serde_json::{json, Value};

/// Pagination block returned alongside every list response.
#[derive(Debug, Clone, Serialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    #[serde(rename = "totalPages")]
    pub total_pages: u64,
}

impl Pagination {
    pub fn new(page: u32, limit: u32, total: u64) -> Self {
        let total_pages = if limit == 0 {
            0
        } else {
            total.div_ceil(limit as u64)
        };
        Self {
            page,
            limit,
            total,
            total_pages,
        }
    }
}

pub fn ok(data: impl Serialize) -> Json<Value> {
    Json(json!({ "success": true, "data": data }))
}

pub fn ok_with_message(data: impl Serialize, message: &str) -> Json<Value> {
    Json(json!({ "success": true, "data": data, "message": message }))
}

pub fn message(message: &str) -> Json<Value> {
    Json(json!({ "success": true, "message": message }))
}

pub fn created(data: impl Serialize, message: &str) -> (StatusCode, Json<Value>) {
    (
        StatusCode::CREATED,
        Json(json!({ "success": true, "data": data, "message": message })),
    )
}

pub fn paginated(data: impl Serialize, pagination: Pagination) -> Json<Value> {
    Json(json!({ "success": true, "data": data, "pagination": pagination }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(Pagination::new(1, 10, 0).total_pages, 0);
        assert_eq!(Pagination::new(1, 10, 1).total_pages, 1);
        assert_eq!(Pagination::new(1, 10, 10).total_pages, 1);
        assert_eq!(Pagination::new(1, 10, 11).total_pages, 2);
        assert_eq!(Pagination::new(3, 25, 101).total_pages, 5);
    }

    #[test]
    fn zero_limit_does_not_divide_by_zero() {
        assert_eq!(Pagination::new(1, 0, 42).total_pages, 0);
    }

    #[test]
    fn envelope_shape() {
        let body = ok(json!([1, 2, 3])).0;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"], json!([1, 2, 3]));
    }
}
