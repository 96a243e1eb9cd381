//! Uniform JSON response envelopes.
//!
//! # Shape
//! ```text
//! { success, data?, error?, details?, pagination?, timestamp }
//! ```
//!
//! # Design Decisions
//! - `data` and `error` are mutually exclusive and track `success`
//! - `timestamp` is computed per envelope, never cached
//! - Status code travels with the envelope so handlers return one value

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Pagination block for list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u32,
}

impl Pagination {
    /// Build a pagination block; `limit` of zero yields zero pages.
    pub fn new(page: u32, limit: u32, total: u64) -> Self {
        let total_pages = if limit == 0 {
            0
        } else {
            total.div_ceil(limit as u64).min(u32::MAX as u64) as u32
        };
        Self {
            page,
            limit,
            total,
            total_pages,
        }
    }
}

/// JSON body shared by every API response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    pub timestamp: String,
}

/// An envelope paired with its HTTP status.
#[derive(Debug, Clone)]
pub struct ApiResponse<T = Value> {
    status: StatusCode,
    envelope: Envelope<T>,
}

impl<T> ApiResponse<T> {
    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn envelope(&self) -> &Envelope<T> {
        &self.envelope
    }

    pub fn into_envelope(self) -> Envelope<T> {
        self.envelope
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self.envelope)).into_response()
    }
}

fn now_iso8601() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn success<T>(status: StatusCode, data: T, pagination: Option<Pagination>) -> ApiResponse<T> {
    ApiResponse {
        status,
        envelope: Envelope {
            success: true,
            data: Some(data),
            error: None,
            details: None,
            pagination,
            timestamp: now_iso8601(),
        },
    }
}

/// Success envelope, HTTP 200.
pub fn ok<T>(data: T) -> ApiResponse<T> {
    success(StatusCode::OK, data, None)
}

/// Success envelope with pagination, HTTP 200.
pub fn ok_paginated<T>(data: T, pagination: Pagination) -> ApiResponse<T> {
    success(StatusCode::OK, data, Some(pagination))
}

/// Success envelope, HTTP 201.
pub fn created<T>(data: T) -> ApiResponse<T> {
    success(StatusCode::CREATED, data, None)
}

/// Failure envelope with the given status.
pub fn fail(status: StatusCode, error: impl Into<String>, details: Option<Value>) -> ApiResponse<Value> {
    ApiResponse {
        status,
        envelope: Envelope {
            success: false,
            data: None,
            error: Some(error.into()),
            details,
            pagination: None,
            timestamp: now_iso8601(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use serde_json::json;

    #[test]
    fn test_ok_envelope() {
        let res = ok(json!({"id": 1}));
        assert_eq!(res.status(), StatusCode::OK);
        let env = res.envelope();
        assert!(env.success);
        assert_eq!(env.data, Some(json!({"id": 1})));
        assert!(env.error.is_none());
        assert!(DateTime::parse_from_rfc3339(&env.timestamp).is_ok());
    }

    #[test]
    fn test_fail_envelope_omits_data() {
        let res = fail(StatusCode::GONE, "retired", Some(json!({"use": "/api/v2"})));
        assert_eq!(res.status(), StatusCode::GONE);

        let body = serde_json::to_value(res.envelope()).unwrap();
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["error"], json!("retired"));
        assert_eq!(body["details"]["use"], json!("/api/v2"));
        assert!(body.get("data").is_none());
        assert!(body.get("pagination").is_none());
    }

    #[test]
    fn test_pagination_serializes_camel_case() {
        let res = ok_paginated(vec![1, 2], Pagination::new(1, 2, 5));
        let body = serde_json::to_value(res.envelope()).unwrap();
        assert_eq!(body["pagination"]["totalPages"], json!(3));
        assert_eq!(body["pagination"]["total"], json!(5));
    }

    #[test]
    fn test_pagination_zero_limit() {
        assert_eq!(Pagination::new(1, 0, 10).total_pages, 0);
    }

    #[test]
    fn test_timestamp_is_fresh_per_call() {
        let first = ok(1).into_envelope().timestamp;
        std::thread::sleep(std::time::Duration::from_millis(5));
        let second = ok(1).into_envelope().timestamp;
        assert_ne!(first, second);
    }

    #[test]
    fn test_created_status() {
        assert_eq!(created("x").status(), StatusCode::CREATED);
    }
}
