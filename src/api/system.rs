//! Liveness and retired endpoints.

use serde::Serialize;

use crate::error::ApiError;
use crate::http::response::{ok, ApiResponse};

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub version: &'static str,
}

pub async fn health() -> ApiResponse<Health> {
    ok(Health {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Endpoints kept only to tell old clients they are gone.
pub async fn retired() -> ApiError {
    ApiError::gone("This endpoint has been retired")
}
