//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, layers)
//!     → request.rs (correlation id, cookies)
//!     → middleware/ (correlation, guard pipeline)
//!     → api / admin handlers
//!     → response.rs (JSON envelope)
//!     → Send to client
//! ```

pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use request::{CorrelationId, X_CORRELATION_ID, X_REQUEST_ID};
pub use response::{created, fail, ok, ok_paginated, ApiResponse, Envelope, Pagination};
pub use server::{build_router, AppState, HttpServer};
