//! Mixer content API.
//!
//! Every guarded route runs the same pipeline (authenticate, optional admin
//! check, CSRF for state changes) and every response, success or failure,
//! is a JSON envelope carrying the caller's correlation id in its headers.

pub mod admin;
pub mod api;
pub mod auth;
pub mod cache;
pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod pipeline;
pub mod security;
pub mod store;

pub use config::schema::ApiConfig;
pub use error::ApiError;
pub use http::{build_router, AppState, HttpServer};
pub use lifecycle::Shutdown;
