//! Public API routes.
//!
//! Every guarded route states its action once; the guard pipeline does the
//! rest. Unguarded routes are read-only or retired.

pub mod brands;
pub mod extract;
pub mod session;
pub mod system;

use axum::http::StatusCode;
use axum::routing::{any, delete, get, post};
use axum::Router;

use crate::error::ApiError;
use crate::http::middleware::{guarded, Guard};
use crate::http::response::{fail, ApiResponse};
use crate::http::server::AppState;
use crate::pipeline::{Action, Pipeline};
use crate::security::CsrfGuard;

pub use extract::{JsonBody, QueryParams};

/// Guard for an authenticated route with the given action.
pub(crate) fn guard_for(state: &AppState, action: Action, admin_only: bool) -> Guard {
    let csrf = CsrfGuard::from_config(&state.config().security.csrf);
    let mut builder = Pipeline::builder(state.sessions()).action(csrf, action);
    if admin_only {
        builder = builder.admin_only();
    }
    Guard::new(builder.build())
}

pub fn router(state: &AppState) -> Router<AppState> {
    let read = guard_for(state, Action::Read, false);
    let write = guard_for(state, Action::Write, false);
    let admin_delete = guard_for(state, Action::Delete, true);

    Router::new()
        .route("/api/health", get(system::health))
        .route("/api/csrf", get(session::issue_csrf))
        .route("/api/me", guarded(get(session::me), read.clone()))
        .route("/api/brands", guarded(get(brands::list), read.clone()))
        .route("/api/brands", guarded(post(brands::create), write))
        .route("/api/brands/{id}", guarded(get(brands::get_one), read))
        .route("/api/brands/{id}", guarded(delete(brands::remove), admin_delete))
        .route("/api/content-types", any(system::retired))
        .route("/api/content-types/{*rest}", any(system::retired))
}

/// Fallback for unmatched paths.
pub async fn not_found() -> ApiError {
    ApiError::not_found("Not found")
}

pub async fn method_not_allowed() -> ApiResponse {
    fail(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed", None)
}
