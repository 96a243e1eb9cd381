//! Operator endpoints under `/api/admin`.
//!
//! Both routes require an admin session; the purge also needs a CSRF token.

pub mod handlers;

use axum::routing::{get, post};
use axum::Router;

use crate::api::guard_for;
use crate::http::middleware::guarded;
use crate::http::server::AppState;
use crate::pipeline::Action;

use self::handlers::{purge_cache, status};

pub fn router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/api/admin/status",
            guarded(get(status), guard_for(state, Action::Read, true)),
        )
        .route(
            "/api/admin/cache/purge",
            guarded(post(purge_cache), guard_for(state, Action::Write, true)),
        )
}
