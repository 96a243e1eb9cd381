use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::api::JsonBody;
use crate::auth::Authenticated;
use crate::error::ApiError;
use crate::http::response::{ok, ApiResponse};
use crate::http::server::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemStatus {
    pub version: &'static str,
    pub uptime_secs: u64,
    pub cache_entries: usize,
    pub sessions: usize,
}

#[derive(Debug, Deserialize)]
pub struct PurgeRequest {
    #[serde(default)]
    pub prefix: String,
}

#[derive(Debug, Serialize)]
pub struct PurgeResult {
    pub prefix: String,
    pub removed: usize,
}

pub async fn status(State(state): State<AppState>) -> ApiResponse<SystemStatus> {
    ok(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        uptime_secs: state.uptime().as_secs(),
        cache_entries: state.cache().len(),
        sessions: state.sessions().len(),
    })
}

/// Drop every cache entry under a key prefix.
pub async fn purge_cache(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    JsonBody(request): JsonBody<PurgeRequest>,
) -> Result<ApiResponse<PurgeResult>, ApiError> {
    let prefix = request.prefix.trim();
    if prefix.is_empty() {
        return Err(ApiError::validation("prefix must not be empty", None));
    }

    let removed = state.cache().delete_by_prefix(prefix);
    tracing::info!(prefix, removed, user_id = %caller.id, "Cache purged");
    Ok(ok(PurgeResult {
        prefix: prefix.to_string(),
        removed,
    }))
}
