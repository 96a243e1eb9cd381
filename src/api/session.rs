//! CSRF token issuance and the caller's own identity.

use axum::extract::State;
use axum::http::{header, HeaderValue};
use serde::Serialize;

use crate::auth::{Authenticated, Identity};
use crate::error::ApiError;
use crate::http::response::{ok, ApiResponse};
use crate::http::server::AppState;
use crate::security::CsrfGuard;

#[derive(Debug, Serialize)]
pub struct CsrfToken {
    pub token: String,
}

/// Issue a fresh token: cookie for the browser, body copy for page script.
pub async fn issue_csrf(
    State(state): State<AppState>,
) -> Result<([(header::HeaderName, HeaderValue); 1], ApiResponse<CsrfToken>), ApiError> {
    let issued = CsrfGuard::from_config(&state.config().security.csrf).issue_token()?;
    Ok((
        [(header::SET_COOKIE, issued.set_cookie)],
        ok(CsrfToken { token: issued.token }),
    ))
}

pub async fn me(Authenticated(caller): Authenticated) -> ApiResponse<Identity> {
    ok(caller)
}
