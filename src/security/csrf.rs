//! Double-submit CSRF protection.
//!
//! The server issues a random token in an HTTP-only cookie; same-origin
//! script echoes it in `x-csrf-token`. A state-changing request passes only
//! when both copies are present, non-empty and byte-equal.
//!
//! The token is not bound to the session. A same-site script able to read
//! the cookie defeats the check.

use axum::http::{HeaderMap, HeaderValue, Method};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::RngCore;

use crate::config::CsrfConfig;
use crate::error::ApiError;
use crate::http::request::cookie_value;
use crate::pipeline::Action;

pub const CSRF_COOKIE: &str = "csrf_token";
pub const CSRF_HEADER: &str = "x-csrf-token";

const TOKEN_BYTES: usize = 32;

/// A freshly issued token and the cookie that carries it.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub set_cookie: HeaderValue,
}

/// Issues and validates CSRF tokens.
#[derive(Debug, Clone)]
pub struct CsrfGuard {
    secure_cookie: bool,
}

impl Default for CsrfGuard {
    fn default() -> Self {
        Self { secure_cookie: true }
    }
}

impl CsrfGuard {
    pub fn new(secure_cookie: bool) -> Self {
        Self { secure_cookie }
    }

    pub fn from_config(config: &CsrfConfig) -> Self {
        Self::new(config.secure_cookie)
    }

    /// Generate a token and its `Set-Cookie` value.
    pub fn issue_token(&self) -> Result<IssuedToken, ApiError> {
        let mut bytes = [0u8; TOKEN_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);
        let token = URL_SAFE_NO_PAD.encode(bytes);

        let mut cookie = format!("{CSRF_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax");
        if self.secure_cookie {
            cookie.push_str("; Secure");
        }
        let set_cookie = HeaderValue::from_str(&cookie)
            .map_err(|e| ApiError::internal(format!("invalid csrf cookie: {e}")))?;

        Ok(IssuedToken { token, set_cookie })
    }

    /// Reject unless header and cookie tokens are present and equal.
    pub fn require_valid(&self, headers: &HeaderMap) -> Result<(), ApiError> {
        let header_token = headers
            .get(CSRF_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        let cookie_token = cookie_value(headers, CSRF_COOKIE).unwrap_or_default();

        if header_token.is_empty() || cookie_token.is_empty() {
            return Err(ApiError::CsrfRejected);
        }
        if header_token.as_bytes() != cookie_token.as_bytes() {
            return Err(ApiError::CsrfRejected);
        }
        Ok(())
    }
}

/// Whether a request with this verb and route classification needs CSRF.
pub fn requires_csrf(method: &Method, action: Action) -> bool {
    let read_only_verb = matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS);
    !read_only_verb || action != Action::Read
}
