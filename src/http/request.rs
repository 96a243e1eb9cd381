//! Request correlation identifiers.
//!
//! # Responsibilities
//! - Resolve a correlation id from inbound headers, or mint a UUID v4
//! - Carry the id through request extensions for the rest of the call
//!
//! # Design Decisions
//! - `x-request-id` wins over `x-correlation-id` when both are present
//! - Inbound values are only trusted if they are short visible ASCII
//! - The id is resolved once per call and never changes afterwards

use std::fmt;
use std::sync::Arc;

use axum::http::{HeaderMap, HeaderValue};
use uuid::Uuid;

pub const X_REQUEST_ID: &str = "x-request-id";
pub const X_CORRELATION_ID: &str = "x-correlation-id";

const MAX_INBOUND_LEN: usize = 128;

/// Correlation identifier for one inbound call.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CorrelationId(Arc<str>);

impl CorrelationId {
    /// Mint a fresh UUID v4 identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string().into())
    }

    /// Prefer an inbound id, falling back to a generated one.
    pub fn resolve(headers: &HeaderMap) -> Self {
        [X_REQUEST_ID, X_CORRELATION_ID]
            .iter()
            .find_map(|name| inbound(headers, name))
            .unwrap_or_else(Self::generate)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn to_header_value(&self) -> HeaderValue {
        // Inbound ids are filtered to visible ASCII and generated ids are UUIDs.
        HeaderValue::from_str(&self.0).unwrap_or_else(|_| HeaderValue::from_static("invalid"))
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Value of the named cookie across every `Cookie` header.
pub fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(axum::http::header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim())
}

fn inbound(headers: &HeaderMap, name: &str) -> Option<CorrelationId> {
    let value = headers.get(name)?.to_str().ok()?.trim();
    let acceptable = !value.is_empty()
        && value.len() <= MAX_INBOUND_LEN
        && value.bytes().all(|b| b.is_ascii_graphic());
    acceptable.then(|| CorrelationId(value.into()))
}
