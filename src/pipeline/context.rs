//! Per-call request context.

use axum::http::{HeaderMap, Method};

use crate::auth::Identity;
use crate::http::request::CorrelationId;

/// The inbound call plus attributes derived while it passes the pipeline.
///
/// Created once per request and dropped when the call completes.
#[derive(Debug, Clone)]
pub struct RequestContext {
    method: Method,
    path: String,
    headers: HeaderMap,
    correlation_id: CorrelationId,
    identity: Option<Identity>,
    csrf_validated: bool,
}

impl RequestContext {
    pub fn new(method: Method, path: impl Into<String>, headers: HeaderMap, correlation_id: CorrelationId) -> Self {
        Self {
            method,
            path: path.into(),
            headers,
            correlation_id,
            identity: None,
            csrf_validated: false,
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn correlation_id(&self) -> &CorrelationId {
        &self.correlation_id
    }

    /// `None` until the Authenticate interceptor succeeds.
    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn csrf_validated(&self) -> bool {
        self.csrf_validated
    }

    pub(crate) fn set_identity(&mut self, identity: Identity) {
        self.identity = Some(identity);
    }

    /// Returns false if the flag was already set.
    pub(crate) fn mark_csrf_validated(&mut self) -> bool {
        !std::mem::replace(&mut self.csrf_validated, true)
    }

    pub fn into_identity(self) -> Option<Identity> {
        self.identity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csrf_flag_set_once() {
        let mut ctx = RequestContext::new(Method::POST, "/x", HeaderMap::new(), CorrelationId::generate());
        assert!(!ctx.csrf_validated());
        assert!(ctx.mark_csrf_validated());
        assert!(!ctx.mark_csrf_validated());
        assert!(ctx.csrf_validated());
    }
}
