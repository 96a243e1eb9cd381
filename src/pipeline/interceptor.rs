//! Capability-checking steps of the request pipeline.

use std::sync::Arc;

use async_trait::async_trait;

use crate::auth::SessionResolver;
use crate::error::ApiError;
use crate::pipeline::{Action, RequestContext};
use crate::security::csrf::{requires_csrf, CsrfGuard};

/// One step of the pipeline.
///
/// `Ok(())` proceeds with the (possibly augmented) context; `Err`
/// short-circuits the call with the matching envelope.
#[async_trait]
pub trait Interceptor: Send + Sync {
    /// Label used in logs and metrics.
    fn name(&self) -> &'static str;

    async fn intercept(&self, ctx: &mut RequestContext) -> Result<(), ApiError>;
}

/// Resolves the caller's session, rejecting anonymous calls with 401.
pub struct Authenticate {
    resolver: Arc<dyn SessionResolver>,
}

impl Authenticate {
    pub fn new(resolver: Arc<dyn SessionResolver>) -> Self {
        Self { resolver }
    }
}

#[async_trait]
impl Interceptor for Authenticate {
    fn name(&self) -> &'static str {
        "authenticate"
    }

    async fn intercept(&self, ctx: &mut RequestContext) -> Result<(), ApiError> {
        let identity = self
            .resolver
            .resolve(ctx.headers())
            .await?
            .ok_or(ApiError::Unauthenticated)?;

        tracing::debug!(user_id = %identity.id, role = ?identity.role, "Caller authenticated");
        ctx.set_identity(identity);
        Ok(())
    }
}

/// Rejects callers without the admin role. Must follow `Authenticate`.
pub struct RequireAdmin;

#[async_trait]
impl Interceptor for RequireAdmin {
    fn name(&self) -> &'static str {
        "require_admin"
    }

    async fn intercept(&self, ctx: &mut RequestContext) -> Result<(), ApiError> {
        match ctx.identity() {
            Some(identity) if identity.is_admin() => Ok(()),
            Some(_) => Err(ApiError::forbidden("Admin access required")),
            None => Err(ApiError::Unauthenticated),
        }
    }
}

/// Double-submit CSRF check, applied only when the verb or the route's
/// action changes state.
pub struct CsrfCheck {
    guard: CsrfGuard,
    action: Action,
}

impl CsrfCheck {
    pub fn new(guard: CsrfGuard, action: Action) -> Self {
        Self { guard, action }
    }
}

#[async_trait]
impl Interceptor for CsrfCheck {
    fn name(&self) -> &'static str {
        "csrf"
    }

    async fn intercept(&self, ctx: &mut RequestContext) -> Result<(), ApiError> {
        if !requires_csrf(ctx.method(), self.action) {
            return Ok(());
        }
        self.guard.require_valid(ctx.headers())?;
        ctx.mark_csrf_validated();
        Ok(())
    }
}
