//! Composable request pipeline.
//!
//! A route declares its requirements once; the pipeline runs the matching
//! interceptors in a fixed order before the handler body:
//!
//! ```text
//! RequestContext
//!     → Authenticate   (401 if no session)
//!     → RequireAdmin   (403, admin routes only)
//!     → CsrfCheck      (403 on state-changing calls without a matching token)
//!     → handler
//! ```
//!
//! The first failing interceptor short-circuits; later steps and the handler
//! never run.

pub mod action;
pub mod context;
pub mod interceptor;

use std::sync::Arc;

pub use action::Action;
pub use context::RequestContext;
pub use interceptor::{Authenticate, CsrfCheck, Interceptor, RequireAdmin};

use crate::auth::SessionResolver;
use crate::error::ApiError;
use crate::observability::metrics;
use crate::security::csrf::CsrfGuard;

/// Ordered list of interceptors.
#[derive(Clone, Default)]
pub struct Pipeline {
    interceptors: Vec<Arc<dyn Interceptor>>,
}

impl Pipeline {
    pub fn builder(resolver: Arc<dyn SessionResolver>) -> PipelineBuilder {
        PipelineBuilder {
            resolver,
            admin_only: false,
            csrf: None,
        }
    }

    /// Append an interceptor after the existing ones.
    pub fn push(&mut self, interceptor: Arc<dyn Interceptor>) {
        self.interceptors.push(interceptor);
    }

    pub fn len(&self) -> usize {
        self.interceptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interceptors.is_empty()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.interceptors.iter().map(|i| i.name()).collect()
    }

    /// Run every interceptor in order, stopping at the first rejection.
    pub async fn run(&self, ctx: &mut RequestContext) -> Result<(), ApiError> {
        for interceptor in &self.interceptors {
            if let Err(err) = interceptor.intercept(ctx).await {
                tracing::debug!(
                    correlation_id = %ctx.correlation_id(),
                    interceptor = interceptor.name(),
                    method = %ctx.method(),
                    path = %ctx.path(),
                    error = %err,
                    "Request rejected"
                );
                metrics::record_guard_rejection(interceptor.name());
                return Err(err);
            }
        }
        Ok(())
    }
}

/// Builds a pipeline in the canonical order regardless of call order.
pub struct PipelineBuilder {
    resolver: Arc<dyn SessionResolver>,
    admin_only: bool,
    csrf: Option<(CsrfGuard, Action)>,
}

impl PipelineBuilder {
    /// Require the admin role after authentication.
    pub fn admin_only(mut self) -> Self {
        self.admin_only = true;
        self
    }

    /// Classify the route for CSRF enforcement.
    pub fn action(mut self, guard: CsrfGuard, action: Action) -> Self {
        self.csrf = Some((guard, action));
        self
    }

    pub fn build(self) -> Pipeline {
        let mut pipeline = Pipeline::default();
        pipeline.push(Arc::new(Authenticate::new(self.resolver)));
        if self.admin_only {
            pipeline.push(Arc::new(RequireAdmin));
        }
        if let Some((guard, action)) = self.csrf {
            pipeline.push(Arc::new(CsrfCheck::new(guard, action)));
        }
        pipeline
    }
}
