//! Per-route pipeline enforcement.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::MethodRouter;

use crate::http::request::CorrelationId;
use crate::pipeline::{Pipeline, RequestContext};

/// Route-level state holding the pipeline to run.
#[derive(Clone)]
pub struct Guard {
    pipeline: Arc<Pipeline>,
}

impl Guard {
    pub fn new(pipeline: Pipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
        }
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }
}

/// Run the guard's pipeline; on success hand the resolved identity to the
/// handler through request extensions, otherwise answer with the envelope.
pub async fn enforce(State(guard): State<Guard>, request: Request, next: Next) -> Response {
    let (mut parts, body) = request.into_parts();

    let correlation_id = match parts.extensions.get::<CorrelationId>() {
        Some(id) => id.clone(),
        None => {
            let id = CorrelationId::resolve(&parts.headers);
            parts.extensions.insert(id.clone());
            id
        }
    };

    let mut ctx = RequestContext::new(
        parts.method.clone(),
        parts.uri.path(),
        parts.headers.clone(),
        correlation_id,
    );

    if let Err(err) = guard.pipeline.run(&mut ctx).await {
        return err.into_response();
    }

    if let Some(identity) = ctx.into_identity() {
        parts.extensions.insert(identity);
    }
    next.run(Request::from_parts(parts, body)).await
}

/// Wrap every handler of `route` with `guard`.
pub fn guarded<S>(route: MethodRouter<S>, guard: Guard) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    route.route_layer(middleware::from_fn_with_state(guard, enforce))
}
