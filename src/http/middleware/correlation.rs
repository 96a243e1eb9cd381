//! Correlation id propagation.

use std::time::Instant;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use tracing::Instrument;

use crate::error::ErrorReport;
use crate::http::request::{CorrelationId, X_CORRELATION_ID};
use crate::observability::metrics;

/// Resolve the call's correlation id, run the rest of the stack inside a
/// span carrying it, and stamp it on the response.
///
/// Failures are logged with the id and passed through unchanged.
pub async fn correlation_middleware(mut request: Request, next: Next) -> Response {
    let start = Instant::now();
    let correlation_id = CorrelationId::resolve(request.headers());
    request.extensions_mut().insert(correlation_id.clone());

    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let span = tracing::info_span!(
        "request",
        correlation_id = %correlation_id,
        method = %method,
        path = %path,
    );

    let mut response = next.run(request).instrument(span).await;
    let status = response.status();

    if let Some(report) = response.extensions().get::<ErrorReport>() {
        if status.is_server_error() {
            tracing::error!(
                correlation_id = %correlation_id,
                method = %method,
                path = %path,
                status = status.as_u16(),
                error = %report.message,
                "Request failed"
            );
        } else {
            tracing::warn!(
                correlation_id = %correlation_id,
                method = %method,
                path = %path,
                status = status.as_u16(),
                error = %report.message,
                "Request refused"
            );
        }
    }

    response
        .headers_mut()
        .insert(X_CORRELATION_ID, correlation_id.to_header_value());
    metrics::record_request(method.as_str(), status.as_u16(), start);
    response
}
