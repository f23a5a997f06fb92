use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::metrics::Metrics;

/// Counts every request and classifies the response status
pub async fn track_requests(
    State(metrics): State<Arc<Metrics>>,
    request: Request,
    next: Next,
) -> Response {
    metrics.record_request();

    let response = next.run(request).await;

    let status = response.status();
    if status == StatusCode::UNPROCESSABLE_ENTITY {
        metrics.record_validation_failure();
    } else if status.is_server_error() {
        metrics.record_server_error();
    }

    response
}
