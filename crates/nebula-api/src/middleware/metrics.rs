//! # Request Metrics
//!
//! Counts requests and error responses through the `metrics` facade. The
//! binary installs a Prometheus recorder and serves it at `/metrics`;
//! without a recorder the counters are no-ops.

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::state::AppState;

/// Middleware that increments request and error counters.
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let method = request.method().as_str().to_owned();
    let response = next.run(request).await;
    let status = response.status();

    metrics::counter!("nebula_http_requests_total", "method" => method).increment(1);
    if status.is_client_error() || status.is_server_error() {
        metrics::counter!("nebula_http_errors_total", "status" => status.as_u16().to_string())
            .increment(1);
    }
    response
}

/// GET /metrics — Prometheus text exposition.
pub async fn render_metrics(State(state): State<AppState>) -> Response {
    match &state.metrics {
        Some(handle) => handle.render().into_response(),
        None => (StatusCode::NOT_FOUND, "metrics recorder not installed").into_response(),
    }
}
