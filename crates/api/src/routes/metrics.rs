//! Prometheus metrics endpoint.

use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use metrics_exporter_prometheus::PrometheusHandle;

const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Registers descriptions for the metrics emitted by the service and the API.
pub fn describe() {
    metrics::describe_counter!("orders_created_total", "Orders persisted by the service");
    metrics::describe_counter!("orders_updated_total", "Orders whose items were replaced");
    metrics::describe_counter!("orders_deleted_total", "Orders deleted");
    metrics::describe_counter!(
        "order_validation_failures_total",
        "Order requests rejected before reaching storage"
    );
    metrics::describe_counter!(
        "api_server_errors_total",
        "Requests answered with a 5xx status"
    );
    metrics::describe_histogram!(
        "order_repository_duration_seconds",
        metrics::Unit::Seconds,
        "Latency of repository calls, labelled by operation"
    );
}

/// GET /metrics — returns Prometheus-formatted metrics.
pub async fn get(State(handle): State<PrometheusHandle>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE)],
        handle.render(),
    )
}
