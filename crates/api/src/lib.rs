//! HTTP API server for the order service.
//!
//! Decodes requests, hands them to `OrderService` and maps its results to
//! HTTP responses, with request tracing and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use domain::OrderService;
use metrics_exporter_prometheus::PrometheusHandle;
use order_store::OrderRepository;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::orders::AppState;

/// Prefix for the order endpoints.
pub const API_PREFIX: &str = "/api/v1";

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<R: OrderRepository + 'static>(
    state: Arc<AppState<R>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    let api = Router::new()
        .route("/hello-world", get(routes::health::hello_world))
        .route("/orders", get(routes::orders::list::<R>))
        .route("/order", axum::routing::post(routes::orders::create::<R>))
        .route(
            "/order/{id}",
            get(routes::orders::get::<R>)
                .put(routes::orders::update::<R>)
                .delete(routes::orders::delete::<R>),
        )
        .with_state(state);

    Router::new()
        .route("/health", get(routes::health::check))
        .nest(API_PREFIX, api)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the application state around a repository.
pub fn create_state<R: OrderRepository>(repository: R) -> Arc<AppState<R>> {
    Arc::new(AppState {
        order_service: OrderService::new(repository),
    })
}
