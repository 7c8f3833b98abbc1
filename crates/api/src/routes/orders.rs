//! Order CRUD endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use domain::{OrderData, OrderInfo, OrderList, OrderService};
use order_store::OrderRepository;
use serde::Serialize;

use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState<R: OrderRepository> {
    pub order_service: OrderService<R>,
}

#[derive(Serialize)]
pub struct OrderCreatedResponse {
    pub id: String,
}

/// POST /api/v1/order — create an order from the submitted items.
#[tracing::instrument(skip(state, payload))]
pub async fn create<R: OrderRepository + 'static>(
    State(state): State<Arc<AppState<R>>>,
    payload: Result<Json<OrderData>, JsonRejection>,
) -> Result<(StatusCode, Json<OrderCreatedResponse>), ApiError> {
    let Json(data) = payload?;
    let id = state.order_service.add_order(&data).await?;

    Ok((
        StatusCode::CREATED,
        Json(OrderCreatedResponse { id: id.to_string() }),
    ))
}

/// GET /api/v1/order/{id} — load one order.
#[tracing::instrument(skip(state))]
pub async fn get<R: OrderRepository + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Path(id): Path<String>,
) -> Result<Json<OrderInfo>, ApiError> {
    let info = state.order_service.get_order_info(&id).await?;
    Ok(Json(info))
}

/// GET /api/v1/orders — list every order.
#[tracing::instrument(skip(state))]
pub async fn list<R: OrderRepository + 'static>(
    State(state): State<Arc<AppState<R>>>,
) -> Result<Json<OrderList>, ApiError> {
    let orders = state.order_service.get_orders().await?;
    Ok(Json(orders))
}

/// PUT /api/v1/order/{id} — replace the order's items.
#[tracing::instrument(skip(state, payload))]
pub async fn update<R: OrderRepository + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Path(id): Path<String>,
    payload: Result<Json<OrderData>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(data) = payload?;
    state.order_service.update_order(&id, &data).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/order/{id} — delete an order.
#[tracing::instrument(skip(state))]
pub async fn delete<R: OrderRepository + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.order_service.delete_order(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
