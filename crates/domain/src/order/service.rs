//! Order service: the entry point collaborators call with decoded requests.

use std::future::Future;
use std::time::Instant;

use common::{MenuItemId, OrderId};
use order_store::{MenuItem, Order, OrderRepository};

use crate::error::DomainError;

use super::{OrderData, OrderInfo, OrderList, validate_order};

/// Service for managing orders.
///
/// Validates request data, mints identifiers and delegates every write and
/// read to the repository. Failures are returned to the caller as-is; the
/// service never retries.
pub struct OrderService<R: OrderRepository> {
    repository: R,
}

impl<R: OrderRepository> OrderService<R> {
    /// Creates a new order service over the given repository.
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Returns a reference to the underlying repository.
    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Validates and persists a new order, returning its freshly minted ID.
    #[tracing::instrument(skip(self, data), fields(items = data.menu_items.len()))]
    pub async fn add_order(&self, data: &OrderData) -> Result<OrderId, DomainError> {
        if let Some(ref client_id) = data.id {
            tracing::debug!(%client_id, "ignoring client-supplied order id on create");
        }

        let items = prepare_items(data)?;
        let order = Order::new(OrderId::new(), data.cost, items);

        timed("add_order", self.repository.add_order(&order)).await?;

        metrics::counter!("orders_created_total").increment(1);
        tracing::info!(order_id = %order.id, "order created");
        Ok(order.id)
    }

    /// Replaces the item set of an existing order.
    #[tracing::instrument(skip(self, data), fields(items = data.menu_items.len()))]
    pub async fn update_order(&self, id: &str, data: &OrderData) -> Result<(), DomainError> {
        let order_id = OrderId::parse(id)?;
        let items = prepare_items(data)?;
        let order = Order::new(order_id, data.cost, items);

        timed("update_order", self.repository.update_order(&order)).await?;

        metrics::counter!("orders_updated_total").increment(1);
        tracing::info!(%order_id, "order items replaced");
        Ok(())
    }

    /// Deletes an order.
    #[tracing::instrument(skip(self))]
    pub async fn delete_order(&self, id: &str) -> Result<(), DomainError> {
        let order_id = OrderId::parse(id)?;

        timed("delete_order", self.repository.delete_order(order_id)).await?;

        metrics::counter!("orders_deleted_total").increment(1);
        tracing::info!(%order_id, "order deleted");
        Ok(())
    }

    /// Loads one order with text identifiers.
    #[tracing::instrument(skip(self))]
    pub async fn get_order_info(&self, id: &str) -> Result<OrderInfo, DomainError> {
        let order_id = OrderId::parse(id)?;
        let order = timed("get_order", self.repository.get_order(order_id)).await?;
        Ok(OrderInfo::from(&order))
    }

    /// Loads every order with text identifiers.
    #[tracing::instrument(skip(self))]
    pub async fn get_orders(&self) -> Result<OrderList, DomainError> {
        let orders = timed("get_orders", self.repository.get_orders()).await?;
        Ok(OrderList {
            orders: orders.iter().map(OrderInfo::from).collect(),
        })
    }
}

/// Validates the request items and converts them to stored form.
fn prepare_items(data: &OrderData) -> Result<Vec<MenuItem>, DomainError> {
    if let Err(e) = validate_order(data) {
        metrics::counter!("order_validation_failures_total").increment(1);
        tracing::warn!(error = %e, "order rejected");
        return Err(e.into());
    }

    let items = data
        .menu_items
        .iter()
        .map(|item| MenuItemId::parse(&item.id).map(|id| MenuItem::new(id, item.quantity)))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(items)
}

async fn timed<T>(operation: &'static str, fut: impl Future<Output = T>) -> T {
    let start = Instant::now();
    let output = fut.await;
    metrics::histogram!("order_repository_duration_seconds", "operation" => operation)
        .record(start.elapsed().as_secs_f64());
    output
}
