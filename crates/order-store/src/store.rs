use std::sync::Arc;

use async_trait::async_trait;

use crate::{Order, OrderId, Result};

/// Persistence boundary for order aggregates.
///
/// Every mutating operation is one transaction: all of its statements commit
/// together or the transaction is rolled back before the error is returned.
/// There is no version check between concurrent writers of the same order;
/// they are ordered only by the storage engine's default isolation.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Inserts the header row and one row per item.
    async fn add_order(&self, order: &Order) -> Result<()>;

    /// Replaces the full item set of an existing order.
    ///
    /// Existing item rows are deleted and `order.items` inserted in their
    /// place; an empty list leaves the order without items. Header fields
    /// other than `updated_at` are left as stored.
    ///
    /// Fails with `NotFound` if the order does not exist.
    async fn update_order(&self, order: &Order) -> Result<()>;

    /// Deletes the order header. Item rows go with it through the schema's
    /// cascading foreign key.
    ///
    /// Fails with `NotFound` if the order does not exist.
    async fn delete_order(&self, id: OrderId) -> Result<()>;

    /// Loads one order with its items.
    async fn get_order(&self, id: OrderId) -> Result<Order>;

    /// Loads every order with its items, oldest first.
    async fn get_orders(&self) -> Result<Vec<Order>>;
}

#[async_trait]
impl<T: OrderRepository + ?Sized> OrderRepository for Arc<T> {
    async fn add_order(&self, order: &Order) -> Result<()> {
        (**self).add_order(order).await
    }

    async fn update_order(&self, order: &Order) -> Result<()> {
        (**self).update_order(order).await
    }

    async fn delete_order(&self, id: OrderId) -> Result<()> {
        (**self).delete_order(id).await
    }

    async fn get_order(&self, id: OrderId) -> Result<Order> {
        (**self).get_order(id).await
    }

    async fn get_orders(&self) -> Result<Vec<Order>> {
        (**self).get_orders().await
    }
}
