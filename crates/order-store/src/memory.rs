use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::{MenuItem, MenuItemId, Order, OrderId, OrderRepository, OrderStoreError, Result};

#[derive(Debug, Clone)]
struct HeaderRow {
    cost: i32,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
struct ItemRow {
    menu_item_id: MenuItemId,
    quantity: i32,
}

/// Both tables. Item rows are grouped by owning order, so every write
/// touches the rows of exactly one order.
#[derive(Debug, Default)]
struct Tables {
    orders: HashMap<OrderId, HeaderRow>,
    items: HashMap<OrderId, Vec<ItemRow>>,
}

/// One order's rows as they were before a write.
struct Snapshot {
    id: OrderId,
    header: Option<HeaderRow>,
    items: Option<Vec<ItemRow>>,
}

impl Tables {
    fn snapshot(&self, id: OrderId) -> Snapshot {
        Snapshot {
            id,
            header: self.orders.get(&id).cloned(),
            items: self.items.get(&id).cloned(),
        }
    }

    fn restore(&mut self, snapshot: Snapshot) {
        match snapshot.header {
            Some(header) => self.orders.insert(snapshot.id, header),
            None => self.orders.remove(&snapshot.id),
        };
        match snapshot.items {
            Some(items) => self.items.insert(snapshot.id, items),
            None => self.items.remove(&snapshot.id),
        };
    }

    fn insert_header(&mut self, order: &Order) -> Result<()> {
        if self.orders.contains_key(&order.id) {
            return Err(constraint(
                "order_pkey",
                format!("duplicate key value (id)=({})", order.id),
            ));
        }
        self.orders.insert(
            order.id,
            HeaderRow {
                cost: order.cost,
                created_at: order.created_at,
                updated_at: None,
            },
        );
        Ok(())
    }

    fn insert_item(&mut self, order_id: OrderId, item: &MenuItem) -> Result<()> {
        if !self.orders.contains_key(&order_id) {
            return Err(constraint(
                "order_item_order_id_fkey",
                format!("key (order_id)=({order_id}) is not present in table \"order\""),
            ));
        }
        if item.quantity <= 0 {
            return Err(constraint(
                "order_item_quantity_positive",
                format!("quantity {} violates check constraint", item.quantity),
            ));
        }
        self.items.entry(order_id).or_default().push(ItemRow {
            menu_item_id: item.id,
            quantity: item.quantity,
        });
        Ok(())
    }

    fn load(&self, id: OrderId, header: &HeaderRow) -> Order {
        Order {
            id,
            created_at: header.created_at,
            cost: header.cost,
            items: self
                .items
                .get(&id)
                .into_iter()
                .flatten()
                .map(|row| MenuItem::new(row.menu_item_id, row.quantity))
                .collect(),
        }
    }
}

fn constraint(name: &str, message: String) -> OrderStoreError {
    OrderStoreError::Constraint {
        constraint: name.to_string(),
        message,
    }
}

/// In-memory order repository for testing.
///
/// Mirrors the PostgreSQL schema's constraints (primary key, foreign key,
/// positive quantity, cascading delete) and its all-or-nothing writes.
#[derive(Clone, Default)]
pub struct InMemoryOrderRepository {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryOrderRepository {
    /// Creates a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of order header rows.
    pub async fn order_count(&self) -> usize {
        self.tables.read().await.orders.len()
    }

    /// Returns the number of item rows across all orders.
    pub async fn item_row_count(&self) -> usize {
        self.tables.read().await.items.values().map(Vec::len).sum()
    }

    /// Returns when the order's item set was last replaced.
    pub async fn updated_at(&self, id: OrderId) -> Option<DateTime<Utc>> {
        self.tables
            .read()
            .await
            .orders
            .get(&id)
            .and_then(|header| header.updated_at)
    }

    /// Clears both tables.
    pub async fn clear(&self) {
        *self.tables.write().await = Tables::default();
    }

    /// Runs `statements` against the rows of order `id` and puts those rows
    /// back as they were if any statement fails.
    async fn transaction<F>(&self, id: OrderId, statements: F) -> Result<()>
    where
        F: FnOnce(&mut Tables) -> Result<()> + Send,
    {
        let mut tables = self.tables.write().await;
        let snapshot = tables.snapshot(id);
        let outcome = statements(&mut *tables);
        if outcome.is_err() {
            tables.restore(snapshot);
        }
        outcome
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn add_order(&self, order: &Order) -> Result<()> {
        self.transaction(order.id, |tables| {
            tables.insert_header(order)?;
            order
                .items
                .iter()
                .try_for_each(|item| tables.insert_item(order.id, item))
        })
        .await
    }

    async fn update_order(&self, order: &Order) -> Result<()> {
        self.transaction(order.id, |tables| {
            let header = tables
                .orders
                .get_mut(&order.id)
                .ok_or(OrderStoreError::NotFound(order.id))?;
            header.updated_at = Some(Utc::now());

            tables.items.remove(&order.id);
            order
                .items
                .iter()
                .try_for_each(|item| tables.insert_item(order.id, item))
        })
        .await
    }

    async fn delete_order(&self, id: OrderId) -> Result<()> {
        self.transaction(id, |tables| {
            tables
                .orders
                .remove(&id)
                .ok_or(OrderStoreError::NotFound(id))?;
            tables.items.remove(&id);
            Ok(())
        })
        .await
    }

    async fn get_order(&self, id: OrderId) -> Result<Order> {
        let tables = self.tables.read().await;
        let header = tables
            .orders
            .get(&id)
            .ok_or(OrderStoreError::NotFound(id))?;
        Ok(tables.load(id, header))
    }

    async fn get_orders(&self) -> Result<Vec<Order>> {
        let tables = self.tables.read().await;
        let mut orders: Vec<Order> = tables
            .orders
            .iter()
            .map(|(id, header)| tables.load(*id, header))
            .collect();
        orders.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(orders)
    }
}
