use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{MenuItemId, OrderId};

/// One order line. Has no identity outside its order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: MenuItemId,
    pub quantity: i32,
}

impl MenuItem {
    pub fn new(id: MenuItemId, quantity: i32) -> Self {
        Self { id, quantity }
    }
}

/// The order aggregate as persisted: header fields plus owned lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub created_at: DateTime<Utc>,
    /// Stored as given; never derived from the items.
    pub cost: i32,
    pub items: Vec<MenuItem>,
}

impl Order {
    /// Creates an order stamped with the current time.
    pub fn new(id: OrderId, cost: i32, items: Vec<MenuItem>) -> Self {
        Self {
            id,
            created_at: Utc::now(),
            cost,
            items,
        }
    }
}
