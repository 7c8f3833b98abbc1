//! Request and response shapes exchanged with the transport layer.

use chrono::{DateTime, Utc};
use order_store::{MenuItem, Order};
use serde::{Deserialize, Serialize};

/// One order line as sent by a client: identifier text plus quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItemData {
    pub id: String,
    pub quantity: i32,
}

impl MenuItemData {
    pub fn new(id: impl Into<String>, quantity: i32) -> Self {
        Self {
            id: id.into(),
            quantity,
        }
    }
}

impl From<&MenuItem> for MenuItemData {
    fn from(item: &MenuItem) -> Self {
        Self {
            id: item.id.to_string(),
            quantity: item.quantity,
        }
    }
}

/// Request-shaped order.
///
/// `id` is ignored on create (the service mints one) and taken from the
/// path for update; it is kept so clients may echo back what they read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub menu_items: Vec<MenuItemData>,
    #[serde(default)]
    pub cost: i32,
}

impl OrderData {
    /// Creates request data for the given items with zero cost.
    pub fn with_items(menu_items: Vec<MenuItemData>) -> Self {
        Self {
            id: None,
            menu_items,
            cost: 0,
        }
    }
}

/// A stored order rendered with text identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderInfo {
    pub id: String,
    pub menu_items: Vec<MenuItemData>,
    #[serde(rename = "orderedAtTimestamp", with = "chrono::serde::ts_seconds")]
    pub ordered_at: DateTime<Utc>,
    pub cost: i32,
}

impl From<&Order> for OrderInfo {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.to_string(),
            menu_items: order.items.iter().map(MenuItemData::from).collect(),
            ordered_at: order.created_at,
            cost: order.cost,
        }
    }
}

/// Every stored order, oldest first, wrapped as `{"orders": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderList {
    pub orders: Vec<OrderInfo>,
}
