//! Pure invariant checks on an order's item list.
//!
//! Checks run in a fixed order (quantities, then duplicates) and the first
//! failure is returned. Nothing here touches storage.

use std::collections::HashSet;

use common::MenuItemId;
use thiserror::Error;

use super::{MenuItemData, OrderData};

/// An order item list that must not be persisted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// An item quantity is zero or negative.
    #[error("Order has item {item_id} with invalid quantity {quantity} (must be greater than 0)")]
    InvalidQuantity { item_id: String, quantity: i32 },

    /// Two items share the same identifier.
    #[error("Order has duplicated item {item_id}")]
    DuplicateItem { item_id: String },
}

/// Runs every item check against the order.
pub fn validate_order(data: &OrderData) -> Result<(), ValidationError> {
    check_item_quantities(&data.menu_items)?;
    check_no_duplicate_items(&data.menu_items)
}

/// Rejects the first item whose quantity is not strictly positive.
pub fn check_item_quantities(items: &[MenuItemData]) -> Result<(), ValidationError> {
    match items.iter().find(|item| item.quantity <= 0) {
        Some(item) => Err(ValidationError::InvalidQuantity {
            item_id: item.id.clone(),
            quantity: item.quantity,
        }),
        None => Ok(()),
    }
}

/// Rejects the first item whose identifier was already seen.
///
/// Identifiers that parse are compared by value, so differently cased
/// spellings of one UUID count as duplicates. Unparsable ones compare as text.
pub fn check_no_duplicate_items(items: &[MenuItemData]) -> Result<(), ValidationError> {
    let mut seen = HashSet::with_capacity(items.len());

    for item in items {
        let key = MenuItemId::parse(&item.id)
            .map(|id| id.to_string())
            .unwrap_or_else(|_| item.id.clone());

        if !seen.insert(key) {
            return Err(ValidationError::DuplicateItem {
                item_id: item.id.clone(),
            });
        }
    }

    Ok(())
}
