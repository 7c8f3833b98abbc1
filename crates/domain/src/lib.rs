//! Domain layer for the order service.
//!
//! This crate provides:
//! - request and response shapes exchanged with the transport layer
//! - pure validators for the order item invariants
//! - `OrderService`, the single entry point that validates, mints identifiers
//!   and delegates persistence to an `OrderRepository`

pub mod error;
pub mod order;

pub use error::DomainError;
pub use order::{
    MenuItemData, OrderData, OrderInfo, OrderList, OrderService, ValidationError,
    check_item_quantities, check_no_duplicate_items, validate_order,
};
