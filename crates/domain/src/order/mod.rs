//! Order requests, validation and service.

mod dto;
mod service;
mod validation;

pub use dto::{MenuItemData, OrderData, OrderInfo, OrderList};
pub use service::OrderService;
pub use validation::{
    ValidationError, check_item_quantities, check_no_duplicate_items, validate_order,
};
