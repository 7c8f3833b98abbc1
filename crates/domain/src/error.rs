//! Domain error types.

use common::{IdentifierError, OrderId};
use order_store::OrderStoreError;
use thiserror::Error;

use crate::order::ValidationError;

/// Errors that can occur during order service operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The order violates an item invariant.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// An identifier in the request is not a valid UUID.
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(#[from] IdentifierError),

    /// No order exists for the identifier.
    #[error("Order not found: {0}")]
    OrderNotFound(OrderId),

    /// The order store failed; any transaction has been rolled back.
    #[error("Order store error: {0}")]
    Store(OrderStoreError),
}

impl From<OrderStoreError> for DomainError {
    fn from(e: OrderStoreError) -> Self {
        match e {
            OrderStoreError::NotFound(id) => DomainError::OrderNotFound(id),
            other => DomainError::Store(other),
        }
    }
}

impl DomainError {
    /// Returns true if the error was caused by the request rather than the system.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            DomainError::Validation(_) | DomainError::InvalidIdentifier(_)
        )
    }
}
