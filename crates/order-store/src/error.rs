use thiserror::Error;

use crate::{OrderId, RowDecodeError};

/// Errors that can occur when reading or writing order aggregates.
#[derive(Debug, Error)]
pub enum OrderStoreError {
    /// No order header exists for the identifier.
    #[error("Order not found: {0}")]
    NotFound(OrderId),

    /// A schema constraint rejected a statement; the transaction was rolled back.
    #[error("Constraint {constraint} violated: {message}")]
    Constraint { constraint: String, message: String },

    /// A stored row could not be turned back into an order.
    #[error("Decoding error: {0}")]
    Decoding(#[from] RowDecodeError),

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl OrderStoreError {
    /// Converts a driver error, surfacing named constraint violations separately.
    pub(crate) fn from_database(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = err
            && let Some(constraint) = db_err.constraint()
        {
            return OrderStoreError::Constraint {
                constraint: constraint.to_string(),
                message: db_err.message().to_string(),
            };
        }
        OrderStoreError::Database(err)
    }
}

/// Result type for order store operations.
pub type Result<T> = std::result::Result<T, OrderStoreError>;
