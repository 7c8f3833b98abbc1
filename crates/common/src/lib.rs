//! Shared types for the order service.
//!
//! Identifiers are 128-bit UUIDs with two representations: the canonical
//! hyphenated text form used at the API boundary and the 16-byte binary form
//! stored in the database.

pub mod id;

pub use id::{IdentifierError, MenuItemId, OrderId};
