pub mod error;
pub mod memory;
pub mod model;
pub mod postgres;
pub mod row;
pub mod store;

pub use common::{IdentifierError, MenuItemId, OrderId};
pub use error::{OrderStoreError, Result};
pub use memory::InMemoryOrderRepository;
pub use model::{MenuItem, Order};
pub use postgres::PostgresOrderRepository;
pub use row::{RowDecodeError, decode_menu_items};
pub use store::OrderRepository;
