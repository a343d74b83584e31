mod command;
mod query;
pub mod statements;

pub use self::command::{InventoryCommandRepository, PgInventoryConnection, PgInventoryTransaction};
pub use self::query::InventoryQueryRepository;
