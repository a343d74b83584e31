mod command;
mod query;

pub use self::command::InventoryCommandService;
pub use self::query::{ITEM_NOT_FOUND, InventoryQueryService};
