mod inventory;

pub use self::inventory::{InventoryItem, InventoryStats};
