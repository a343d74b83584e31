pub mod api;
pub mod inventory;
