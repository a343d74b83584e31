use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct InventoryItem {
    pub id: i32,
    pub product_name: String,
    pub product_id: String,
    pub category: String,
    pub location: String,
    pub available_quantity: i32,
    pub reserved_quantity: i32,
    pub on_hand_quantity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Aggregates over the whole table; sums are widened to `BIGINT`.
#[derive(Debug, Clone, Default, PartialEq, Eq, FromRow)]
pub struct InventoryStats {
    pub total_items: i64,
    pub total_available_quantity: i64,
    pub total_reserved_quantity: i64,
    pub total_on_hand_quantity: i64,
    pub categories_count: i64,
    pub locations_count: i64,
    pub low_stock_items: i64,
}
