use crate::model::{InventoryItem as InventoryModel, InventoryStats as InventoryStatsModel};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Eq)]
pub struct InventoryResponse {
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

impl From<InventoryModel> for InventoryResponse {
    fn from(value: InventoryModel) -> Self {
        InventoryResponse {
            id: value.id,
            product_name: value.product_name,
            product_id: value.product_id,
            category: value.category,
            location: value.location,
            available_quantity: value.available_quantity,
            reserved_quantity: value.reserved_quantity,
            on_hand_quantity: value.on_hand_quantity,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InventoryStatsResponse {
    pub total_items: i64,
    pub total_available_quantity: i64,
    pub total_reserved_quantity: i64,
    pub total_on_hand_quantity: i64,
    pub categories_count: i64,
    pub locations_count: i64,
    pub low_stock_items: i64,
    pub low_stock_threshold: i32,
}

impl InventoryStatsResponse {
    pub fn from_model(value: InventoryStatsModel, low_stock_threshold: i32) -> Self {
        InventoryStatsResponse {
            total_items: value.total_items,
            total_available_quantity: value.total_available_quantity,
            total_reserved_quantity: value.total_reserved_quantity,
            total_on_hand_quantity: value.total_on_hand_quantity,
            categories_count: value.categories_count,
            locations_count: value.locations_count,
            low_stock_items: value.low_stock_items,
            low_stock_threshold,
        }
    }
}
