use crate::domain::{
    requests::inventory::{
        BulkUpdateRequest, CreateInventoryRequest, FindAllInventory, LowStockQuery,
        UpdateInventoryRequest, UpdateQuantitiesRequest,
    },
    response::{
        api::ApiResponse,
        inventory::{InventoryResponse, InventoryStatsResponse},
    },
};
use async_trait::async_trait;
use shared::errors::ServiceError;
use std::sync::Arc;

pub type DynInventoryQueryService = Arc<dyn InventoryQueryServiceTrait + Send + Sync>;
pub type DynInventoryCommandService = Arc<dyn InventoryCommandServiceTrait + Send + Sync>;

#[async_trait]
pub trait InventoryQueryServiceTrait {
    async fn find_all(
        &self,
        req: &FindAllInventory,
    ) -> Result<ApiResponse<Vec<InventoryResponse>>, ServiceError>;
    async fn find_by_id(&self, id: i32) -> Result<ApiResponse<InventoryResponse>, ServiceError>;
    async fn find_by_product_id(
        &self,
        product_id: &str,
    ) -> Result<ApiResponse<InventoryResponse>, ServiceError>;
    async fn find_low_stock(
        &self,
        req: &LowStockQuery,
    ) -> Result<ApiResponse<Vec<InventoryResponse>>, ServiceError>;
    async fn find_categories(&self) -> Result<ApiResponse<Vec<String>>, ServiceError>;
    async fn find_locations(&self) -> Result<ApiResponse<Vec<String>>, ServiceError>;
    async fn stats(&self) -> Result<ApiResponse<InventoryStatsResponse>, ServiceError>;
}

#[async_trait]
pub trait InventoryCommandServiceTrait {
    async fn create_item(
        &self,
        req: &CreateInventoryRequest,
    ) -> Result<ApiResponse<InventoryResponse>, ServiceError>;
    async fn update_item(
        &self,
        id: i32,
        req: &UpdateInventoryRequest,
    ) -> Result<ApiResponse<InventoryResponse>, ServiceError>;
    async fn update_quantities(
        &self,
        id: i32,
        req: &UpdateQuantitiesRequest,
    ) -> Result<ApiResponse<InventoryResponse>, ServiceError>;
    async fn delete_item(&self, id: i32) -> Result<ApiResponse<InventoryResponse>, ServiceError>;
    async fn bulk_update(
        &self,
        req: &BulkUpdateRequest,
    ) -> Result<ApiResponse<Vec<InventoryResponse>>, ServiceError>;
}
