use crate::{
    domain::requests::inventory::{FieldChange, FindAllInventory, NewInventoryItem},
    model::{InventoryItem as InventoryModel, InventoryStats as InventoryStatsModel},
};
use async_trait::async_trait;
use shared::errors::RepositoryError;
use std::sync::Arc;

pub type DynInventoryQueryRepository = Arc<dyn InventoryQueryRepositoryTrait + Send + Sync>;
pub type DynInventoryCommandRepository = Arc<dyn InventoryCommandRepositoryTrait + Send + Sync>;

/// Read-only access; each call borrows a pooled connection for its own duration.
#[async_trait]
pub trait InventoryQueryRepositoryTrait {
    async fn find_all(&self, req: &FindAllInventory) -> Result<Vec<InventoryModel>, RepositoryError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<InventoryModel>, RepositoryError>;
    async fn find_by_product_id(
        &self,
        product_id: &str,
    ) -> Result<Option<InventoryModel>, RepositoryError>;
    async fn find_low_stock(&self, threshold: i32) -> Result<Vec<InventoryModel>, RepositoryError>;
    async fn find_categories(&self) -> Result<Vec<String>, RepositoryError>;
    async fn find_locations(&self) -> Result<Vec<String>, RepositoryError>;
    async fn stats(&self, low_stock_threshold: i32) -> Result<InventoryStatsModel, RepositoryError>;
}

/// Statements bound to a single connection, either autocommit or inside an
/// open transaction. Reads through a writer see the writer's own changes.
#[async_trait]
pub trait InventoryWriter: Send {
    async fn find_by_id(&mut self, id: i32) -> Result<Option<InventoryModel>, RepositoryError>;

    /// Whether another row (other than `except_id`) already holds `product_id`.
    async fn product_id_taken(
        &mut self,
        product_id: &str,
        except_id: Option<i32>,
    ) -> Result<bool, RepositoryError>;

    /// Fails with `AlreadyExists` when the store's unique constraint fires.
    async fn insert(&mut self, item: &NewInventoryItem) -> Result<InventoryModel, RepositoryError>;

    /// Applies `changes` plus a fresh `updated_at`; returns the affected row count.
    async fn update(&mut self, id: i32, changes: &[FieldChange]) -> Result<u64, RepositoryError>;

    async fn delete(&mut self, id: i32) -> Result<u64, RepositoryError>;
}

#[async_trait]
pub trait InventoryTransaction: InventoryWriter {
    async fn commit(&mut self) -> Result<(), RepositoryError>;
    async fn rollback(&mut self) -> Result<(), RepositoryError>;
}

#[async_trait]
pub trait InventoryCommandRepositoryTrait {
    async fn acquire(&self) -> Result<Box<dyn InventoryWriter>, RepositoryError>;
    async fn begin(&self) -> Result<Box<dyn InventoryTransaction>, RepositoryError>;
}
