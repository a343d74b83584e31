use crate::{
    abstract_trait::inventory::{
        repository::{DynInventoryCommandRepository, InventoryWriter},
        service::InventoryCommandServiceTrait,
    },
    config::myconfig::InventorySettings,
    domain::{
        requests::inventory::{
            BulkUpdateRequest, CreateInventoryRequest, NewInventoryItem, UpdateInventoryRequest,
            UpdateQuantitiesRequest,
        },
        response::{api::ApiResponse, inventory::InventoryResponse},
    },
    model::InventoryItem as InventoryModel,
    repository::statements::DUPLICATE_PRODUCT_ID,
    service::ITEM_NOT_FOUND,
};
use anyhow::Result;
use async_trait::async_trait;
use prometheus_client::registry::Registry;
use shared::{
    errors::ServiceError,
    utils::{Method, Metrics, Status as StatusUtils, TracingContext},
};
use tracing::{error, info, warn};

/// Existence, field validation, uniqueness, then the write and a re-read,
/// all on the caller's connection so a transaction sees its own changes.
async fn apply_update<W>(
    writer: &mut W,
    id: i32,
    req: &UpdateInventoryRequest,
) -> Result<InventoryModel, ServiceError>
where
    W: InventoryWriter + ?Sized,
{
    if writer.find_by_id(id).await?.is_none() {
        return Err(ServiceError::NotFound(ITEM_NOT_FOUND.into()));
    }

    req.validate_fields()?;

    if let Some(product_id) = req.product_id.as_deref() {
        if writer.product_id_taken(product_id, Some(id)).await? {
            return Err(ServiceError::Conflict(DUPLICATE_PRODUCT_ID.into()));
        }
    }

    let changes = req.changes();
    if changes.is_empty() {
        return Err(ServiceError::validation("No fields to update"));
    }

    if writer.update(id, &changes).await? == 0 {
        return Err(ServiceError::NotFound(ITEM_NOT_FOUND.into()));
    }

    writer
        .find_by_id(id)
        .await?
        .ok_or_else(|| ServiceError::Internal("Failed to retrieve updated item".into()))
}

#[derive(Clone)]
pub struct InventoryCommandService {
    pub command: DynInventoryCommandRepository,
    pub metrics: Metrics,
    pub settings: InventorySettings,
}

impl InventoryCommandService {
    pub fn new(
        command: DynInventoryCommandRepository,
        settings: InventorySettings,
        registry: &mut Registry,
    ) -> Result<Self> {
        let metrics = Metrics::new();

        metrics.register(
            registry,
            "inventory_command_service",
            "InventoryCommandService",
        );

        Ok(Self {
            command,
            metrics,
            settings,
        })
    }

    fn start_tracing(&self, operation_name: &'static str) -> TracingContext {
        TracingContext::start("inventory-command", operation_name)
    }

    fn complete_tracing_success(&self, tracing_ctx: &TracingContext, method: Method, message: &str) {
        self.complete_tracing_internal(tracing_ctx, method, true, message);
    }

    fn complete_tracing_error(
        &self,
        tracing_ctx: &TracingContext,
        method: Method,
        error_message: &str,
    ) {
        self.complete_tracing_internal(tracing_ctx, method, false, error_message);
    }

    fn complete_tracing_internal(
        &self,
        tracing_ctx: &TracingContext,
        method: Method,
        is_success: bool,
        message: &str,
    ) {
        let status = if is_success {
            StatusUtils::Success
        } else {
            StatusUtils::Error
        };
        let elapsed = tracing_ctx.elapsed_secs();

        tracing_ctx.span.in_scope(|| {
            if is_success {
                info!(duration_secs = elapsed, "✅ Operation completed successfully: {message}");
            } else {
                error!(duration_secs = elapsed, "❌ Operation failed: {message}");
            }
        });

        self.metrics.record(method, status, elapsed);
    }

    fn fail<T>(
        &self,
        tracing_ctx: &TracingContext,
        method: Method,
        err: ServiceError,
    ) -> Result<T, ServiceError> {
        self.complete_tracing_error(tracing_ctx, method, &err.to_string());
        Err(err)
    }

    async fn update_on_connection(
        &self,
        tracing_ctx: &TracingContext,
        method: Method,
        id: i32,
        req: &UpdateInventoryRequest,
    ) -> Result<ApiResponse<InventoryResponse>, ServiceError> {
        let mut writer = match self.command.acquire().await {
            Ok(writer) => writer,
            Err(e) => return self.fail(tracing_ctx, method, e.into()),
        };

        match apply_update(&mut *writer, id, req).await {
            Ok(item) => {
                self.complete_tracing_success(
                    tracing_ctx,
                    method,
                    &format!("Updated inventory item {id}"),
                );
                Ok(ApiResponse::ok(InventoryResponse::from(item))
                    .with_message("Inventory item updated successfully"))
            }
            Err(e) => self.fail(tracing_ctx, method, e),
        }
    }
}

#[async_trait]
impl InventoryCommandServiceTrait for InventoryCommandService {
    async fn create_item(
        &self,
        req: &CreateInventoryRequest,
    ) -> Result<ApiResponse<InventoryResponse>, ServiceError> {
        info!("🏗️ Creating inventory item: {:?}", req.product_id);

        let method = Method::Post;
        let tracing_ctx = self.start_tracing("CreateInventory");

        let item = match NewInventoryItem::try_from(req) {
            Ok(item) => item,
            Err(e) => return self.fail(&tracing_ctx, method, e),
        };

        let mut writer = match self.command.acquire().await {
            Ok(writer) => writer,
            Err(e) => return self.fail(&tracing_ctx, method, e.into()),
        };

        match writer.product_id_taken(&item.product_id, None).await {
            Ok(false) => {}
            Ok(true) => {
                return self.fail(
                    &tracing_ctx,
                    method,
                    ServiceError::Conflict(DUPLICATE_PRODUCT_ID.into()),
                );
            }
            Err(e) => return self.fail(&tracing_ctx, method, e.into()),
        }

        // a concurrent creator can still win the race; the repository maps
        // the unique-constraint violation to the same conflict
        match writer.insert(&item).await {
            Ok(created) => {
                self.complete_tracing_success(
                    &tracing_ctx,
                    method,
                    &format!("Created inventory item {}", created.id),
                );
                Ok(ApiResponse::ok(InventoryResponse::from(created))
                    .with_message("Inventory item created successfully"))
            }
            Err(e) => self.fail(&tracing_ctx, method, e.into()),
        }
    }

    async fn update_item(
        &self,
        id: i32,
        req: &UpdateInventoryRequest,
    ) -> Result<ApiResponse<InventoryResponse>, ServiceError> {
        info!("🔄 Updating inventory item {id}");

        let tracing_ctx = self.start_tracing("UpdateInventory");

        self.update_on_connection(&tracing_ctx, Method::Put, id, req)
            .await
    }

    async fn update_quantities(
        &self,
        id: i32,
        req: &UpdateQuantitiesRequest,
    ) -> Result<ApiResponse<InventoryResponse>, ServiceError> {
        info!(
            "📦 Adjusting quantities of inventory item {id} | available: {:?}, reserved: {:?}, on hand: {:?}",
            req.available_quantity, req.reserved_quantity, req.on_hand_quantity
        );

        let tracing_ctx = self.start_tracing("UpdateInventoryQuantities");
        let update = UpdateInventoryRequest::from(req.clone());

        self.update_on_connection(&tracing_ctx, Method::Patch, id, &update)
            .await
    }

    async fn delete_item(&self, id: i32) -> Result<ApiResponse<InventoryResponse>, ServiceError> {
        info!("🗑️ Deleting inventory item {id}");

        let method = Method::Delete;
        let tracing_ctx = self.start_tracing("DeleteInventory");

        let mut writer = match self.command.acquire().await {
            Ok(writer) => writer,
            Err(e) => return self.fail(&tracing_ctx, method, e.into()),
        };

        let snapshot = match writer.find_by_id(id).await {
            Ok(Some(item)) => item,
            Ok(None) => {
                return self.fail(
                    &tracing_ctx,
                    method,
                    ServiceError::NotFound(ITEM_NOT_FOUND.into()),
                );
            }
            Err(e) => return self.fail(&tracing_ctx, method, e.into()),
        };

        match writer.delete(id).await {
            Ok(0) => {
                warn!("⚠️ Inventory item {id} disappeared before it could be deleted");
                self.fail(
                    &tracing_ctx,
                    method,
                    ServiceError::Internal("Failed to delete inventory item".into()),
                )
            }
            Ok(_) => {
                self.complete_tracing_success(
                    &tracing_ctx,
                    method,
                    &format!("Deleted inventory item {id}"),
                );
                Ok(ApiResponse::ok(InventoryResponse::from(snapshot))
                    .with_message("Inventory item deleted successfully"))
            }
            Err(e) => self.fail(&tracing_ctx, method, e.into()),
        }
    }

    async fn bulk_update(
        &self,
        req: &BulkUpdateRequest,
    ) -> Result<ApiResponse<Vec<InventoryResponse>>, ServiceError> {
        let total = req.updates.len();
        let max_items = self.settings.bulk_update_max_items;

        info!("📚 Bulk updating {total} inventory items");

        let method = Method::Put;
        let tracing_ctx = self.start_tracing("BulkUpdateInventory");

        if total > max_items {
            return self.fail(
                &tracing_ctx,
                method,
                ServiceError::validation(format!(
                    "Bulk update accepts at most {max_items} items, got {total}"
                )),
            );
        }

        if total == 0 {
            self.complete_tracing_success(&tracing_ctx, method, "Nothing to update");
            return Ok(ApiResponse::list(Vec::new())
                .with_message("Bulk update completed successfully"));
        }

        let mut tx = match self.command.begin().await {
            Ok(tx) => tx,
            Err(e) => return self.fail(&tracing_ctx, method, e.into()),
        };

        let mut updated = Vec::with_capacity(total);

        for (index, item) in req.updates.iter().enumerate() {
            match apply_update(&mut *tx, item.id, &item.data).await {
                Ok(model) => updated.push(InventoryResponse::from(model)),
                Err(source) => {
                    if let Err(e) = tx.rollback().await {
                        error!("❌ Rollback after failed bulk item {index} failed: {e:?}");
                    }

                    return self.fail(
                        &tracing_ctx,
                        method,
                        ServiceError::BulkItemFailed {
                            index,
                            id: item.id,
                            source: Box::new(source),
                        },
                    );
                }
            }
        }

        if let Err(e) = tx.commit().await {
            return self.fail(&tracing_ctx, method, e.into());
        }

        self.complete_tracing_success(
            &tracing_ctx,
            method,
            &format!("Bulk updated {} inventory items", updated.len()),
        );

        Ok(ApiResponse::list(updated).with_message("Bulk update completed successfully"))
    }
}
