use crate::{
    abstract_trait::inventory::{
        repository::DynInventoryQueryRepository, service::InventoryQueryServiceTrait,
    },
    config::myconfig::InventorySettings,
    domain::{
        requests::inventory::{FindAllInventory, LowStockQuery},
        response::{
            api::ApiResponse,
            inventory::{InventoryResponse, InventoryStatsResponse},
        },
    },
};
use anyhow::Result;
use async_trait::async_trait;
use prometheus_client::registry::Registry;
use shared::{
    errors::ServiceError,
    utils::{Method, Metrics, Status as StatusUtils, TracingContext, format_validation_errors},
};
use tracing::{error, info};
use validator::Validate;

pub const ITEM_NOT_FOUND: &str = "Inventory item not found";

#[derive(Clone)]
pub struct InventoryQueryService {
    pub query: DynInventoryQueryRepository,
    pub metrics: Metrics,
    pub settings: InventorySettings,
}

impl InventoryQueryService {
    pub fn new(
        query: DynInventoryQueryRepository,
        settings: InventorySettings,
        registry: &mut Registry,
    ) -> Result<Self> {
        let metrics = Metrics::new();

        metrics.register(registry, "inventory_query_service", "InventoryQueryService");

        Ok(Self {
            query,
            metrics,
            settings,
        })
    }

    fn start_tracing(&self, operation_name: &'static str) -> TracingContext {
        TracingContext::start("inventory-query", operation_name)
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

    fn fail<T>(&self, tracing_ctx: &TracingContext, err: ServiceError) -> Result<T, ServiceError> {
        self.complete_tracing_error(tracing_ctx, Method::Get, &err.to_string());
        Err(err)
    }
}

#[async_trait]
impl InventoryQueryServiceTrait for InventoryQueryService {
    async fn find_all(
        &self,
        req: &FindAllInventory,
    ) -> Result<ApiResponse<Vec<InventoryResponse>>, ServiceError> {
        info!(
            "🔍 Listing inventory | Search: {:?}, Category: {:?}, Location: {:?}",
            req.search_term(),
            req.category_filter(),
            req.location_filter()
        );

        let tracing_ctx = self.start_tracing("FindAllInventory");

        if let Err(e) = req.validate() {
            return self.fail(&tracing_ctx, ServiceError::Validation(format_validation_errors(&e)));
        }

        match self.query.find_all(req).await {
            Ok(items) => {
                let data: Vec<InventoryResponse> =
                    items.into_iter().map(InventoryResponse::from).collect();

                self.complete_tracing_success(
                    &tracing_ctx,
                    Method::Get,
                    &format!("Listed {} inventory items", data.len()),
                );

                Ok(ApiResponse::list(data))
            }
            Err(e) => self.fail(&tracing_ctx, e.into()),
        }
    }

    async fn find_by_id(&self, id: i32) -> Result<ApiResponse<InventoryResponse>, ServiceError> {
        info!("🆔 Finding inventory item by ID: {id}");

        let tracing_ctx = self.start_tracing("FindInventoryById");

        match self.query.find_by_id(id).await {
            Ok(Some(item)) => {
                self.complete_tracing_success(
                    &tracing_ctx,
                    Method::Get,
                    &format!("Found inventory item {id}"),
                );
                Ok(ApiResponse::ok(InventoryResponse::from(item)))
            }
            Ok(None) => self.fail(&tracing_ctx, ServiceError::NotFound(ITEM_NOT_FOUND.into())),
            Err(e) => self.fail(&tracing_ctx, e.into()),
        }
    }

    async fn find_by_product_id(
        &self,
        product_id: &str,
    ) -> Result<ApiResponse<InventoryResponse>, ServiceError> {
        info!("🏷️ Finding inventory item by product ID: {product_id}");

        let tracing_ctx = self.start_tracing("FindInventoryByProductId");

        match self.query.find_by_product_id(product_id).await {
            Ok(Some(item)) => {
                self.complete_tracing_success(
                    &tracing_ctx,
                    Method::Get,
                    &format!("Found inventory item with product ID {product_id}"),
                );
                Ok(ApiResponse::ok(InventoryResponse::from(item)))
            }
            Ok(None) => self.fail(&tracing_ctx, ServiceError::NotFound(ITEM_NOT_FOUND.into())),
            Err(e) => self.fail(&tracing_ctx, e.into()),
        }
    }

    async fn find_low_stock(
        &self,
        req: &LowStockQuery,
    ) -> Result<ApiResponse<Vec<InventoryResponse>>, ServiceError> {
        let tracing_ctx = self.start_tracing("FindLowStockInventory");

        if let Err(e) = req.validate() {
            return self.fail(&tracing_ctx, ServiceError::Validation(format_validation_errors(&e)));
        }

        let threshold = req.threshold.unwrap_or(self.settings.low_stock_threshold);

        info!("📉 Finding low stock items below {threshold}");

        match self.query.find_low_stock(threshold).await {
            Ok(items) => {
                let data: Vec<InventoryResponse> =
                    items.into_iter().map(InventoryResponse::from).collect();

                self.complete_tracing_success(
                    &tracing_ctx,
                    Method::Get,
                    &format!("Found {} low stock items", data.len()),
                );

                Ok(ApiResponse::list(data))
            }
            Err(e) => self.fail(&tracing_ctx, e.into()),
        }
    }

    async fn find_categories(&self) -> Result<ApiResponse<Vec<String>>, ServiceError> {
        let tracing_ctx = self.start_tracing("FindInventoryCategories");

        match self.query.find_categories().await {
            Ok(categories) => {
                self.complete_tracing_success(&tracing_ctx, Method::Get, "Fetched categories");
                Ok(ApiResponse::list(categories))
            }
            Err(e) => self.fail(&tracing_ctx, e.into()),
        }
    }

    async fn find_locations(&self) -> Result<ApiResponse<Vec<String>>, ServiceError> {
        let tracing_ctx = self.start_tracing("FindInventoryLocations");

        match self.query.find_locations().await {
            Ok(locations) => {
                self.complete_tracing_success(&tracing_ctx, Method::Get, "Fetched locations");
                Ok(ApiResponse::list(locations))
            }
            Err(e) => self.fail(&tracing_ctx, e.into()),
        }
    }

    async fn stats(&self) -> Result<ApiResponse<InventoryStatsResponse>, ServiceError> {
        let threshold = self.settings.low_stock_threshold;

        info!("📊 Computing inventory statistics (low stock below {threshold})");

        let tracing_ctx = self.start_tracing("InventoryStats");

        match self.query.stats(threshold).await {
            Ok(stats) => {
                self.complete_tracing_success(&tracing_ctx, Method::Get, "Computed statistics");
                Ok(ApiResponse::ok(InventoryStatsResponse::from_model(stats, threshold)))
            }
            Err(e) => self.fail(&tracing_ctx, e.into()),
        }
    }
}
