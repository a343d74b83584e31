use crate::{
    abstract_trait::inventory::service::{DynInventoryCommandService, DynInventoryQueryService},
    domain::{
        requests::inventory::{
            BulkUpdateRequest, CreateInventoryRequest, FindAllInventory, LowStockQuery,
            UpdateInventoryRequest, UpdateQuantitiesRequest,
        },
        response::{
            api::ApiResponse,
            inventory::{InventoryResponse, InventoryStatsResponse},
        },
    },
    handler::extract::{JsonBody, QueryParams, parse_item_id},
    state::AppState,
};
use axum::{
    Json,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, put},
};
use shared::errors::{ErrorResponse, HttpError};
use std::sync::Arc;
use utoipa_axum::router::OpenApiRouter;

#[utoipa::path(
    get,
    path = "/inventory",
    tag = "Inventory",
    params(FindAllInventory),
    responses(
        (status = 200, description = "Matching inventory items, newest first", body = ApiResponse<Vec<InventoryResponse>>),
        (status = 400, description = "Invalid query", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn get_inventory(
    Extension(service): Extension<DynInventoryQueryService>,
    QueryParams(params): QueryParams<FindAllInventory>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.find_all(&params).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    post,
    path = "/inventory",
    tag = "Inventory",
    request_body = CreateInventoryRequest,
    responses(
        (status = 201, description = "Inventory item created", body = ApiResponse<InventoryResponse>),
        (status = 400, description = "Missing or invalid field", body = ErrorResponse),
        (status = 409, description = "Duplicate product ID", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn create_inventory(
    Extension(service): Extension<DynInventoryCommandService>,
    JsonBody(body): JsonBody<CreateInventoryRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.create_item(&body).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    get,
    path = "/inventory/stats",
    tag = "Inventory",
    responses(
        (status = 200, description = "Aggregate inventory statistics", body = ApiResponse<InventoryStatsResponse>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn get_inventory_stats(
    Extension(service): Extension<DynInventoryQueryService>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.stats().await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    get,
    path = "/inventory/categories",
    tag = "Inventory",
    responses(
        (status = 200, description = "Distinct categories, sorted", body = ApiResponse<Vec<String>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn get_categories(
    Extension(service): Extension<DynInventoryQueryService>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.find_categories().await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    get,
    path = "/inventory/locations",
    tag = "Inventory",
    responses(
        (status = 200, description = "Distinct locations, sorted", body = ApiResponse<Vec<String>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn get_locations(
    Extension(service): Extension<DynInventoryQueryService>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.find_locations().await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    get,
    path = "/inventory/low-stock",
    tag = "Inventory",
    params(LowStockQuery),
    responses(
        (status = 200, description = "Items below the threshold, lowest first", body = ApiResponse<Vec<InventoryResponse>>),
        (status = 400, description = "Invalid threshold", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn get_low_stock(
    Extension(service): Extension<DynInventoryQueryService>,
    QueryParams(params): QueryParams<LowStockQuery>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.find_low_stock(&params).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    get,
    path = "/inventory/product/{product_id}",
    tag = "Inventory",
    params(("product_id" = String, Path, description = "External product ID")),
    responses(
        (status = 200, description = "Inventory item", body = ApiResponse<InventoryResponse>),
        (status = 404, description = "Inventory item not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn get_inventory_by_product_id(
    Extension(service): Extension<DynInventoryQueryService>,
    Path(product_id): Path<String>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.find_by_product_id(&product_id).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    put,
    path = "/inventory/bulk",
    tag = "Inventory",
    request_body = BulkUpdateRequest,
    responses(
        (status = 200, description = "Every item updated, in input order", body = ApiResponse<Vec<InventoryResponse>>),
        (status = 400, description = "Invalid batch or item", body = ErrorResponse),
        (status = 404, description = "An item was not found", body = ErrorResponse),
        (status = 409, description = "Duplicate product ID", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn bulk_update_inventory(
    Extension(service): Extension<DynInventoryCommandService>,
    JsonBody(body): JsonBody<BulkUpdateRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.bulk_update(&body).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    get,
    path = "/inventory/{id}",
    tag = "Inventory",
    params(("id" = i32, Path, description = "Inventory item ID")),
    responses(
        (status = 200, description = "Inventory item", body = ApiResponse<InventoryResponse>),
        (status = 400, description = "Invalid item ID", body = ErrorResponse),
        (status = 404, description = "Inventory item not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn get_inventory_item(
    Extension(service): Extension<DynInventoryQueryService>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HttpError> {
    let id = parse_item_id(&id)?;
    let response = service.find_by_id(id).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    put,
    path = "/inventory/{id}",
    tag = "Inventory",
    params(("id" = i32, Path, description = "Inventory item ID")),
    request_body = UpdateInventoryRequest,
    responses(
        (status = 200, description = "Inventory item updated", body = ApiResponse<InventoryResponse>),
        (status = 400, description = "Invalid item ID or field", body = ErrorResponse),
        (status = 404, description = "Inventory item not found", body = ErrorResponse),
        (status = 409, description = "Duplicate product ID", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn update_inventory_item(
    Extension(service): Extension<DynInventoryCommandService>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<UpdateInventoryRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let id = parse_item_id(&id)?;
    let response = service.update_item(id, &body).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    patch,
    path = "/inventory/{id}/quantities",
    tag = "Inventory",
    params(("id" = i32, Path, description = "Inventory item ID")),
    request_body = UpdateQuantitiesRequest,
    responses(
        (status = 200, description = "Quantities updated", body = ApiResponse<InventoryResponse>),
        (status = 400, description = "Invalid item ID or quantity", body = ErrorResponse),
        (status = 404, description = "Inventory item not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn update_inventory_quantities(
    Extension(service): Extension<DynInventoryCommandService>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<UpdateQuantitiesRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let id = parse_item_id(&id)?;
    let response = service.update_quantities(id, &body).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    delete,
    path = "/inventory/{id}",
    tag = "Inventory",
    params(("id" = i32, Path, description = "Inventory item ID")),
    responses(
        (status = 200, description = "Deleted item snapshot", body = ApiResponse<InventoryResponse>),
        (status = 400, description = "Invalid item ID", body = ErrorResponse),
        (status = 404, description = "Inventory item not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn delete_inventory_item(
    Extension(service): Extension<DynInventoryCommandService>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HttpError> {
    let id = parse_item_id(&id)?;
    let response = service.delete_item(id).await?;
    Ok((StatusCode::OK, Json(response)))
}

pub fn inventory_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    OpenApiRouter::new()
        .route("/inventory", get(get_inventory).post(create_inventory))
        .route("/inventory/stats", get(get_inventory_stats))
        .route("/inventory/categories", get(get_categories))
        .route("/inventory/locations", get(get_locations))
        .route("/inventory/low-stock", get(get_low_stock))
        .route(
            "/inventory/product/{product_id}",
            get(get_inventory_by_product_id),
        )
        .route("/inventory/bulk", put(bulk_update_inventory))
        .route(
            "/inventory/{id}",
            get(get_inventory_item)
                .put(update_inventory_item)
                .delete(delete_inventory_item),
        )
        .route(
            "/inventory/{id}/quantities",
            patch(update_inventory_quantities),
        )
        .layer(Extension(app_state.di_container.inventory_query.clone()))
        .layer(Extension(app_state.di_container.inventory_command.clone()))
}
