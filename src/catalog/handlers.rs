use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Extension, Path, Query};
use axum::http::StatusCode;
use chrono::Utc;
use std::sync::Arc;

use super::protocol::{
    BulkCreateRequest, BulkCreateResponse, HealthResponse, ListParams, MessageResponse,
    ProductListResponse, ProductResponse, StatsResponse,
};
use super::service::ProductService;
use super::types::{ProductInput, ProductPatch};
use crate::error::{CatalogError, ErrorBody};
use crate::search::types::Pagination;

fn bad_json(rejection: JsonRejection) -> CatalogError {
    CatalogError::BadRequest(rejection.body_text())
}

#[utoipa::path(
    get,
    path = "/api/products/health",
    tag = "Health",
    responses((status = 200, description = "API is running", body = HealthResponse))
)]
pub async fn handle_health() -> (StatusCode, Json<HealthResponse>) {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "OK".to_string(),
            message: "Products API is running".to_string(),
            timestamp: Utc::now().to_rfc3339(),
        }),
    )
}

#[utoipa::path(
    post,
    path = "/api/products",
    tag = "Products",
    request_body(content = ProductInput, description = "Product to create; `id` is generated when absent"),
    responses(
        (status = 201, description = "Product created", body = ProductResponse),
        (status = 400, description = "Validation failed or malformed body", body = ErrorBody),
        (status = 500, description = "Search backend failure", body = ErrorBody)
    )
)]
pub async fn handle_create_product(
    Extension(service): Extension<Arc<ProductService>>,
    payload: Result<Json<ProductInput>, JsonRejection>,
) -> Result<(StatusCode, Json<ProductResponse>), CatalogError> {
    let Json(input) = payload.map_err(bad_json)?;
    let product = service.create(input).await?;

    Ok((
        StatusCode::CREATED,
        Json(ProductResponse {
            success: true,
            message: Some("Product created successfully".to_string()),
            data: product,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/products",
    tag = "Products",
    params(ListParams),
    responses(
        (status = 200, description = "One page of products, newest first", body = ProductListResponse),
        (status = 400, description = "Invalid pagination", body = ErrorBody),
        (status = 500, description = "Search backend failure", body = ErrorBody)
    )
)]
pub async fn handle_list_products(
    Extension(service): Extension<Arc<ProductService>>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<ProductListResponse>, CatalogError> {
    let Query(params) = params.map_err(|e| CatalogError::BadRequest(e.body_text()))?;
    let pagination = Pagination::from_params(params.page, params.size)?;

    let page = service.list(pagination).await?;
    Ok(Json(page.into()))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}",
    tag = "Products",
    params(("id" = String, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product found", body = ProductResponse),
        (status = 404, description = "Product not found", body = ErrorBody),
        (status = 500, description = "Search backend failure", body = ErrorBody)
    )
)]
pub async fn handle_get_product(
    Extension(service): Extension<Arc<ProductService>>,
    Path(id): Path<String>,
) -> Result<Json<ProductResponse>, CatalogError> {
    let product = service.get(&id).await?;
    Ok(Json(ProductResponse {
        success: true,
        message: None,
        data: product,
    }))
}

#[utoipa::path(
    put,
    path = "/api/products/{id}",
    tag = "Products",
    params(("id" = String, Path, description = "Product id")),
    request_body(content = ProductPatch, description = "Fields to change; id and timestamps are ignored"),
    responses(
        (status = 200, description = "Product updated", body = ProductResponse),
        (status = 400, description = "Merged product failed validation", body = ErrorBody),
        (status = 404, description = "Product not found", body = ErrorBody),
        (status = 500, description = "Search backend failure", body = ErrorBody)
    )
)]
pub async fn handle_update_product(
    Extension(service): Extension<Arc<ProductService>>,
    Path(id): Path<String>,
    payload: Result<Json<ProductPatch>, JsonRejection>,
) -> Result<Json<ProductResponse>, CatalogError> {
    let Json(patch) = payload.map_err(bad_json)?;
    let product = service.update(&id, patch).await?;

    Ok(Json(ProductResponse {
        success: true,
        message: Some("Product updated successfully".to_string()),
        data: product,
    }))
}

#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    tag = "Products",
    params(("id" = String, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product deleted", body = MessageResponse),
        (status = 404, description = "Product not found", body = ErrorBody),
        (status = 500, description = "Search backend failure", body = ErrorBody)
    )
)]
pub async fn handle_delete_product(
    Extension(service): Extension<Arc<ProductService>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, CatalogError> {
    service.delete(&id).await?;
    Ok(Json(MessageResponse {
        success: true,
        message: "Product deleted successfully".to_string(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/products/bulk",
    tag = "Bulk Operations",
    request_body(content = BulkCreateRequest, description = "Between 1 and 1000 products"),
    responses(
        (status = 201, description = "All products indexed", body = BulkCreateResponse),
        (status = 400, description = "Empty, oversized or invalid batch", body = ErrorBody),
        (status = 500, description = "Some items failed to index", body = ErrorBody)
    )
)]
pub async fn handle_bulk_create(
    Extension(service): Extension<Arc<ProductService>>,
    payload: Result<Json<BulkCreateRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<BulkCreateResponse>), CatalogError> {
    let Json(req) = payload.map_err(bad_json)?;
    let count = service.bulk_create(req.products).await?;

    Ok((
        StatusCode::CREATED,
        Json(BulkCreateResponse {
            success: true,
            message: format!("Bulk indexed {} products successfully", count),
            count,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/products/stats",
    tag = "Index Management",
    responses(
        (status = 200, description = "Index statistics", body = StatsResponse),
        (status = 500, description = "Search backend failure", body = ErrorBody)
    )
)]
pub async fn handle_index_stats(
    Extension(service): Extension<Arc<ProductService>>,
) -> Result<Json<StatsResponse>, CatalogError> {
    let stats = service.index_stats().await?;
    Ok(Json(StatsResponse {
        success: true,
        data: stats,
    }))
}

#[utoipa::path(
    delete,
    path = "/api/products/index",
    tag = "Index Management",
    responses(
        (status = 200, description = "Index deleted", body = MessageResponse),
        (status = 500, description = "Search backend failure", body = ErrorBody)
    )
)]
pub async fn handle_delete_index(
    Extension(service): Extension<Arc<ProductService>>,
) -> Result<Json<MessageResponse>, CatalogError> {
    service.delete_index().await?;
    Ok(Json(MessageResponse {
        success: true,
        message: "Index deleted successfully".to_string(),
    }))
}
