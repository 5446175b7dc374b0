//! OpenAPI description of the `/api/products` surface, served as JSON.

use axum::Json;
use utoipa::OpenApi;

use crate::catalog::protocol::{
    BulkCreateRequest, BulkCreateResponse, HealthResponse, MessageResponse, PaginationInfo,
    ProductListResponse, ProductResponse, SearchResponseBody, StatsResponse,
};
use crate::catalog::types::{IndexStats, Product, ProductInput, ProductPatch};
use crate::error::ErrorBody;
use crate::search::types::{PriceRangeBucket, SearchAggregations, SearchFilterSet, TermBucket};

pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Product Catalog API",
        description = "Product catalog with full-text search, filters and facets backed by Elasticsearch",
        contact(name = "API Support", email = "support@example.com"),
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers((url = "http://localhost:3000", description = "Development server")),
    paths(
        crate::catalog::handlers::handle_health,
        crate::search::handlers::handle_search,
        crate::catalog::handlers::handle_index_stats,
        crate::catalog::handlers::handle_delete_index,
        crate::catalog::handlers::handle_bulk_create,
        crate::catalog::handlers::handle_create_product,
        crate::catalog::handlers::handle_list_products,
        crate::catalog::handlers::handle_get_product,
        crate::catalog::handlers::handle_update_product,
        crate::catalog::handlers::handle_delete_product,
    ),
    components(schemas(
        Product,
        ProductInput,
        ProductPatch,
        IndexStats,
        SearchFilterSet,
        SearchAggregations,
        TermBucket,
        PriceRangeBucket,
        HealthResponse,
        ProductResponse,
        MessageResponse,
        BulkCreateRequest,
        BulkCreateResponse,
        StatsResponse,
        PaginationInfo,
        ProductListResponse,
        SearchResponseBody,
        ErrorBody,
    )),
    tags(
        (name = "Health", description = "Liveness"),
        (name = "Search", description = "Full-text search with filters and facets"),
        (name = "Products", description = "Product CRUD"),
        (name = "Bulk Operations", description = "Batch indexing"),
        (name = "Index Management", description = "Index statistics and deletion")
    )
)]
pub struct ApiDoc;

pub async fn handle_openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
