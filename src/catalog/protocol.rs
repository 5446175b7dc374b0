//! Catalog API Protocol
//!
//! Request and response bodies of the `/api/products` endpoints.
//! Every successful response carries `success: true`; failures are rendered
//! by `CatalogError`.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::types::{IndexStats, Product, ProductInput};
use crate::search::types::{ProductListPage, SearchAggregations, SearchFilterSet, SearchResult};

/// Body of the bulk create endpoint.
#[derive(Debug, Deserialize, ToSchema)]
pub struct BulkCreateRequest {
    #[serde(default)]
    pub products: Vec<ProductInput>,
}

/// Query string of the list endpoint.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// Page number, starting at 1.
    pub page: Option<u32>,
    /// Products per page, 1 to 100.
    pub size: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub timestamp: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProductResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: Product,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BulkCreateResponse {
    pub success: bool,
    pub message: String,
    pub count: usize,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatsResponse {
    pub success: bool,
    pub data: IndexStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginationInfo {
    pub page: u32,
    pub size: u32,
    pub total: u64,
    pub total_pages: u64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProductListResponse {
    pub success: bool,
    pub data: Vec<Product>,
    pub pagination: PaginationInfo,
}

impl From<ProductListPage> for ProductListResponse {
    fn from(page: ProductListPage) -> Self {
        Self {
            success: true,
            pagination: PaginationInfo {
                page: page.page,
                size: page.size,
                total: page.total,
                total_pages: page.total_pages,
            },
            data: page.products,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponseBody {
    pub success: bool,
    pub data: Vec<Product>,
    pub pagination: PaginationInfo,
    pub aggregations: SearchAggregations,
    pub search_query: Option<String>,
    pub filters: SearchFilterSet,
}

impl SearchResponseBody {
    pub fn new(result: SearchResult, search_query: Option<String>, filters: SearchFilterSet) -> Self {
        Self {
            success: true,
            pagination: PaginationInfo {
                page: result.page,
                size: result.size,
                total: result.total,
                total_pages: result.total_pages,
            },
            data: result.products,
            aggregations: result.aggregations,
            search_query,
            filters,
        }
    }
}
