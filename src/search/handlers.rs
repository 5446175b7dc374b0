use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Extension, Query};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;

use super::types::{Pagination, SearchFilterSet};
use crate::catalog::protocol::SearchResponseBody;
use crate::catalog::service::ProductService;
use crate::error::{CatalogError, ErrorBody};

/// Query string of the search endpoint.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    /// Free text matched against name, description, category and brand.
    pub q: Option<String>,
    /// Exact category.
    pub category: Option<String>,
    /// Exact brand.
    pub brand: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_rating: Option<f64>,
    /// `true` keeps only products with stock; any other value adds no filter.
    pub in_stock: Option<String>,
    pub page: Option<u32>,
    pub size: Option<u32>,
}

impl SearchParams {
    /// Blank category/brand count as absent; `inStock` is true only for the literal `"true"`.
    pub fn filters(&self) -> SearchFilterSet {
        let non_blank = |value: &Option<String>| {
            value
                .as_ref()
                .filter(|v| !v.trim().is_empty())
                .cloned()
        };

        SearchFilterSet {
            category: non_blank(&self.category),
            brand: non_blank(&self.brand),
            min_price: self.min_price,
            max_price: self.max_price,
            min_rating: self.min_rating,
            in_stock: self.in_stock.as_deref().map(|v| v == "true"),
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/products/search",
    tag = "Search",
    params(SearchParams),
    responses(
        (status = 200, description = "Ranked products with facets", body = SearchResponseBody),
        (status = 400, description = "Invalid pagination or query string", body = ErrorBody),
        (status = 500, description = "Search backend failure", body = ErrorBody)
    )
)]
pub async fn handle_search(
    Extension(service): Extension<Arc<ProductService>>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<SearchResponseBody>, CatalogError> {
    let Query(params) = params.map_err(|e| CatalogError::BadRequest(e.body_text()))?;
    let pagination = Pagination::from_params(params.page, params.size)?;
    let filters = params.filters();

    tracing::debug!("Search q={:?} filters={:?}", params.q, filters);
    let result = service
        .search(params.q.as_deref(), &filters, pagination)
        .await?;

    let search_query = params.q.filter(|q| !q.trim().is_empty());
    Ok(Json(SearchResponseBody::new(result, search_query, filters)))
}
