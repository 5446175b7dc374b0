//! HTTP Router
//!
//! Wires every catalog and search handler under `/api/products` and shares a
//! single `ProductService` with all of them through an `Extension` layer.
//! The OpenAPI document is served next to it at `/api-docs/openapi.json`.
//!
//! Static segments (`health`, `search`, `stats`, `index`, `bulk`) are
//! registered next to the `/:id` capture; axum prefers the static match, so
//! none of them can be shadowed by a product id.

pub mod openapi;

use axum::Router;
use axum::extract::Extension;
use axum::routing::{delete, get, post};
use std::sync::Arc;

use crate::catalog::handlers::{
    handle_bulk_create, handle_create_product, handle_delete_index, handle_delete_product,
    handle_get_product, handle_health, handle_index_stats, handle_list_products,
    handle_update_product,
};
use crate::catalog::service::ProductService;
use crate::search::handlers::handle_search;
use openapi::{OPENAPI_PATH, handle_openapi};

pub const API_PREFIX: &str = "/api/products";

pub fn router(service: Arc<ProductService>) -> Router {
    let products = Router::new()
        .route("/health", get(handle_health))
        .route("/search", get(handle_search))
        .route("/stats", get(handle_index_stats))
        .route("/index", delete(handle_delete_index))
        .route("/bulk", post(handle_bulk_create))
        .route("/", post(handle_create_product).get(handle_list_products))
        .route(
            "/:id",
            get(handle_get_product)
                .put(handle_update_product)
                .delete(handle_delete_product),
        );

    Router::new()
        .nest(API_PREFIX, products)
        .route(OPENAPI_PATH, get(handle_openapi))
        .layer(Extension(service))
}

#[cfg(test)]
mod tests;
