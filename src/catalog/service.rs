//! Catalog orchestration.
//!
//! `ProductService` owns the backend handle and the index name and implements
//! every catalog operation on top of `SearchBackend`. It holds no other state,
//! so one instance is shared across all requests.

use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;

use super::types::{IndexStats, Product, ProductInput, ProductPatch};
use super::validation;
use crate::engine::mapping::product_index_definition;
use crate::engine::protocol::ClusterInfo;
use crate::engine::{BackendError, SearchBackend};
use crate::error::{CatalogError, ValidationReport};
use crate::search::query::{build_list_request, build_search_request};
use crate::search::results::{shape_list_page, shape_search_result};
use crate::search::types::{Pagination, ProductListPage, SearchFilterSet, SearchResult};

/// A missing document (or index) is the caller's not-found; anything else is a backend failure.
fn lookup_error(id: &str, err: BackendError) -> CatalogError {
    if err.is_not_found() {
        CatalogError::NotFound(id.to_string())
    } else {
        CatalogError::Backend(err)
    }
}

/// Largest number of products accepted by one bulk call.
pub const MAX_BULK_PRODUCTS: usize = 1000;

pub struct ProductService {
    backend: Arc<dyn SearchBackend>,
    index: String,
}

impl ProductService {
    pub fn new(backend: Arc<dyn SearchBackend>, index: impl Into<String>) -> Self {
        Self {
            backend,
            index: index.into(),
        }
    }

    pub fn index_name(&self) -> &str {
        &self.index
    }

    pub async fn check_connection(&self) -> Result<ClusterInfo, CatalogError> {
        Ok(self.backend.cluster_info().await?)
    }

    /// Creates the product index with its mapping unless it already exists.
    /// Returns whether the index was created.
    pub async fn initialize_index(&self) -> Result<bool, CatalogError> {
        if self.backend.index_exists(&self.index).await? {
            tracing::info!("Index '{}' already exists", self.index);
            return Ok(false);
        }
        self.backend
            .create_index(&self.index, &product_index_definition())
            .await?;
        tracing::info!("Index '{}' created successfully", self.index);
        Ok(true)
    }

    pub async fn create(&self, input: ProductInput) -> Result<Product, CatalogError> {
        let product = input.into_product(Utc::now()).map_err(|errors| {
            CatalogError::Validation(ValidationReport {
                product_id: None,
                errors,
            })
        })?;

        let document = product.to_document()?;
        self.backend
            .index_document(&self.index, &product.id, &document)
            .await?;

        tracing::info!("Product indexed successfully: {}", product.id);
        Ok(product)
    }

    pub async fn get(&self, id: &str) -> Result<Product, CatalogError> {
        let source = self
            .backend
            .get_document(&self.index, id)
            .await
            .map_err(|err| lookup_error(id, err))?;
        Ok(Product::from_document(id, source)?)
    }

    pub async fn list(&self, pagination: Pagination) -> Result<ProductListPage, CatalogError> {
        let request = build_list_request(pagination);
        let response = self.backend.search(&self.index, &request).await?;
        Ok(shape_list_page(response, pagination)?)
    }

    pub async fn search(
        &self,
        text: Option<&str>,
        filters: &SearchFilterSet,
        pagination: Pagination,
    ) -> Result<SearchResult, CatalogError> {
        let request = build_search_request(text, filters, pagination);
        let response = self.backend.search(&self.index, &request).await?;
        let result = shape_search_result(response, pagination)?;

        tracing::debug!(
            "Search {:?} returned {} of {} products",
            text,
            result.products.len(),
            result.total
        );
        Ok(result)
    }

    /// Replaces the stored product with `patch` applied over it.
    pub async fn update(&self, id: &str, patch: ProductPatch) -> Result<Product, CatalogError> {
        let existing = self.get(id).await?;
        let updated = patch.apply(existing, Utc::now());

        validation::validate_product(&updated).map_err(|errors| {
            CatalogError::Validation(ValidationReport {
                product_id: None,
                errors,
            })
        })?;

        let document = updated.to_document()?;
        self.backend
            .index_document(&self.index, id, &document)
            .await?;

        tracing::info!("Product updated successfully: {}", id);
        Ok(updated)
    }

    pub async fn delete(&self, id: &str) -> Result<(), CatalogError> {
        self.backend
            .delete_document(&self.index, id)
            .await
            .map_err(|err| lookup_error(id, err))?;
        tracing::info!("Product deleted successfully: {}", id);
        Ok(())
    }

    /// Validates every product, then writes them all in one bulk call.
    /// Returns the number of products written.
    pub async fn bulk_create(&self, inputs: Vec<ProductInput>) -> Result<usize, CatalogError> {
        if inputs.is_empty() {
            return Err(CatalogError::BadRequest(
                "Products array is required and must not be empty".to_string(),
            ));
        }
        if inputs.len() > MAX_BULK_PRODUCTS {
            return Err(CatalogError::BadRequest(format!(
                "Cannot bulk index more than {} products at once",
                MAX_BULK_PRODUCTS
            )));
        }

        let now = Utc::now();
        let mut documents: Vec<(String, Value)> = Vec::with_capacity(inputs.len());
        for mut input in inputs {
            let id = input.ensure_id().to_string();
            let product = input.into_product(now).map_err(|errors| {
                CatalogError::Validation(ValidationReport {
                    product_id: Some(id.clone()),
                    errors,
                })
            })?;
            documents.push((id, product.to_document()?));
        }

        let outcomes = self.backend.bulk_index(&self.index, &documents).await?;
        let failures: Vec<_> = outcomes
            .into_iter()
            .filter(|outcome| outcome.error.is_some())
            .collect();
        if !failures.is_empty() {
            return Err(CatalogError::BulkWrite(failures));
        }

        tracing::info!("Bulk indexed {} products successfully", documents.len());
        Ok(documents.len())
    }

    pub async fn index_stats(&self) -> Result<IndexStats, CatalogError> {
        let stats = self.backend.index_stats(&self.index).await?;
        Ok(IndexStats::from_raw(&self.index, stats))
    }

    pub async fn delete_index(&self) -> Result<(), CatalogError> {
        self.backend.delete_index(&self.index).await?;
        tracing::info!("Index '{}' deleted successfully", self.index);
        Ok(())
    }
}
