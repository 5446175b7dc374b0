use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::catalog::types::Product;
use crate::error::CatalogError;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Structured search filters. Every field is optional; present fields are ANDed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilterSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_rating: Option<f64>,
    /// `Some(true)` restricts to products with stock. `Some(false)` adds no constraint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_stock: Option<bool>,
}

/// A validated page request: `page >= 1`, `1 <= size <= 100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: u32,
    size: u32,
}

impl Pagination {
    pub fn new(page: u32, size: u32) -> Result<Self, CatalogError> {
        if page < 1 || size < 1 || size > MAX_PAGE_SIZE {
            return Err(CatalogError::BadRequest(format!(
                "Page must be >= 1, size must be between 1 and {}",
                MAX_PAGE_SIZE
            )));
        }
        Ok(Self { page, size })
    }

    /// Applies defaults for parameters the caller left out.
    pub fn from_params(page: Option<u32>, size: Option<u32>) -> Result<Self, CatalogError> {
        Self::new(
            page.unwrap_or(DEFAULT_PAGE),
            size.unwrap_or(DEFAULT_PAGE_SIZE),
        )
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Zero-based number of hits to skip.
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.size)
    }

    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(u64::from(self.size))
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TermBucket {
    pub key: String,
    pub doc_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PriceRangeBucket {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<f64>,
    pub doc_count: u64,
}

/// The three facets returned with every search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchAggregations {
    pub categories: Vec<TermBucket>,
    pub brands: Vec<TermBucket>,
    pub price_ranges: Vec<PriceRangeBucket>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub products: Vec<Product>,
    pub total: u64,
    pub page: u32,
    pub size: u32,
    pub total_pages: u64,
    pub aggregations: SearchAggregations,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductListPage {
    pub products: Vec<Product>,
    pub total: u64,
    pub page: u32,
    pub size: u32,
    pub total_pages: u64,
}
