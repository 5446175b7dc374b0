//! Turns raw search responses into catalog results.

use serde_json::Value;

use super::query::{AGG_BRANDS, AGG_CATEGORIES, AGG_PRICE_RANGES};
use super::types::{
    Pagination, PriceRangeBucket, ProductListPage, SearchAggregations, SearchResult, TermBucket,
};
use crate::catalog::types::Product;
use crate::engine::protocol::{AggregationResult, Bucket, Hit, SearchResponse};

pub fn shape_search_result(
    response: SearchResponse,
    pagination: Pagination,
) -> Result<SearchResult, serde_json::Error> {
    let total = response.hits.total.value;
    let aggregations = SearchAggregations {
        categories: term_buckets(response.aggregations.get(AGG_CATEGORIES)),
        brands: term_buckets(response.aggregations.get(AGG_BRANDS)),
        price_ranges: price_buckets(response.aggregations.get(AGG_PRICE_RANGES)),
    };

    Ok(SearchResult {
        products: products_from_hits(response.hits.hits)?,
        total,
        page: pagination.page(),
        size: pagination.size(),
        total_pages: pagination.total_pages(total),
        aggregations,
    })
}

pub fn shape_list_page(
    response: SearchResponse,
    pagination: Pagination,
) -> Result<ProductListPage, serde_json::Error> {
    let total = response.hits.total.value;
    Ok(ProductListPage {
        products: products_from_hits(response.hits.hits)?,
        total,
        page: pagination.page(),
        size: pagination.size(),
        total_pages: pagination.total_pages(total),
    })
}

fn products_from_hits(hits: Vec<Hit>) -> Result<Vec<Product>, serde_json::Error> {
    hits.into_iter()
        .map(|hit| Product::from_document(&hit.id, hit.source))
        .collect()
}

fn bucket_key(bucket: &Bucket) -> String {
    match &bucket.key {
        Value::String(key) => key.clone(),
        other => other.to_string(),
    }
}

fn term_buckets(result: Option<&AggregationResult>) -> Vec<TermBucket> {
    result
        .map(|result| {
            result
                .buckets
                .iter()
                .map(|bucket| TermBucket {
                    key: bucket_key(bucket),
                    doc_count: bucket.doc_count,
                })
                .collect()
        })
        .unwrap_or_default()
}

fn price_buckets(result: Option<&AggregationResult>) -> Vec<PriceRangeBucket> {
    result
        .map(|result| {
            result
                .buckets
                .iter()
                .map(|bucket| PriceRangeBucket {
                    key: bucket_key(bucket),
                    from: bucket.from,
                    to: bucket.to,
                    doc_count: bucket.doc_count,
                })
                .collect()
        })
        .unwrap_or_default()
}
