//! Search request construction.
//!
//! Both builders are pure: the same inputs always produce the same request,
//! and nothing here touches the network.

use std::collections::BTreeMap;

use super::types::{Pagination, SearchFilterSet};
use crate::engine::protocol::{
    Aggregation, BoolQuery, MultiMatchQuery, Query, RangeBounds, RangeBucketSpec, SearchRequest,
    SortOrder, sort_by,
};

/// Text fields searched by free-text queries, with their boosts.
pub const TEXT_FIELDS: [&str; 4] = ["name^3", "description^2", "category.text", "brand.text"];

pub const AGG_CATEGORIES: &str = "categories";
pub const AGG_BRANDS: &str = "brands";
pub const AGG_PRICE_RANGES: &str = "price_ranges";

/// Price histogram boundaries: [0,50), [50,100), [100,200), [200,∞).
pub const PRICE_BUCKETS: [(Option<f64>, Option<f64>); 4] = [
    (Some(0.0), Some(50.0)),
    (Some(50.0), Some(100.0)),
    (Some(100.0), Some(200.0)),
    (Some(200.0), None),
];

/// Builds the product search request for a text query, filters and page.
///
/// Without text and without filters the query degrades to `match_all`.
/// Hits are ordered by relevance, then newest first.
pub fn build_search_request(
    text: Option<&str>,
    filters: &SearchFilterSet,
    pagination: Pagination,
) -> SearchRequest {
    let must: Vec<Query> = text_clause(text).into_iter().collect();
    let filter = filter_clauses(filters);

    let query = if must.is_empty() && filter.is_empty() {
        Query::MatchAll {}
    } else {
        Query::Bool(BoolQuery { must, filter })
    };

    SearchRequest {
        query,
        sort: vec![
            sort_by("_score", SortOrder::Desc),
            sort_by("createdAt", SortOrder::Desc),
        ],
        from: pagination.offset(),
        size: u64::from(pagination.size()),
        aggs: facet_aggregations(),
    }
}

/// Builds the plain listing request: everything, newest first, no facets.
pub fn build_list_request(pagination: Pagination) -> SearchRequest {
    SearchRequest {
        query: Query::MatchAll {},
        sort: vec![sort_by("createdAt", SortOrder::Desc)],
        from: pagination.offset(),
        size: u64::from(pagination.size()),
        aggs: BTreeMap::new(),
    }
}

fn text_clause(text: Option<&str>) -> Option<Query> {
    let text = text?;
    if text.trim().is_empty() {
        return None;
    }
    Some(Query::MultiMatch(MultiMatchQuery {
        query: text.to_string(),
        fields: TEXT_FIELDS.iter().map(|f| f.to_string()).collect(),
        match_type: "best_fields".to_string(),
        fuzziness: "AUTO".to_string(),
    }))
}

fn filter_clauses(filters: &SearchFilterSet) -> Vec<Query> {
    let mut clauses = Vec::new();

    if let Some(category) = &filters.category {
        clauses.push(Query::term("category", category.as_str()));
    }

    if let Some(brand) = &filters.brand {
        clauses.push(Query::term("brand", brand.as_str()));
    }

    if filters.min_price.is_some() || filters.max_price.is_some() {
        clauses.push(Query::range(
            "price",
            RangeBounds {
                gte: filters.min_price,
                lte: filters.max_price,
                ..RangeBounds::default()
            },
        ));
    }

    if let Some(min_rating) = filters.min_rating {
        clauses.push(Query::range(
            "rating",
            RangeBounds {
                gte: Some(min_rating),
                ..RangeBounds::default()
            },
        ));
    }

    // `in_stock == Some(false)` intentionally adds nothing.
    if filters.in_stock == Some(true) {
        clauses.push(Query::range(
            "stock",
            RangeBounds {
                gt: Some(0.0),
                ..RangeBounds::default()
            },
        ));
    }

    clauses
}

fn facet_aggregations() -> BTreeMap<String, Aggregation> {
    BTreeMap::from([
        (
            AGG_CATEGORIES.to_string(),
            Aggregation::Terms {
                field: "category".to_string(),
            },
        ),
        (
            AGG_BRANDS.to_string(),
            Aggregation::Terms {
                field: "brand".to_string(),
            },
        ),
        (
            AGG_PRICE_RANGES.to_string(),
            Aggregation::Range {
                field: "price".to_string(),
                ranges: PRICE_BUCKETS
                    .iter()
                    .map(|&(from, to)| RangeBucketSpec { from, to })
                    .collect(),
            },
        ),
    ])
}
