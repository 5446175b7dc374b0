//! Search Service Wire Protocol
//!
//! Defines the request and response bodies exchanged with the search service.
//!
//! The query types mirror the Elasticsearch query DSL closely enough that
//! serializing a [`SearchRequest`] produces a body the cluster accepts as-is,
//! while the in-memory backend can walk the same structures directly.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

// --- REST Endpoints ---

/// Single-document API segment (`/{index}/_doc/{id}`).
pub const ENDPOINT_DOC: &str = "_doc";
/// Search API segment (`/{index}/_search`).
pub const ENDPOINT_SEARCH: &str = "_search";
/// Cluster-wide bulk API.
pub const ENDPOINT_BULK: &str = "/_bulk";
/// Index statistics segment (`/{index}/_stats`).
pub const ENDPOINT_STATS: &str = "_stats";

// --- Query DSL ---

/// A query clause.
///
/// Externally tagged, so `Query::MatchAll {}` serializes as `{"match_all":{}}`
/// and `Query::Term` as `{"term":{"category":"Electronics"}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Query {
    MatchAll {},
    Bool(BoolQuery),
    MultiMatch(MultiMatchQuery),
    Term(BTreeMap<String, String>),
    Range(BTreeMap<String, RangeBounds>),
}

impl Query {
    pub fn term(field: &str, value: impl Into<String>) -> Self {
        Query::Term(BTreeMap::from([(field.to_string(), value.into())]))
    }

    pub fn range(field: &str, bounds: RangeBounds) -> Self {
        Query::Range(BTreeMap::from([(field.to_string(), bounds)]))
    }
}

/// Boolean combination: every `must` clause contributes to the score,
/// every `filter` clause has to match but does not score.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoolQuery {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub must: Vec<Query>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filter: Vec<Query>,
}

/// Full-text match over several fields. Field names may carry a `^boost` suffix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiMatchQuery {
    pub query: String,
    pub fields: Vec<String>,
    #[serde(rename = "type")]
    pub match_type: String,
    pub fuzziness: String,
}

/// Numeric bounds of a range clause. Unset bounds are omitted on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RangeBounds {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gt: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gte: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lt: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lte: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub order: SortOrder,
}

/// One sort key, e.g. `{"createdAt":{"order":"desc"}}`. `_score` sorts by relevance.
pub type SortClause = BTreeMap<String, SortSpec>;

pub fn sort_by(field: &str, order: SortOrder) -> SortClause {
    BTreeMap::from([(field.to_string(), SortSpec { order })])
}

/// Aggregation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    Terms { field: String },
    Range { field: String, ranges: Vec<RangeBucketSpec> },
}

/// A range bucket: `from` inclusive, `to` exclusive; a missing side is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeBucketSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<f64>,
}

/// Complete body of a search call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: Query,
    pub sort: Vec<SortClause>,
    pub from: u64,
    pub size: u64,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub aggs: BTreeMap<String, Aggregation>,
}

// --- Responses ---

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub hits: Hits,
    #[serde(default)]
    pub aggregations: BTreeMap<String, AggregationResult>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Hits {
    pub total: HitsTotal,
    #[serde(default)]
    pub hits: Vec<Hit>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HitsTotal {
    pub value: u64,
}

/// A single ranked document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_score", default)]
    pub score: Option<f64>,
    #[serde(rename = "_source")]
    pub source: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregationResult {
    #[serde(default)]
    pub buckets: Vec<Bucket>,
}

/// A term bucket (`key` is the term) or a range bucket (`key` is `"from-to"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    pub key: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<f64>,
    pub doc_count: u64,
}

/// Body of `GET /{index}/_doc/{id}`.
#[derive(Debug, Deserialize)]
pub struct GetResponse {
    #[serde(default)]
    pub found: bool,
    #[serde(rename = "_source", default)]
    pub source: Option<Value>,
}

/// Body of `POST /_bulk`.
#[derive(Debug, Deserialize)]
pub struct BulkResponse {
    pub errors: bool,
    #[serde(default)]
    pub items: Vec<BTreeMap<String, BulkItemStatus>>,
}

#[derive(Debug, Deserialize)]
pub struct BulkItemStatus {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub status: u16,
    #[serde(default)]
    pub error: Option<BulkItemError>,
}

#[derive(Debug, Deserialize)]
pub struct BulkItemError {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Per-document result of a bulk write, backend independent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkItemOutcome {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Body of `GET /`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterInfo {
    pub cluster_name: String,
    pub version: ClusterVersion,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterVersion {
    pub number: String,
}
