//! In-memory search backend.
//!
//! Documents live in a `DashMap` per index. Searches are evaluated by walking the
//! query DSL directly: filters are exact, `multi_match` scores each field by the number
//! of query terms it contains (with edit-distance tolerance) times the field boost and
//! keeps the best field. Good enough to exercise the catalog end to end without a cluster.

use async_trait::async_trait;
use chrono::DateTime;
use dashmap::DashMap;
use serde_json::{Value, json};
use std::cmp::Ordering;
use std::collections::HashMap;

use super::protocol::*;
use super::{BackendError, SearchBackend};

/// Buckets returned by a terms aggregation, as the cluster does by default.
const TERMS_AGGREGATION_SIZE: usize = 10;

pub struct MemoryBackend {
    indices: DashMap<String, DashMap<String, Value>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self {
            indices: DashMap::new(),
        }
    }

    pub fn store_local(&self, index: &str, id: String, document: Value) {
        let index_map = self
            .indices
            .entry(index.to_string())
            .or_insert_with(DashMap::new);
        index_map.insert(id, document);
    }

    /// Snapshot of every stored document, for test inspection.
    #[cfg(test)]
    pub fn dump_index(&self, index: &str) -> Vec<(String, Value)> {
        let mut entries = Vec::new();
        if let Some(index_map) = self.indices.get(index) {
            for entry in index_map.iter() {
                entries.push((entry.key().clone(), entry.value().clone()));
            }
        }
        entries
    }

    #[cfg(test)]
    pub fn local_entry_count(&self, index: &str) -> usize {
        self.indices
            .get(index)
            .map(|index_map| index_map.len())
            .unwrap_or(0)
    }

    fn not_found(index: &str, id: &str) -> BackendError {
        BackendError::DocumentNotFound {
            index: index.to_string(),
            id: id.to_string(),
        }
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SearchBackend for MemoryBackend {
    async fn cluster_info(&self) -> Result<ClusterInfo, BackendError> {
        Ok(ClusterInfo {
            cluster_name: "in-memory".to_string(),
            version: ClusterVersion {
                number: env!("CARGO_PKG_VERSION").to_string(),
            },
        })
    }

    async fn index_exists(&self, index: &str) -> Result<bool, BackendError> {
        Ok(self.indices.contains_key(index))
    }

    async fn create_index(&self, index: &str, _definition: &Value) -> Result<(), BackendError> {
        if self.indices.contains_key(index) {
            return Err(BackendError::Status {
                status: 400,
                body: format!("resource_already_exists_exception: index [{}]", index),
            });
        }
        self.indices.insert(index.to_string(), DashMap::new());
        tracing::info!("Created in-memory index '{}'", index);
        Ok(())
    }

    async fn delete_index(&self, index: &str) -> Result<(), BackendError> {
        self.indices
            .remove(index)
            .map(|_| ())
            .ok_or_else(|| BackendError::IndexNotFound(index.to_string()))
    }

    async fn index_stats(&self, index: &str) -> Result<Value, BackendError> {
        let index_map = self
            .indices
            .get(index)
            .ok_or_else(|| BackendError::IndexNotFound(index.to_string()))?;

        let mut size_in_bytes = 0usize;
        for entry in index_map.iter() {
            size_in_bytes += serde_json::to_vec(entry.value())?.len();
        }

        Ok(json!({
            "total": {
                "docs": { "count": index_map.len() },
                "store": { "size_in_bytes": size_in_bytes }
            }
        }))
    }

    async fn index_document(
        &self,
        index: &str,
        id: &str,
        document: &Value,
    ) -> Result<(), BackendError> {
        self.store_local(index, id.to_string(), document.clone());
        Ok(())
    }

    async fn get_document(&self, index: &str, id: &str) -> Result<Value, BackendError> {
        if let Some(index_map) = self.indices.get(index)
            && let Some(document) = index_map.get(id)
        {
            return Ok(document.value().clone());
        }
        Err(Self::not_found(index, id))
    }

    async fn delete_document(&self, index: &str, id: &str) -> Result<(), BackendError> {
        self.indices
            .get(index)
            .and_then(|index_map| index_map.remove(id))
            .map(|_| ())
            .ok_or_else(|| Self::not_found(index, id))
    }

    async fn search(
        &self,
        index: &str,
        request: &SearchRequest,
    ) -> Result<SearchResponse, BackendError> {
        let index_map = self
            .indices
            .get(index)
            .ok_or_else(|| BackendError::IndexNotFound(index.to_string()))?;

        let mut matched: Vec<Hit> = index_map
            .iter()
            .filter_map(|entry| {
                evaluate(&request.query, entry.value()).map(|score| Hit {
                    id: entry.key().clone(),
                    score: Some(score),
                    source: entry.value().clone(),
                })
            })
            .collect();
        drop(index_map);

        matched.sort_by(|a, b| compare_hits(a, b, &request.sort));

        let aggregations = request
            .aggs
            .iter()
            .map(|(name, aggregation)| (name.clone(), aggregate(aggregation, &matched)))
            .collect();

        let total = matched.len() as u64;
        let hits = matched
            .into_iter()
            .skip(request.from as usize)
            .take(request.size as usize)
            .collect();

        Ok(SearchResponse {
            hits: Hits {
                total: HitsTotal { value: total },
                hits,
            },
            aggregations,
        })
    }

    async fn bulk_index(
        &self,
        index: &str,
        documents: &[(String, Value)],
    ) -> Result<Vec<BulkItemOutcome>, BackendError> {
        let mut outcomes = Vec::with_capacity(documents.len());
        for (id, document) in documents {
            self.store_local(index, id.clone(), document.clone());
            outcomes.push(BulkItemOutcome {
                id: id.clone(),
                error: None,
            });
        }
        Ok(outcomes)
    }
}

/// Returns the score of `doc` under `query`, or `None` when it does not match.
fn evaluate(query: &Query, doc: &Value) -> Option<f64> {
    match query {
        Query::MatchAll {} => Some(1.0),
        Query::Bool(bool_query) => {
            if !bool_query
                .filter
                .iter()
                .all(|clause| evaluate(clause, doc).is_some())
            {
                return None;
            }
            let mut score = 0.0;
            for clause in &bool_query.must {
                score += evaluate(clause, doc)?;
            }
            Some(score)
        }
        Query::MultiMatch(multi_match) => multi_match_score(multi_match, doc),
        Query::Term(terms) => terms
            .iter()
            .all(|(field, expected)| {
                field_values(doc, field)
                    .iter()
                    .any(|value| value.as_str() == Some(expected.as_str()))
            })
            .then_some(1.0),
        Query::Range(ranges) => ranges
            .iter()
            .all(|(field, bounds)| {
                field_values(doc, field)
                    .iter()
                    .filter_map(|value| value.as_f64())
                    .any(|value| within(bounds, value))
            })
            .then_some(1.0),
    }
}

fn within(bounds: &RangeBounds, value: f64) -> bool {
    bounds.gt.is_none_or(|b| value > b)
        && bounds.gte.is_none_or(|b| value >= b)
        && bounds.lt.is_none_or(|b| value < b)
        && bounds.lte.is_none_or(|b| value <= b)
}

fn multi_match_score(query: &MultiMatchQuery, doc: &Value) -> Option<f64> {
    let terms = tokenize(&query.query);
    if terms.is_empty() {
        return None;
    }

    let best = query
        .fields
        .iter()
        .map(|field| {
            let (path, boost) = parse_boost(field);
            let tokens: Vec<String> = field_values(doc, path)
                .iter()
                .filter_map(|value| value.as_str())
                .flat_map(tokenize)
                .collect();
            let matched = terms
                .iter()
                .filter(|term| {
                    tokens
                        .iter()
                        .any(|token| fuzzy_matches(term, token, &query.fuzziness))
                })
                .count();
            matched as f64 * boost
        })
        .fold(0.0, f64::max);

    (best > 0.0).then_some(best)
}

/// Splits `name^3` into (`name`, 3.0).
fn parse_boost(field: &str) -> (&str, f64) {
    match field.split_once('^') {
        Some((path, boost)) => (path, boost.parse().unwrap_or(1.0)),
        None => (field, 1.0),
    }
}

fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_string)
        .collect()
}

/// `AUTO` allows no edits up to two characters, one up to five, two beyond.
fn allowed_edits(term: &str, fuzziness: &str) -> usize {
    if fuzziness.eq_ignore_ascii_case("AUTO") {
        match term.chars().count() {
            0..=2 => 0,
            3..=5 => 1,
            _ => 2,
        }
    } else {
        fuzziness.parse().unwrap_or(0)
    }
}

fn fuzzy_matches(term: &str, token: &str, fuzziness: &str) -> bool {
    term == token || edit_distance(term, token) <= allowed_edits(term, fuzziness)
}

fn edit_distance(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut previous: Vec<usize> = (0..=b.len()).collect();

    for (i, ca) in a.chars().enumerate() {
        let mut current = vec![i + 1; b.len() + 1];
        for (j, cb) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(ca != *cb);
            current[j + 1] = substitution.min(previous[j + 1] + 1).min(current[j] + 1);
        }
        previous = current;
    }

    previous[b.len()]
}

/// Resolves a dotted field path. Sub-fields such as `category.text` are views of
/// the root field, so an unresolved path falls back to its first segment.
fn resolve<'a>(doc: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(doc, |value, segment| value.get(segment))
        .or_else(|| path.split('.').next().and_then(|root| doc.get(root)))
}

fn field_values<'a>(doc: &'a Value, path: &str) -> Vec<&'a Value> {
    match resolve(doc, path) {
        Some(Value::Array(items)) => items.iter().collect(),
        Some(Value::Null) | None => Vec::new(),
        Some(value) => vec![value],
    }
}

#[derive(Debug, PartialEq, PartialOrd)]
enum SortKey {
    Number(f64),
    Text(String),
}

fn sort_key(hit: &Hit, field: &str) -> Option<SortKey> {
    if field == "_score" {
        return hit.score.map(SortKey::Number);
    }
    match field_values(&hit.source, field).first()? {
        Value::Number(n) => n.as_f64().map(SortKey::Number),
        Value::String(s) => Some(match DateTime::parse_from_rfc3339(s) {
            Ok(timestamp) => SortKey::Number(timestamp.timestamp_micros() as f64),
            Err(_) => SortKey::Text(s.clone()),
        }),
        Value::Bool(b) => Some(SortKey::Number(f64::from(u8::from(*b)))),
        _ => None,
    }
}

/// Missing values sort last regardless of direction.
fn compare_hits(a: &Hit, b: &Hit, sort: &[SortClause]) -> Ordering {
    for clause in sort {
        for (field, spec) in clause {
            let ordering = match (sort_key(a, field), sort_key(b, field)) {
                (Some(x), Some(y)) => {
                    let ordering = x.partial_cmp(&y).unwrap_or(Ordering::Equal);
                    match spec.order {
                        SortOrder::Asc => ordering,
                        SortOrder::Desc => ordering.reverse(),
                    }
                }
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
    }
    Ordering::Equal
}

fn aggregate(aggregation: &Aggregation, hits: &[Hit]) -> AggregationResult {
    match aggregation {
        Aggregation::Terms { field } => {
            let mut counts: HashMap<String, u64> = HashMap::new();
            for hit in hits {
                for value in field_values(&hit.source, field) {
                    let key = match value {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    };
                    *counts.entry(key).or_insert(0) += 1;
                }
            }

            let mut buckets: Vec<Bucket> = counts
                .into_iter()
                .map(|(key, doc_count)| Bucket {
                    key: Value::String(key),
                    from: None,
                    to: None,
                    doc_count,
                })
                .collect();
            buckets.sort_by(|a, b| {
                b.doc_count
                    .cmp(&a.doc_count)
                    .then_with(|| a.key.as_str().cmp(&b.key.as_str()))
            });
            buckets.truncate(TERMS_AGGREGATION_SIZE);
            AggregationResult { buckets }
        }
        Aggregation::Range { field, ranges } => {
            let buckets = ranges
                .iter()
                .map(|spec| {
                    let doc_count = hits
                        .iter()
                        .filter(|hit| {
                            field_values(&hit.source, field)
                                .iter()
                                .filter_map(|value| value.as_f64())
                                .any(|value| {
                                    spec.from.is_none_or(|from| value >= from)
                                        && spec.to.is_none_or(|to| value < to)
                                })
                        })
                        .count() as u64;
                    Bucket {
                        key: Value::String(range_key(spec)),
                        from: spec.from,
                        to: spec.to,
                        doc_count,
                    }
                })
                .collect();
            AggregationResult { buckets }
        }
    }
}

/// Range bucket key in the cluster's format, e.g. `50.0-100.0` or `200.0-*`.
fn range_key(spec: &RangeBucketSpec) -> String {
    let bound = |value: Option<f64>| match value {
        Some(v) => format!("{:?}", v),
        None => "*".to_string(),
    };
    format!("{}-{}", bound(spec.from), bound(spec.to))
}
