//! Search Module Tests
//!
//! Validates request construction and result reshaping.
//!
//! ## Test Scopes
//! - **Pagination**: Defaults, bounds and offset arithmetic.
//! - **Query Builder**: Text relevance, filter clauses, sorting and facets.
//! - **Result Shaping**: Hits and buckets mapped onto catalog types.
//! - **Parameters**: Query string normalization into a filter set.

#[cfg(test)]
mod tests {
    use crate::engine::protocol::{
        AggregationResult, Bucket, Hit, Hits, HitsTotal, Query, RangeBounds, SearchResponse,
        SortOrder,
    };
    use crate::error::CatalogError;
    use crate::search::handlers::SearchParams;
    use crate::search::query::{
        AGG_BRANDS, AGG_CATEGORIES, AGG_PRICE_RANGES, TEXT_FIELDS, build_list_request,
        build_search_request,
    };
    use crate::search::results::{shape_list_page, shape_search_result};
    use crate::search::types::{Pagination, SearchFilterSet};
    use serde_json::json;
    use std::collections::BTreeMap;

    fn filter_clauses(query: &Query) -> Vec<Query> {
        match query {
            Query::Bool(bool_query) => bool_query.filter.clone(),
            _ => vec![],
        }
    }

    fn product_source(id: &str) -> serde_json::Value {
        json!({
            "id": id,
            "name": "Desk Lamp",
            "description": "Adjustable LED desk lamp",
            "category": "home",
            "brand": "Lumo",
            "price": 39.9,
            "stock": 3,
            "rating": 4.2,
            "tags": ["lighting"],
            "images": [],
            "createdAt": "2024-05-01T10:00:00Z",
            "updatedAt": "2024-05-01T10:00:00Z"
        })
    }

    // ============================================================
    // PAGINATION TESTS
    // ============================================================

    #[test]
    fn test_pagination_defaults() {
        let pagination = Pagination::from_params(None, None).unwrap();

        assert_eq!(pagination.page(), 1);
        assert_eq!(pagination.size(), 10);
        assert_eq!(pagination.offset(), 0);
        assert_eq!(pagination, Pagination::default());
    }

    #[test]
    fn test_pagination_offset() {
        let pagination = Pagination::new(3, 20).unwrap();
        assert_eq!(pagination.offset(), 40);
    }

    #[test]
    fn test_pagination_rejects_out_of_range() {
        assert!(matches!(
            Pagination::new(0, 10),
            Err(CatalogError::BadRequest(_))
        ));
        assert!(Pagination::new(1, 0).is_err());
        assert!(Pagination::new(1, 101).is_err());
        assert!(Pagination::new(1, 100).is_ok());
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let pagination = Pagination::new(1, 10).unwrap();

        assert_eq!(pagination.total_pages(0), 0);
        assert_eq!(pagination.total_pages(10), 1);
        assert_eq!(pagination.total_pages(11), 2);
    }

    // ============================================================
    // QUERY BUILDER TESTS
    // ============================================================

    #[test]
    fn test_empty_input_is_match_all() {
        let request = build_search_request(None, &SearchFilterSet::default(), Pagination::default());
        assert_eq!(request.query, Query::MatchAll {});

        // Blank text counts as no text
        let request =
            build_search_request(Some("   "), &SearchFilterSet::default(), Pagination::default());
        assert_eq!(request.query, Query::MatchAll {});
    }

    #[test]
    fn test_text_query_targets_boosted_fields() {
        let request =
            build_search_request(Some("laptop"), &SearchFilterSet::default(), Pagination::default());

        let Query::Bool(bool_query) = &request.query else {
            panic!("Expected a bool query, got {:?}", request.query);
        };
        assert!(bool_query.filter.is_empty());
        assert_eq!(bool_query.must.len(), 1);

        let Query::MultiMatch(multi_match) = &bool_query.must[0] else {
            panic!("Expected multi_match in must");
        };
        assert_eq!(multi_match.query, "laptop");
        assert_eq!(multi_match.fields, TEXT_FIELDS.to_vec());
        assert_eq!(multi_match.match_type, "best_fields");
        assert_eq!(multi_match.fuzziness, "AUTO");
    }

    #[test]
    fn test_category_only_filter() {
        let filters = SearchFilterSet {
            category: Some("electronics".to_string()),
            ..SearchFilterSet::default()
        };
        let request = build_search_request(None, &filters, Pagination::default());

        assert_eq!(
            filter_clauses(&request.query),
            vec![Query::term("category", "electronics")]
        );
    }

    #[test]
    fn test_price_range_is_a_single_clause() {
        let filters = SearchFilterSet {
            min_price: Some(10.0),
            max_price: Some(99.5),
            ..SearchFilterSet::default()
        };
        let request = build_search_request(None, &filters, Pagination::default());

        assert_eq!(
            filter_clauses(&request.query),
            vec![Query::range(
                "price",
                RangeBounds {
                    gte: Some(10.0),
                    lte: Some(99.5),
                    ..RangeBounds::default()
                }
            )]
        );
    }

    #[test]
    fn test_every_filter_combined() {
        let filters = SearchFilterSet {
            category: Some("electronics".to_string()),
            brand: Some("Apple".to_string()),
            min_price: Some(500.0),
            max_price: None,
            min_rating: Some(4.0),
            in_stock: Some(true),
        };
        let request = build_search_request(Some("phone"), &filters, Pagination::default());
        let clauses = filter_clauses(&request.query);

        assert_eq!(clauses.len(), 5);
        assert!(clauses.contains(&Query::term("brand", "Apple")));
        assert!(clauses.contains(&Query::range(
            "rating",
            RangeBounds {
                gte: Some(4.0),
                ..RangeBounds::default()
            }
        )));
        assert!(clauses.contains(&Query::range(
            "stock",
            RangeBounds {
                gt: Some(0.0),
                ..RangeBounds::default()
            }
        )));
    }

    #[test]
    fn test_in_stock_false_adds_no_constraint() {
        let filters = SearchFilterSet {
            in_stock: Some(false),
            ..SearchFilterSet::default()
        };
        let request = build_search_request(None, &filters, Pagination::default());

        assert_eq!(request.query, Query::MatchAll {});
    }

    #[test]
    fn test_search_pagination_and_sort() {
        let pagination = Pagination::new(3, 20).unwrap();
        let request = build_search_request(None, &SearchFilterSet::default(), pagination);

        assert_eq!(request.from, 40);
        assert_eq!(request.size, 20);

        let fields: Vec<(&String, SortOrder)> = request
            .sort
            .iter()
            .flat_map(|clause| clause.iter().map(|(field, spec)| (field, spec.order)))
            .collect();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].0, "_score");
        assert_eq!(fields[1].0, "createdAt");
        assert!(fields.iter().all(|(_, order)| *order == SortOrder::Desc));
    }

    #[test]
    fn test_search_always_requests_facets() {
        let request = build_search_request(None, &SearchFilterSet::default(), Pagination::default());

        let names: Vec<&str> = request.aggs.keys().map(String::as_str).collect();
        assert!(names.contains(&AGG_CATEGORIES));
        assert!(names.contains(&AGG_BRANDS));
        assert!(names.contains(&AGG_PRICE_RANGES));

        let value = serde_json::to_value(&request).unwrap();
        let ranges = &value["aggs"][AGG_PRICE_RANGES]["range"]["ranges"];
        assert_eq!(
            ranges,
            &json!([
                { "from": 0.0, "to": 50.0 },
                { "from": 50.0, "to": 100.0 },
                { "from": 100.0, "to": 200.0 },
                { "from": 200.0 }
            ])
        );
    }

    #[test]
    fn test_builder_is_deterministic() {
        let filters = SearchFilterSet {
            brand: Some("Lumo".to_string()),
            min_rating: Some(3.5),
            ..SearchFilterSet::default()
        };
        let first = build_search_request(Some("lamp"), &filters, Pagination::default());
        let second = build_search_request(Some("lamp"), &filters, Pagination::default());

        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_list_request_has_no_facets() {
        let request = build_list_request(Pagination::new(2, 5).unwrap());

        assert_eq!(request.query, Query::MatchAll {});
        assert_eq!(request.from, 5);
        assert!(request.aggs.is_empty());
        assert_eq!(request.sort.len(), 1);
        assert!(request.sort[0].contains_key("createdAt"));
    }

    // ============================================================
    // RESULT SHAPING TESTS
    // ============================================================

    #[test]
    fn test_shape_search_result() {
        let mut aggregations = BTreeMap::new();
        aggregations.insert(
            AGG_CATEGORIES.to_string(),
            AggregationResult {
                buckets: vec![Bucket {
                    key: json!("home"),
                    from: None,
                    to: None,
                    doc_count: 21,
                }],
            },
        );
        aggregations.insert(
            AGG_PRICE_RANGES.to_string(),
            AggregationResult {
                buckets: vec![Bucket {
                    key: json!("0.0-50.0"),
                    from: Some(0.0),
                    to: Some(50.0),
                    doc_count: 21,
                }],
            },
        );
        let response = SearchResponse {
            hits: Hits {
                total: HitsTotal { value: 21 },
                hits: vec![Hit {
                    id: "lamp-1".to_string(),
                    score: Some(2.0),
                    source: product_source("lamp-1"),
                }],
            },
            aggregations,
        };

        let result = shape_search_result(response, Pagination::new(2, 10).unwrap()).unwrap();

        assert_eq!(result.total, 21);
        assert_eq!(result.page, 2);
        assert_eq!(result.total_pages, 3);
        assert_eq!(result.products[0].id, "lamp-1");
        assert_eq!(result.aggregations.categories[0].key, "home");
        assert_eq!(result.aggregations.price_ranges[0].to, Some(50.0));
        // Missing facet -> empty list
        assert!(result.aggregations.brands.is_empty());
    }

    #[test]
    fn test_shape_fills_missing_id_from_hit() {
        let mut source = product_source("ignored");
        source.as_object_mut().unwrap().remove("id");
        let response = SearchResponse {
            hits: Hits {
                total: HitsTotal { value: 1 },
                hits: vec![Hit {
                    id: "from-hit".to_string(),
                    score: None,
                    source,
                }],
            },
            aggregations: BTreeMap::new(),
        };

        let page = shape_list_page(response, Pagination::default()).unwrap();
        assert_eq!(page.products[0].id, "from-hit");
        assert_eq!(page.total_pages, 1);
    }

    // ============================================================
    // SEARCH PARAMETER TESTS
    // ============================================================

    #[test]
    fn test_params_blank_strings_are_absent() {
        let params = SearchParams {
            category: Some("  ".to_string()),
            brand: Some(String::new()),
            ..SearchParams::default()
        };

        assert_eq!(params.filters(), SearchFilterSet::default());
    }

    #[test]
    fn test_params_in_stock_only_true_literal() {
        let with = |value: &str| SearchParams {
            in_stock: Some(value.to_string()),
            ..SearchParams::default()
        };

        assert_eq!(with("true").filters().in_stock, Some(true));
        assert_eq!(with("false").filters().in_stock, Some(false));
        assert_eq!(with("yes").filters().in_stock, Some(false));
        assert_eq!(SearchParams::default().filters().in_stock, None);
    }

    #[test]
    fn test_filter_set_serializes_camel_case() {
        let filters = SearchFilterSet {
            min_price: Some(5.0),
            in_stock: Some(true),
            ..SearchFilterSet::default()
        };
        let value = serde_json::to_value(&filters).unwrap();

        assert_eq!(value, json!({ "minPrice": 5.0, "inStock": true }));
    }
}
