//! HTTP Router Tests
//!
//! Drives the full router with `tower::ServiceExt::oneshot` against the in-memory
//! backend, so every check covers routing, extraction, the service and the
//! response envelope together.

#[cfg(test)]
mod tests {
    use crate::catalog::service::ProductService;
    use crate::engine::memory::MemoryBackend;
    use crate::server::openapi::OPENAPI_PATH;
    use crate::server::router;
    use axum::Router;
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tower::ServiceExt;

    async fn app() -> Router {
        let service = ProductService::new(Arc::new(MemoryBackend::new()), "products");
        service.initialize_index().await.unwrap();
        router(Arc::new(service))
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    fn product(name: &str, price: f64) -> Value {
        json!({
            "name": name,
            "description": "A product used by the router tests",
            "category": "electronics",
            "brand": "Acme",
            "price": price,
            "stock": 3,
            "rating": 4.0
        })
    }

    // ============================================================
    // HEALTH
    // ============================================================

    #[tokio::test]
    async fn test_health() {
        let app = app().await;

        let (status, body) = send(&app, Method::GET, "/api/products/health", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "OK");
        assert_eq!(body["message"], "Products API is running");
        assert!(body["timestamp"].is_string());
    }

    // ============================================================
    // CRUD
    // ============================================================

    #[tokio::test]
    async fn test_create_get_update_delete() {
        let app = app().await;

        // ARRANGE / ACT: create
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/products",
            Some(product("Headphones", 59.0)),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Product created successfully");
        let id = body["data"]["id"].as_str().unwrap().to_string();
        assert!(id.starts_with("prod_"));
        assert!(body["data"]["createdAt"].is_string());

        // get
        let (status, body) = send(&app, Method::GET, &format!("/api/products/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["name"], "Headphones");

        // update
        let (status, body) = send(
            &app,
            Method::PUT,
            &format!("/api/products/{}", id),
            Some(json!({ "price": 49.0, "id": "other" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Product updated successfully");
        assert_eq!(body["data"]["price"], 49.0);
        assert_eq!(body["data"]["id"], id.as_str());

        // delete
        let (status, body) =
            send(&app, Method::DELETE, &format!("/api/products/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Product deleted successfully");

        // ASSERT: gone
        let (status, body) = send(&app, Method::GET, &format!("/api/products/{}", id), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Product not found");
    }

    #[tokio::test]
    async fn test_create_invalid_returns_details() {
        let app = app().await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/products",
            Some(json!({ "name": "X", "price": -5 })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Validation Error");
        assert!(body["message"].as_str().unwrap().starts_with("Validation failed"));
        assert!(body["details"].as_array().unwrap().len() >= 5);
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let app = app().await;

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/api/products")
                    .header("content-type", "application/json")
                    .body(Body::from("{ not json"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_list_with_pagination() {
        let app = app().await;
        for i in 0..3 {
            send(
                &app,
                Method::POST,
                "/api/products",
                Some(product(&format!("Item {}", i), 10.0 + i as f64)),
            )
            .await;
        }

        let (status, body) = send(&app, Method::GET, "/api/products?page=2&size=2", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
        assert_eq!(
            body["pagination"],
            json!({ "page": 2, "size": 2, "total": 3, "totalPages": 2 })
        );
    }

    #[tokio::test]
    async fn test_invalid_pagination_is_bad_request() {
        let app = app().await;

        let (status, _) = send(&app, Method::GET, "/api/products?page=0", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&app, Method::GET, "/api/products/search?size=500", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&app, Method::GET, "/api/products?page=abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    // ============================================================
    // BULK
    // ============================================================

    #[tokio::test]
    async fn test_bulk_create() {
        let app = app().await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/products/bulk",
            Some(json!({ "products": [product("One", 1.0), product("Two", 2.0)] })),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["count"], 2);
        assert_eq!(body["message"], "Bulk indexed 2 products successfully");
    }

    #[tokio::test]
    async fn test_bulk_without_products_is_bad_request() {
        let app = app().await;

        let (status, body) = send(&app, Method::POST, "/api/products/bulk", Some(json!({}))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Bad Request");
    }

    // ============================================================
    // SEARCH
    // ============================================================

    #[tokio::test]
    async fn test_search_envelope() {
        let app = app().await;
        send(&app, Method::POST, "/api/products", Some(product("Gaming Laptop", 1500.0))).await;
        send(&app, Method::POST, "/api/products", Some(product("Laptop Sleeve", 30.0))).await;

        let (status, body) = send(
            &app,
            Method::GET,
            "/api/products/search?q=laptop&minPrice=100&inStock=true&category=",
            None,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["searchQuery"], "laptop");
        assert_eq!(body["filters"], json!({ "minPrice": 100.0, "inStock": true }));
        assert_eq!(body["pagination"]["total"], 1);
        assert_eq!(body["data"][0]["name"], "Gaming Laptop");
        assert!(body["aggregations"]["categories"].is_array());
        assert!(body["aggregations"]["priceRanges"].is_array());
    }

    #[tokio::test]
    async fn test_blank_query_echoes_null() {
        let app = app().await;

        let (status, body) = send(&app, Method::GET, "/api/products/search?q=", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["searchQuery"].is_null(), "Got: {}", body["searchQuery"]);

        let (_, body) = send(&app, Method::GET, "/api/products/search?q=%20%20", None).await;
        assert!(body["searchQuery"].is_null());

        let (_, body) = send(&app, Method::GET, "/api/products/search", None).await;
        assert!(body["searchQuery"].is_null());
    }

    // ============================================================
    // INDEX ADMINISTRATION
    // ============================================================

    #[tokio::test]
    async fn test_stats_then_delete_index() {
        let app = app().await;
        send(&app, Method::POST, "/api/products", Some(product("Monitor", 200.0))).await;

        let (status, body) = send(&app, Method::GET, "/api/products/stats", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["indexName"], "products");
        assert_eq!(body["data"]["documentCount"], 1);

        let (status, body) = send(&app, Method::DELETE, "/api/products/index", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Index deleted successfully");

        // Search against a deleted index is a backend failure
        let (status, body) = send(&app, Method::GET, "/api/products/search", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal Server Error");
    }

    // ============================================================
    // OPENAPI DOCUMENT
    // ============================================================

    #[tokio::test]
    async fn test_openapi_lists_every_route() {
        let app = app().await;

        let (status, doc) = send(&app, Method::GET, OPENAPI_PATH, None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(doc["openapi"].as_str().unwrap().starts_with("3."));

        let expected: [(&str, &[&str]); 7] = [
            ("/api/products", &["get", "post"]),
            ("/api/products/{id}", &["get", "put", "delete"]),
            ("/api/products/search", &["get"]),
            ("/api/products/bulk", &["post"]),
            ("/api/products/stats", &["get"]),
            ("/api/products/index", &["delete"]),
            ("/api/products/health", &["get"]),
        ];
        let paths = doc["paths"].as_object().unwrap();
        assert_eq!(paths.len(), expected.len(), "Paths: {:?}", paths.keys());
        for (path, methods) in expected {
            for method in methods {
                assert!(
                    paths[path].get(*method).is_some(),
                    "Missing {} {}",
                    method,
                    path
                );
            }
        }
    }

    #[tokio::test]
    async fn test_openapi_describes_product_schema() {
        let app = app().await;

        let (_, doc) = send(&app, Method::GET, OPENAPI_PATH, None).await;
        let schemas = &doc["components"]["schemas"];

        let product = &schemas["Product"]["properties"];
        for field in ["id", "name", "price", "stock", "rating", "createdAt", "updatedAt"] {
            assert!(product.get(field).is_some(), "Product lacks {}", field);
        }
        assert!(schemas.get("ErrorBody").is_some());
        assert!(schemas.get("SearchResponseBody").is_some());

        let search_params: Vec<&str> = doc["paths"]["/api/products/search"]["get"]["parameters"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|p| p["name"].as_str())
            .collect();
        assert!(search_params.contains(&"minPrice"));
        assert!(search_params.contains(&"inStock"));
        assert_eq!(doc["info"]["license"]["name"], "MIT");
    }
}
