//! Product Catalog Service Library
//!
//! This library crate defines the modules behind the product catalog REST API.
//! It serves as the foundation for the binary executable (`main.rs`).
//!
//! ## Architecture Modules
//! - **`catalog`**: Product lifecycle. Validation, identity, CRUD, bulk create
//!   and index administration, exposed through `ProductService`.
//! - **`config`**: Environment and command line configuration.
//! - **`engine`**: The search backend seam. `SearchBackend` is implemented by an
//!   Elasticsearch HTTP client and by an in-process store used for local runs and tests.
//! - **`error`**: `CatalogError` and its mapping onto HTTP responses.
//! - **`search`**: Query construction (text relevance, filters, sorting, facets)
//!   and result reshaping.
//! - **`server`**: The axum router under `/api/products` and the OpenAPI document.

pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod search;
pub mod server;
