//! Product Catalog Module
//!
//! The product lifecycle: create, read, update, delete, bulk create, listing,
//! and index administration.
//!
//! ## Overview
//! Every product is stored as one document in the configured index, keyed by
//! its id. Identity is either supplied by the client or generated on write
//! (`prod_<unix millis>_<9 base-36 chars>`), so writing the same id twice
//! replaces the document instead of duplicating it.
//!
//! ## Validation
//! Writes are validated before anything reaches the backend, and every failed
//! rule is reported at once. A bulk request is all-or-nothing at validation
//! time: one invalid product rejects the whole batch.
//!
//! ## Submodules
//! - **`handlers`**: Axum handlers for the `/api/products` endpoints.
//! - **`protocol`**: Request and response envelopes.
//! - **`service`**: `ProductService`, the orchestration layer over `SearchBackend`.
//! - **`types`**: `Product`, `ProductInput`, `ProductPatch` and `IndexStats`.
//! - **`validation`**: Product field rules.

pub mod handlers;
pub mod protocol;
pub mod service;
pub mod types;
pub mod validation;
