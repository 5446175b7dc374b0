//! Product Search Module
//!
//! Turns a free-text query plus structured filters into a backend search
//! request, and the backend's answer back into a catalog result.
//!
//! ## Overview
//! The query side is pure: `query` builds a `SearchRequest` from the caller's
//! input and never touches the network. The result side (`results`) only
//! reshapes what the backend returned. `ProductService` sits between the two
//! and owns the actual backend call.
//!
//! ## Relevance
//! Free text is matched against `name` (boost 3), `description` (boost 2),
//! `category` and `brand`, with typo tolerance. Filters narrow the hit set but
//! never contribute to the score. Ties are broken newest first.
//!
//! ## Submodules
//! - **`handlers`**: HTTP handler for `GET /api/products/search`.
//! - **`query`**: Search and listing request builders.
//! - **`results`**: Hit and aggregation reshaping.
//! - **`types`**: Filters, pagination and result DTOs.

pub mod handlers;
pub mod query;
pub mod results;
pub mod types;

#[cfg(test)]
mod tests;
