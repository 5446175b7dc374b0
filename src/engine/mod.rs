//! Search Backend Module
//!
//! Everything that talks to the external search service lives here.
//!
//! ## Core Concepts
//! - **Backend trait**: `SearchBackend` is the consumed contract (document CRUD, search,
//!   bulk writes, index administration). The rest of the crate only sees this trait.
//! - **Elasticsearch**: `ElasticClient` implements the trait over the cluster's REST API.
//! - **In-memory**: `MemoryBackend` keeps documents in local maps and evaluates the subset
//!   of the query DSL this service emits. Used for tests and local development.
//! - **Mapping**: the product index definition sent when the index is created.

pub mod elasticsearch;
pub mod mapping;
pub mod memory;
pub mod protocol;


use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

use crate::config::{BackendKind, Config};
use elasticsearch::ElasticClient;
use memory::MemoryBackend;
use protocol::{BulkItemOutcome, ClusterInfo, SearchRequest, SearchResponse};

/// Failures reported by a search backend.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("document {id} not found in index {index}")]
    DocumentNotFound { index: String, id: String },

    #[error("index {0} not found")]
    IndexNotFound(String),

    #[error("search service request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("search service responded with {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid search service payload: {0}")]
    Payload(#[from] serde_json::Error),
}

impl BackendError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            BackendError::DocumentNotFound { .. } | BackendError::IndexNotFound(_)
        )
    }
}

/// The search service as seen by the catalog.
///
/// Implementations must be `Send + Sync`; one instance is shared by all requests.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn cluster_info(&self) -> Result<ClusterInfo, BackendError>;

    async fn index_exists(&self, index: &str) -> Result<bool, BackendError>;

    async fn create_index(&self, index: &str, definition: &Value) -> Result<(), BackendError>;

    async fn delete_index(&self, index: &str) -> Result<(), BackendError>;

    /// Per-index statistics object (`total.docs.count`, `total.store.size_in_bytes`, ...).
    async fn index_stats(&self, index: &str) -> Result<Value, BackendError>;

    /// Stores `document` under `id`, replacing any previous version.
    async fn index_document(
        &self,
        index: &str,
        id: &str,
        document: &Value,
    ) -> Result<(), BackendError>;

    /// Returns the stored source of `id`, or `DocumentNotFound`.
    async fn get_document(&self, index: &str, id: &str) -> Result<Value, BackendError>;

    async fn delete_document(&self, index: &str, id: &str) -> Result<(), BackendError>;

    async fn search(
        &self,
        index: &str,
        request: &SearchRequest,
    ) -> Result<SearchResponse, BackendError>;

    /// Writes all documents in one call and reports the outcome of each.
    async fn bulk_index(
        &self,
        index: &str,
        documents: &[(String, Value)],
    ) -> Result<Vec<BulkItemOutcome>, BackendError>;
}

/// Builds the backend selected in `config`.
pub fn connect(config: &Config) -> anyhow::Result<Arc<dyn SearchBackend>> {
    let backend: Arc<dyn SearchBackend> = match config.backend {
        BackendKind::Elasticsearch => Arc::new(ElasticClient::new(config)?),
        BackendKind::Memory => Arc::new(MemoryBackend::new()),
    };
    Ok(backend)
}
