//! Catalog error taxonomy and its HTTP mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::fmt;
use thiserror::Error;
use utoipa::ToSchema;

use crate::engine::BackendError;
use crate::engine::protocol::BulkItemOutcome;

/// Every rule a product failed, collected in one pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// Set when the failing product is one item of a batch.
    pub product_id: Option<String>,
    pub errors: Vec<String>,
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.product_id {
            Some(id) => write!(f, "Validation failed for product {}: ", id)?,
            None => write!(f, "Validation failed: ")?,
        }
        write!(f, "{}", self.errors.join(", "))
    }
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{0}")]
    Validation(ValidationReport),

    #[error("Product not found")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Bulk indexing errors: {}", format_bulk_failures(.0))]
    BulkWrite(Vec<BulkItemOutcome>),

    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::Backend(BackendError::Payload(err))
    }
}

fn format_bulk_failures(failures: &[BulkItemOutcome]) -> String {
    serde_json::to_string(failures).unwrap_or_else(|_| format!("{} failed items", failures.len()))
}

/// Body of every failed request.
#[derive(Serialize, ToSchema)]
pub struct ErrorBody {
    pub success: bool,
    /// Error kind, e.g. `Validation Error` or `Not Found`.
    #[schema(value_type = String)]
    pub error: &'static str,
    pub message: String,
    /// Every violated rule, for validation failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

impl CatalogError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            CatalogError::Validation(_) | CatalogError::BadRequest(_) => StatusCode::BAD_REQUEST,
            CatalogError::NotFound(_) => StatusCode::NOT_FOUND,
            CatalogError::BulkWrite(_) | CatalogError::Backend(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn title(&self) -> &'static str {
        match self {
            CatalogError::Validation(_) => "Validation Error",
            CatalogError::NotFound(_) => "Not Found",
            CatalogError::BadRequest(_) => "Bad Request",
            CatalogError::BulkWrite(_) | CatalogError::Backend(_) => "Internal Server Error",
        }
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::debug!("Request rejected: {}", self);
        }

        let details = match &self {
            CatalogError::Validation(report) => Some(report.errors.clone()),
            _ => None,
        };
        let body = ErrorBody {
            success: false,
            error: self.title(),
            message: self.to_string(),
            details,
        };
        (status, Json(body)).into_response()
    }
}
