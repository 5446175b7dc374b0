use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use super::validation::{self, Candidate};

const ID_SUFFIX_LEN: usize = 9;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// A catalog product, in both its API and its stored form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[schema(example = "prod_1703123456789_abc123def")]
    pub id: String,
    #[schema(min_length = 2, example = "iPhone 15 Pro")]
    pub name: String,
    #[schema(min_length = 10)]
    pub description: String,
    #[schema(example = "Electronics")]
    pub category: String,
    #[schema(example = "Apple")]
    pub brand: String,
    #[schema(minimum = 0.0, example = 999.99)]
    pub price: f64,
    #[schema(minimum = 0, example = 50)]
    pub stock: i64,
    #[schema(minimum = 0.0, maximum = 5.0, example = 4.8)]
    pub rating: f64,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Decodes a stored document. The document id fills in a missing `id` field.
    pub fn from_document(id: &str, mut source: Value) -> Result<Self, serde_json::Error> {
        if let Some(fields) = source.as_object_mut() {
            let has_id = fields
                .get("id")
                .and_then(Value::as_str)
                .is_some_and(|existing| !existing.is_empty());
            if !has_id {
                fields.insert("id".to_string(), Value::String(id.to_string()));
            }
        }
        serde_json::from_value(source)
    }

    pub fn to_document(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

/// Generates an identity of the form `prod_<unix millis>_<9 base-36 chars>`.
pub fn generate_product_id() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..ID_SUFFIX_LEN)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();
    format!("prod_{}_{}", Utc::now().timestamp_millis(), suffix)
}

/// Untrusted product payload, as received on create and bulk create.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub price: Option<f64>,
    pub stock: Option<i64>,
    pub rating: Option<f64>,
    pub tags: Option<Vec<String>>,
    pub images: Option<Vec<String>>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl ProductInput {
    /// Assigns a generated identity unless a non-blank one was supplied.
    pub fn ensure_id(&mut self) -> &str {
        if self.id.as_deref().is_none_or(|id| id.trim().is_empty()) {
            self.id = Some(generate_product_id());
        }
        self.id.as_deref().unwrap_or_default()
    }

    /// Validates the payload and builds the product, or returns every violated rule.
    pub fn into_product(mut self, now: DateTime<Utc>) -> Result<Product, Vec<String>> {
        self.ensure_id();
        validation::validate(&Candidate::from(&self))?;

        Ok(Product {
            id: self.id.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            category: self.category.unwrap_or_default(),
            brand: self.brand.unwrap_or_default(),
            price: self.price.unwrap_or_default(),
            stock: self.stock.unwrap_or_default(),
            rating: self.rating.unwrap_or(0.0),
            tags: self.tags.unwrap_or_default(),
            images: self.images.unwrap_or_default(),
            created_at: self.created_at.unwrap_or(now),
            updated_at: self.updated_at.unwrap_or(now),
        })
    }
}

/// The updatable fields of a product. Anything else in an update body,
/// `id` and the timestamps included, is ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub price: Option<f64>,
    pub stock: Option<i64>,
    pub rating: Option<f64>,
    pub tags: Option<Vec<String>>,
    pub images: Option<Vec<String>>,
}

impl ProductPatch {
    /// Overlays the set fields on `existing` and stamps `updated_at`.
    /// The result is not validated here.
    pub fn apply(self, existing: Product, now: DateTime<Utc>) -> Product {
        Product {
            id: existing.id,
            name: self.name.unwrap_or(existing.name),
            description: self.description.unwrap_or(existing.description),
            category: self.category.unwrap_or(existing.category),
            brand: self.brand.unwrap_or(existing.brand),
            price: self.price.unwrap_or(existing.price),
            stock: self.stock.unwrap_or(existing.stock),
            rating: self.rating.unwrap_or(existing.rating),
            tags: self.tags.unwrap_or(existing.tags),
            images: self.images.unwrap_or(existing.images),
            created_at: existing.created_at,
            updated_at: now,
        }
    }
}

/// Index statistics exposed by the stats endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IndexStats {
    pub index_name: String,
    pub document_count: u64,
    /// Store size in bytes.
    pub storage_size: u64,
    /// Raw per-index statistics as reported by the cluster.
    #[schema(value_type = Object)]
    pub stats: Value,
}

impl IndexStats {
    pub fn from_raw(index_name: &str, stats: Value) -> Self {
        let total = stats.get("total");
        let document_count = total
            .and_then(|t| t.pointer("/docs/count"))
            .and_then(Value::as_u64)
            .unwrap_or(0);
        let storage_size = total
            .and_then(|t| t.pointer("/store/size_in_bytes"))
            .and_then(Value::as_u64)
            .unwrap_or(0);

        Self {
            index_name: index_name.to_string(),
            document_count,
            storage_size,
            stats,
        }
    }
}
