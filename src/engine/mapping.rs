//! Product index definition.

use serde_json::{Value, json};

/// Settings and field mappings of the product index.
///
/// `category` and `brand` are keywords (exact filters, term aggregations) with a
/// `text` sub-field for full-text matching; `name` is the opposite.
pub fn product_index_definition() -> Value {
    json!({
        "mappings": {
            "properties": {
                "id": { "type": "keyword" },
                "name": {
                    "type": "text",
                    "analyzer": "english",
                    "fields": { "keyword": { "type": "keyword" } }
                },
                "description": { "type": "text", "analyzer": "english" },
                "category": {
                    "type": "keyword",
                    "fields": { "text": { "type": "text", "analyzer": "english" } }
                },
                "brand": {
                    "type": "keyword",
                    "fields": { "text": { "type": "text", "analyzer": "english" } }
                },
                "price": { "type": "float" },
                "stock": { "type": "integer" },
                "rating": { "type": "float" },
                "tags": { "type": "keyword" },
                "images": { "type": "keyword" },
                "createdAt": { "type": "date" },
                "updatedAt": { "type": "date" }
            }
        },
        "settings": {
            "analysis": {
                "analyzer": {
                    "english": { "type": "standard", "stopwords": "_english_" }
                }
            }
        }
    })
}
