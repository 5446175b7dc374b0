//! Elasticsearch REST client.
//!
//! Thin wrapper over `reqwest`: every call is one HTTP round trip, there are no
//! retries, and any non-success status is surfaced as `BackendError::Status`.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde_json::Value;

use super::protocol::*;
use super::{BackendError, SearchBackend};
use crate::config::Config;

pub struct ElasticClient {
    http_client: reqwest::Client,
    base_url: String,
    username: Option<String>,
    password: Option<String>,
}

impl ElasticClient {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder()
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()?;

        Ok(Self {
            http_client,
            base_url: config.elasticsearch_url.trim_end_matches('/').to_string(),
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self
            .http_client
            .request(method, format!("{}{}", self.base_url, path));
        match &self.username {
            Some(username) => builder.basic_auth(username, self.password.as_ref()),
            None => builder,
        }
    }

    fn doc_path(index: &str, id: &str) -> String {
        format!("/{}/{}/{}", index, ENDPOINT_DOC, id)
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, BackendError> {
        let response = builder.send().await?;
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Err(BackendError::Status { status, body })
    }
}

/// Renders the NDJSON body of a bulk request: an action line followed by the
/// document line, for every document, each terminated by a newline.
pub fn bulk_body(index: &str, documents: &[(String, Value)]) -> Result<String, BackendError> {
    let mut body = String::new();
    for (id, document) in documents {
        let action = serde_json::json!({ "index": { "_index": index, "_id": id } });
        body.push_str(&serde_json::to_string(&action)?);
        body.push('\n');
        body.push_str(&serde_json::to_string(document)?);
        body.push('\n');
    }
    Ok(body)
}

/// Flattens the `items` array of a bulk response into one outcome per document.
pub fn bulk_outcomes(response: BulkResponse) -> Vec<BulkItemOutcome> {
    response
        .items
        .into_iter()
        .flat_map(|item| item.into_values())
        .map(|status| BulkItemOutcome {
            id: status.id,
            error: status.error.map(|err| {
                err.reason
                    .or(err.kind)
                    .unwrap_or_else(|| format!("bulk item failed with status {}", status.status))
            }),
        })
        .collect()
}

#[async_trait]
impl SearchBackend for ElasticClient {
    async fn cluster_info(&self) -> Result<ClusterInfo, BackendError> {
        let response = self.send(self.request(Method::GET, "/")).await?;
        Ok(response.json().await?)
    }

    async fn index_exists(&self, index: &str) -> Result<bool, BackendError> {
        let response = self
            .request(Method::HEAD, &format!("/{}", index))
            .send()
            .await?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(false),
            status if status.is_success() => Ok(true),
            status => Err(BackendError::Status {
                status: status.as_u16(),
                body: String::new(),
            }),
        }
    }

    async fn create_index(&self, index: &str, definition: &Value) -> Result<(), BackendError> {
        self.send(
            self.request(Method::PUT, &format!("/{}", index))
                .json(definition),
        )
        .await?;
        tracing::info!("Created index '{}'", index);
        Ok(())
    }

    async fn delete_index(&self, index: &str) -> Result<(), BackendError> {
        match self
            .send(self.request(Method::DELETE, &format!("/{}", index)))
            .await
        {
            Err(BackendError::Status { status: 404, .. }) => {
                Err(BackendError::IndexNotFound(index.to_string()))
            }
            other => other.map(|_| ()),
        }
    }

    async fn index_stats(&self, index: &str) -> Result<Value, BackendError> {
        let response = self
            .send(self.request(Method::GET, &format!("/{}/{}", index, ENDPOINT_STATS)))
            .await?;
        let mut body: Value = response.json().await?;
        Ok(body
            .get_mut("indices")
            .and_then(|indices| indices.get_mut(index))
            .map(Value::take)
            .unwrap_or(Value::Null))
    }

    async fn index_document(
        &self,
        index: &str,
        id: &str,
        document: &Value,
    ) -> Result<(), BackendError> {
        self.send(
            self.request(Method::PUT, &Self::doc_path(index, id))
                .query(&[("refresh", "wait_for")])
                .json(document),
        )
        .await?;
        Ok(())
    }

    async fn get_document(&self, index: &str, id: &str) -> Result<Value, BackendError> {
        let response = self
            .request(Method::GET, &Self::doc_path(index, id))
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(BackendError::DocumentNotFound {
                index: index.to_string(),
                id: id.to_string(),
            });
        }
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Status { status, body });
        }

        let body: GetResponse = response.json().await?;
        match body.source {
            Some(source) if body.found => Ok(source),
            _ => Err(BackendError::DocumentNotFound {
                index: index.to_string(),
                id: id.to_string(),
            }),
        }
    }

    async fn delete_document(&self, index: &str, id: &str) -> Result<(), BackendError> {
        let result = self
            .send(
                self.request(Method::DELETE, &Self::doc_path(index, id))
                    .query(&[("refresh", "wait_for")]),
            )
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(BackendError::Status { status: 404, .. }) => Err(BackendError::DocumentNotFound {
                index: index.to_string(),
                id: id.to_string(),
            }),
            Err(e) => Err(e),
        }
    }

    async fn search(
        &self,
        index: &str,
        request: &SearchRequest,
    ) -> Result<SearchResponse, BackendError> {
        tracing::debug!(
            "Search request for '{}': {}",
            index,
            serde_json::to_string(request)?
        );
        let response = self
            .send(
                self.request(Method::POST, &format!("/{}/{}", index, ENDPOINT_SEARCH))
                    .json(request),
            )
            .await?;
        Ok(response.json().await?)
    }

    async fn bulk_index(
        &self,
        index: &str,
        documents: &[(String, Value)],
    ) -> Result<Vec<BulkItemOutcome>, BackendError> {
        let body = bulk_body(index, documents)?;
        let response = self
            .send(
                self.request(Method::POST, ENDPOINT_BULK)
                    .query(&[("refresh", "wait_for")])
                    .header(CONTENT_TYPE, "application/x-ndjson")
                    .body(body),
            )
            .await?;

        let response: BulkResponse = response.json().await?;
        if response.errors {
            tracing::warn!("Bulk write to '{}' reported item errors", index);
        }
        Ok(bulk_outcomes(response))
    }
}
