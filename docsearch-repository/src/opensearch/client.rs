//! OpenSearch client implementation.
//!
//! This module provides the concrete implementation of `SearchIndexProvider`
//! using the OpenSearch Rust client. The REST surface used here (document
//! index/get/update/delete, `_search`, root info) is shared with
//! Elasticsearch, so the provider works against either service.

use async_trait::async_trait;
use opensearch::{
    auth::Credentials as TransportCredentials,
    http::response::Response,
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    params::Refresh,
    DeleteParts, GetParts, IndexParts, OpenSearch, SearchParts, UpdateParts,
};
use serde_json::{json, Value};
use tracing::{debug, error, info, instrument};

use crate::config::{ConnectionConfig, Credentials};
use crate::errors::SearchError;
use crate::interfaces::SearchIndexProvider;
use crate::opensearch::pool::RoundRobinConnectionPool;
use crate::opensearch::queries::build_search_body;
use crate::opensearch::responses::{
    parse_get_response, parse_info_response, parse_search_response, parse_write_response,
};
use crate::types::{ClusterInfo, FieldUpdate, HitSet, IndexOutcome, StoredDocument};
use docsearch_shared::SearchRequest;

/// OpenSearch client implementation.
///
/// Holds only the connection handle, so a single instance can be shared by
/// any number of tasks.
///
/// # Example
///
/// ```ignore
/// let config = ConnectionConfig::new(["http://localhost:9200"])?
///     .with_basic_auth("elastic", "elastic123");
/// let provider = OpenSearchProvider::new(&config)?;
/// let info = provider.ping().await?;
/// ```
pub struct OpenSearchProvider {
    client: OpenSearch,
    refresh_on_write: bool,
}

impl OpenSearchProvider {
    /// Create a provider for the configured endpoints.
    ///
    /// No request is sent; call `ping` to check reachability.
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchProvider)` - A new provider instance
    /// * `Err(SearchError)` - If the transport cannot be built
    pub fn new(config: &ConnectionConfig) -> Result<Self, SearchError> {
        let mut builder = match config.endpoints.as_slice() {
            [] => return Err(SearchError::validation("At least one endpoint is required")),
            [single] => TransportBuilder::new(SingleNodeConnectionPool::new(single.clone())),
            many => TransportBuilder::new(RoundRobinConnectionPool::new(many.iter().cloned())?),
        };

        builder = builder.disable_proxy();
        if let Some(credentials) = &config.credentials {
            builder = builder.auth(match credentials {
                Credentials::Basic { username, password } => {
                    TransportCredentials::Basic(username.clone(), password.clone())
                }
                Credentials::Bearer(token) => TransportCredentials::Bearer(token.clone()),
            });
        }
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let transport = builder
            .build()
            .map_err(|e| SearchError::transport(e.to_string()))?;

        info!(
            endpoints = ?config.endpoints.iter().map(|url| url.as_str()).collect::<Vec<_>>(),
            authenticated = config.credentials.is_some(),
            refresh_on_write = config.refresh_on_write,
            "Created OpenSearch client"
        );

        Ok(Self {
            client: OpenSearch::new(transport),
            refresh_on_write: config.refresh_on_write,
        })
    }

    fn refresh(&self) -> Refresh {
        if self.refresh_on_write {
            Refresh::True
        } else {
            Refresh::False
        }
    }
}

/// Read the status and body of a response, turning failures into typed errors.
///
/// `not_found` decides what a 404 means for the calling operation.
async fn read_response(
    response: Result<Response, opensearch::Error>,
    not_found: impl FnOnce() -> SearchError,
) -> Result<String, SearchError> {
    let response = response.map_err(|e| SearchError::transport(e.to_string()))?;
    let status = response.status_code();
    let body = response
        .text()
        .await
        .map_err(|e| SearchError::transport(e.to_string()))?;

    if status.is_success() {
        return Ok(body);
    }

    error!(status = %status, body = %body, "Search service rejected the request");
    Err(classify_failure(status.as_u16(), body, not_found))
}

/// Map a non-success status to an error.
fn classify_failure(
    status: u16,
    body: String,
    not_found: impl FnOnce() -> SearchError,
) -> SearchError {
    if status == 404 {
        not_found()
    } else {
        SearchError::service(status, body)
    }
}

#[async_trait]
impl SearchIndexProvider for OpenSearchProvider {
    #[instrument(skip(self))]
    async fn ping(&self) -> Result<ClusterInfo, SearchError> {
        let response = self.client.info().send().await;
        let body = read_response(response, || SearchError::service(404, "info endpoint not found"))
            .await?;

        let info = parse_info_response(&body)?;
        info!(cluster = %info.cluster_name, version = ?info.version, "Search service reachable");
        Ok(info)
    }

    #[instrument(skip(self, source))]
    async fn index_document(
        &self,
        index: &str,
        id: Option<&str>,
        source: &Value,
    ) -> Result<IndexOutcome, SearchError> {
        let parts = match id {
            Some(id) => IndexParts::IndexId(index, id),
            None => IndexParts::Index(index),
        };

        let response = self
            .client
            .index(parts)
            .body(source)
            .refresh(self.refresh())
            .send()
            .await;
        // A 404 on a write means the path itself was rejected, not a missing document.
        let body = read_response(response, || {
            SearchError::service(404, format!("index '{}' rejected the write", index))
        })
        .await?;

        let outcome = parse_write_response(&body)?;
        debug!(doc_id = %outcome.id, result = ?outcome.result, "Document indexed");
        Ok(outcome)
    }

    #[instrument(skip(self))]
    async fn get_document(&self, index: &str, id: &str) -> Result<StoredDocument, SearchError> {
        let response = self.client.get(GetParts::IndexId(index, id)).send().await;
        let body = read_response(response, || SearchError::document_not_found(index, id)).await?;

        let document = parse_get_response(&body, index, id)?;
        debug!(doc_id = %document.id, "Document fetched");
        Ok(document)
    }

    #[instrument(skip(self, request), fields(kind = request.query.kind()))]
    async fn search(&self, index: &str, request: &SearchRequest) -> Result<HitSet, SearchError> {
        let body = build_search_body(request)?;
        debug!(body = %body, "Sending search request");

        let response = self
            .client
            .search(SearchParts::Index(&[index]))
            .body(body)
            .send()
            .await;
        let body = read_response(response, || {
            SearchError::service(404, format!("index '{}' does not exist", index))
        })
        .await?;

        let hits = parse_search_response(&body)?;
        debug!(total = hits.total, returned = hits.hits.len(), "Search completed");
        Ok(hits)
    }

    #[instrument(skip(self, update), fields(field_count = update.fields().len()))]
    async fn update_document(
        &self,
        index: &str,
        id: &str,
        update: &FieldUpdate,
    ) -> Result<IndexOutcome, SearchError> {
        // API reference: https://docs.opensearch.org/latest/api-reference/document-apis/update-document/
        let response = self
            .client
            .update(UpdateParts::IndexId(index, id))
            .body(json!({ "doc": update.fields() }))
            .refresh(self.refresh())
            .send()
            .await;
        let body = read_response(response, || SearchError::document_not_found(index, id)).await?;

        let outcome = parse_write_response(&body)?;
        debug!(doc_id = %outcome.id, result = ?outcome.result, "Document updated");
        Ok(outcome)
    }

    #[instrument(skip(self))]
    async fn delete_document(&self, index: &str, id: &str) -> Result<(), SearchError> {
        let response = self
            .client
            .delete(DeleteParts::IndexId(index, id))
            .refresh(self.refresh())
            .send()
            .await;
        read_response(response, || SearchError::document_not_found(index, id)).await?;

        debug!(doc_id = %id, "Document deleted");
        Ok(())
    }
}
