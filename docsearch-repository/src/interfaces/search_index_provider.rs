//! Search index provider trait definition.
//!
//! This module defines the abstract interface for search index operations,
//! allowing for different backend implementations (OpenSearch, Elasticsearch,
//! in-memory fakes for tests).

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::SearchError;
use crate::types::{ClusterInfo, FieldUpdate, HitSet, IndexOutcome, StoredDocument};
use docsearch_shared::SearchRequest;

/// Abstracts the underlying search service.
///
/// Implementations are injected into `SearchIndexService`. They deal in wire
/// form (`serde_json::Value` sources) and are responsible for turning service
/// responses into typed results: a missing document is
/// `SearchError::DocumentNotFound`, any other rejection is
/// `SearchError::ServiceError`, and an unreachable service is
/// `SearchError::TransportError`.
///
/// Each method issues at most one request. Implementations hold no mutable
/// state of their own and must be safe to call from several tasks at once.
#[async_trait]
pub trait SearchIndexProvider: Send + Sync {
    /// Check that the service is reachable and report what it is.
    async fn ping(&self) -> Result<ClusterInfo, SearchError>;

    /// Write a document source.
    ///
    /// With `id`, the document at that id is created or replaced. Without it,
    /// the service assigns a fresh id.
    ///
    /// # Returns
    ///
    /// * `Ok(IndexOutcome)` - The id written and whether it was created or replaced
    /// * `Err(SearchError)` - If the write fails
    async fn index_document(
        &self,
        index: &str,
        id: Option<&str>,
        source: &Value,
    ) -> Result<IndexOutcome, SearchError>;

    /// Fetch one document by id.
    ///
    /// # Returns
    ///
    /// * `Ok(StoredDocument)` - The stored source
    /// * `Err(SearchError::DocumentNotFound)` - If nothing is stored at `id`
    async fn get_document(&self, index: &str, id: &str) -> Result<StoredDocument, SearchError>;

    /// Run a search. Zero hits is a successful, empty `HitSet`.
    async fn search(&self, index: &str, request: &SearchRequest) -> Result<HitSet, SearchError>;

    /// Merge fields into an existing document.
    ///
    /// # Returns
    ///
    /// * `Ok(IndexOutcome)` - If the document was updated
    /// * `Err(SearchError::DocumentNotFound)` - If the document doesn't exist
    async fn update_document(
        &self,
        index: &str,
        id: &str,
        update: &FieldUpdate,
    ) -> Result<IndexOutcome, SearchError>;

    /// Delete a document.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the document was deleted
    /// * `Err(SearchError::DocumentNotFound)` - If the document doesn't exist
    async fn delete_document(&self, index: &str, id: &str) -> Result<(), SearchError>;
}
