//! Search index service.
//!
//! This module provides the facade application code uses to index, fetch,
//! search, update and delete documents. It validates requests, runs the
//! document codec, and delegates the wire work to a `SearchIndexProvider`.

use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::errors::SearchError;
use crate::interfaces::SearchIndexProvider;
use crate::opensearch::queries::{validate_field_name, validate_query};
use crate::types::{ClusterInfo, FieldUpdate, IndexOutcome, SearchHit, SearchResult};
use docsearch_shared::{codec, Document, DocumentId, Query, SearchRequest};

/// Characters the service does not accept in index names.
const FORBIDDEN_INDEX_CHARS: &[char] = &['\\', '/', '*', '?', '"', '<', '>', '|', ' ', ',', '#', ':'];

/// Maximum index name length in bytes.
const MAX_INDEX_NAME_BYTES: usize = 255;

/// The main entry point for working with documents in a search index.
///
/// The service keeps no state besides the shared provider handle. Cloning it
/// is cheap and clones can be used concurrently from different tasks against
/// the same or different indices.
#[derive(Clone)]
pub struct SearchIndexService {
    provider: Arc<dyn SearchIndexProvider>,
}

impl SearchIndexService {
    /// Create a new service on top of the given provider.
    pub fn new(provider: Arc<dyn SearchIndexProvider>) -> Self {
        Self { provider }
    }

    /// Check that the search service is reachable.
    pub async fn ping(&self) -> Result<ClusterInfo, SearchError> {
        self.provider.ping().await
    }

    /// Write a document to `index`.
    ///
    /// Without `id` the search service assigns one, so writing the same
    /// document twice stores two copies. With `id` the document at that id is
    /// created or replaced, and repeating the call leaves the same state.
    ///
    /// # Returns
    ///
    /// * `Ok(IndexOutcome)` - The id written and whether it was created or replaced
    /// * `Err(SearchError)` - If validation, encoding or the write fails
    #[instrument(skip(self, document))]
    pub async fn index<D: Document>(
        &self,
        index: &str,
        document: &D,
        id: Option<&DocumentId>,
    ) -> Result<IndexOutcome, SearchError> {
        validate_index_name(index)?;
        let id = id.map(validate_document_id).transpose()?;
        let source = codec::to_value(document)?;

        let outcome = self
            .provider
            .index_document(index, id.as_deref(), &source)
            .await?;

        info!(index = %index, doc_id = %outcome.id, result = ?outcome.result, "Indexed document");
        Ok(outcome)
    }

    /// Write a document at its own identifier.
    pub async fn index_with_document_id<D: Document>(
        &self,
        index: &str,
        document: &D,
    ) -> Result<IndexOutcome, SearchError> {
        let id = document.document_id();
        self.index(index, document, Some(&id)).await
    }

    /// Fetch the document stored at `id`.
    ///
    /// # Returns
    ///
    /// * `Ok(D)` - The decoded document
    /// * `Err(SearchError::DocumentNotFound)` - If nothing is stored at `id`
    /// * `Err(SearchError::DecodingError)` - If the stored source is not a valid `D`
    #[instrument(skip(self))]
    pub async fn get<D: Document>(&self, index: &str, id: &DocumentId) -> Result<D, SearchError> {
        validate_index_name(index)?;
        let id = validate_document_id(id)?;

        let stored = self.provider.get_document(index, &id).await?;
        let document = codec::from_value(stored.source)?;

        debug!(index = %index, doc_id = %id, "Fetched document");
        Ok(document)
    }

    /// Search `index` with the service's default pagination.
    pub async fn search<D: Document>(
        &self,
        index: &str,
        query: &Query,
    ) -> Result<SearchResult<D>, SearchError> {
        self.search_with(index, &SearchRequest::new(query.clone()))
            .await
    }

    /// Search `index`.
    ///
    /// Hits keep the order the search service ranked them in. No hits is a
    /// successful, empty result.
    #[instrument(skip(self, request), fields(kind = request.query.kind()))]
    pub async fn search_with<D: Document>(
        &self,
        index: &str,
        request: &SearchRequest,
    ) -> Result<SearchResult<D>, SearchError> {
        validate_index_name(index)?;
        validate_query(&request.query)?;

        if let Query::Wildcard { pattern, .. } = &request.query {
            debug!(pattern = %pattern, "Wildcard query; this is the slowest query kind");
        }

        let hit_set = self.provider.search(index, request).await?;
        let hits = hit_set
            .hits
            .into_iter()
            .map(|hit| {
                Ok(SearchHit {
                    id: hit.id,
                    score: hit.score,
                    document: codec::from_value(hit.source)?,
                })
            })
            .collect::<Result<Vec<_>, SearchError>>()?;

        debug!(index = %index, total = hit_set.total, returned = hits.len(), "Search completed");
        Ok(SearchResult {
            total: hit_set.total,
            hits,
        })
    }

    /// Merge `update` into the document of type `D` stored at `id`.
    ///
    /// Fields not mentioned are left unchanged. The identifier field cannot
    /// be updated.
    ///
    /// # Returns
    ///
    /// * `Ok(IndexOutcome)` - If the document was updated
    /// * `Err(SearchError::DocumentNotFound)` - If the document doesn't exist
    /// * `Err(SearchError::ValidationError)` - If the update is empty or touches the identifier
    /// * `Err(SearchError::EncodingError)` - If a field was given a non-finite number
    #[instrument(skip(self, update), fields(fields = ?update.fields().keys().collect::<Vec<_>>()))]
    pub async fn update<D: Document>(
        &self,
        index: &str,
        id: &DocumentId,
        update: &FieldUpdate,
    ) -> Result<IndexOutcome, SearchError> {
        validate_index_name(index)?;
        let id = validate_document_id(id)?;

        if !update.rejected().is_empty() {
            return Err(SearchError::encoding(format!(
                "update has values JSON cannot represent ({})",
                update.rejected().join(", ")
            )));
        }
        if !update.has_updates() {
            return Err(SearchError::validation("update has no fields"));
        }
        if update.contains(D::ID_FIELD) {
            return Err(SearchError::validation(format!(
                "'{}' is the document identifier and cannot be updated",
                D::ID_FIELD
            )));
        }
        update
            .fields()
            .keys()
            .try_for_each(|field| validate_field_name(field))?;

        let outcome = self.provider.update_document(index, &id, update).await?;

        info!(index = %index, doc_id = %id, result = ?outcome.result, "Updated document");
        Ok(outcome)
    }

    /// Delete the document stored at `id`.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the document was deleted
    /// * `Err(SearchError::DocumentNotFound)` - If the document doesn't exist
    #[instrument(skip(self))]
    pub async fn delete(&self, index: &str, id: &DocumentId) -> Result<(), SearchError> {
        validate_index_name(index)?;
        let id = validate_document_id(id)?;

        self.provider.delete_document(index, &id).await?;

        info!(index = %index, doc_id = %id, "Deleted document");
        Ok(())
    }
}

/// Check an index name against the naming rules of the search service.
pub fn validate_index_name(index: &str) -> Result<(), SearchError> {
    let invalid = |reason: &str| {
        Err(SearchError::validation(format!(
            "invalid index name {:?}: {}",
            index, reason
        )))
    };

    if index.is_empty() {
        return invalid("must not be empty");
    }
    if index.len() > MAX_INDEX_NAME_BYTES {
        return invalid("longer than 255 bytes");
    }
    if index == "." || index == ".." {
        return invalid("reserved name");
    }
    if index.starts_with(['-', '_', '+']) {
        return invalid("must not start with '-', '_' or '+'");
    }
    if index.chars().any(|c| c.is_uppercase()) {
        return invalid("must be lowercase");
    }
    if index
        .chars()
        .any(|c| c.is_control() || FORBIDDEN_INDEX_CHARS.contains(&c))
    {
        return invalid("contains a forbidden character");
    }
    Ok(())
}

fn validate_document_id(id: &DocumentId) -> Result<String, SearchError> {
    let id = id.to_string();
    if id.trim().is_empty() {
        return Err(SearchError::validation("document id must not be empty"));
    }
    Ok(id)
}
