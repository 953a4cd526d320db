//! # Docsearch Repository
//!
//! This crate provides the search client core: the error taxonomy, the
//! `SearchIndexProvider` interface with its OpenSearch implementation, and
//! `SearchIndexService`, the facade application code uses to index, fetch,
//! search, update and delete documents.

pub mod config;
pub mod errors;
pub mod interfaces;
pub mod opensearch;
pub mod service;
pub mod types;

pub use config::{ConnectionConfig, Credentials};
pub use errors::SearchError;
pub use interfaces::SearchIndexProvider;
pub use opensearch::OpenSearchProvider;
pub use service::SearchIndexService;
pub use types::{
    ClusterInfo, FieldUpdate, FieldValue, HitSet, IndexOutcome, RawHit, SearchHit, SearchResult,
    StoredDocument, WriteResult,
};
