//! OpenSearch implementation of the search index provider.
//!
//! This module provides a concrete implementation of `SearchIndexProvider`
//! using OpenSearch (or a REST-compatible Elasticsearch) as the backend.

mod client;
mod pool;
pub mod queries;
pub mod responses;

pub use client::OpenSearchProvider;
pub use pool::RoundRobinConnectionPool;
