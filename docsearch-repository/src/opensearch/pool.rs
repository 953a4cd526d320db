//! Round-robin connection pool over several search nodes.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use opensearch::http::transport::{Connection, ConnectionPool};
use url::Url;

use crate::errors::SearchError;

/// Hands out the configured nodes in turn.
///
/// Clones share the rotation counter, so every request sent through one
/// transport advances the same rotation. Failed nodes are not skipped.
#[derive(Debug, Clone)]
pub struct RoundRobinConnectionPool {
    connections: Vec<Connection>,
    next: Arc<AtomicUsize>,
}

impl RoundRobinConnectionPool {
    /// Create a pool over `urls`, which must not be empty.
    pub fn new(urls: impl IntoIterator<Item = Url>) -> Result<Self, SearchError> {
        let connections: Vec<Connection> = urls.into_iter().map(Connection::new).collect();
        if connections.is_empty() {
            return Err(SearchError::validation("At least one endpoint is required"));
        }

        Ok(Self {
            connections,
            next: Arc::new(AtomicUsize::new(0)),
        })
    }

    fn next_index(&self) -> usize {
        self.next.fetch_add(1, Ordering::Relaxed) % self.connections.len()
    }
}

impl ConnectionPool for RoundRobinConnectionPool {
    fn next(&self) -> Connection {
        self.connections[self.next_index()].clone()
    }
}
