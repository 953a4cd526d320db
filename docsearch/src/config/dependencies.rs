//! Dependency initialization and wiring for the docsearch binary.

use std::sync::Arc;
use tracing::info;

use crate::config::Settings;
use crate::AppError;
use docsearch_repository::{OpenSearchProvider, SearchIndexService};

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The search service, connected and verified.
    pub service: SearchIndexService,
}

impl Dependencies {
    /// Build the search client and check that the service is reachable.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(AppError)` - If the client cannot be built or the ping fails
    pub async fn new(settings: &Settings) -> Result<Self, AppError> {
        info!(
            endpoints = ?settings
                .connection
                .endpoints
                .iter()
                .map(|url| url.as_str())
                .collect::<Vec<_>>(),
            index = %settings.index,
            "Initializing dependencies"
        );

        let provider = OpenSearchProvider::new(&settings.connection)
            .map_err(|e| AppError::config(format!("Failed to create search client: {}", e)))?;
        let service = SearchIndexService::new(Arc::new(provider));

        let cluster = service.ping().await?;
        info!(
            cluster = %cluster.cluster_name,
            version = ?cluster.version,
            "Search service connection verified"
        );

        Ok(Self { service })
    }
}
