//! Document lifecycle walkthrough.
//!
//! Writes a sample product, reads it back, runs every query kind against it,
//! updates it, deletes it and checks that it is gone.

use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::config::Settings;
use crate::AppError;
use docsearch_repository::{FieldUpdate, SearchIndexService, SearchResult};
use docsearch_shared::{Document, ProductDocument, Query};

const SAMPLE_SELLER_ID: Uuid = Uuid::from_u128(0xea838b0c_a235_48c0_a84f_90a8aca284e2);

/// Text the walkthrough searches for.
pub const SEARCH_TEXT: &str = "Martabak Manis";

/// The product the walkthrough works with.
pub fn sample_product(now: DateTime<Utc>) -> ProductDocument {
    ProductDocument {
        id: 1,
        seller_id: SAMPLE_SELLER_ID,
        name: "Martabak Manis".to_string(),
        category: "Makanan".to_string(),
        quantity: 10,
        price: 10.0,
        weight: 10,
        size: "XXL".to_string(),
        status: "Ready".to_string(),
        description: "Martabak manis adalah kudapan sejenis panekuk yang biasa dijajakan di \
                      pinggir jalan di seluruh Indonesia, Malaysia, Brunei Darussalam, \
                      Filipina dan Singapura."
            .to_string(),
        created_at: Some(now),
        updated_at: Some(now),
    }
}

/// One query of each kind, in the order the walkthrough runs them.
pub fn demo_queries() -> Vec<Query> {
    vec![
        Query::match_all(),
        Query::wildcard("name", "*Martabak*"),
        Query::match_text("name", SEARCH_TEXT),
        Query::term_keyword("name", SEARCH_TEXT),
        Query::multi_match(["name", "category", "description"], SEARCH_TEXT),
    ]
}

/// Run the walkthrough against `service`.
///
/// The final read is expected to fail with `DocumentNotFound`; any other
/// error stops the walkthrough and is returned.
#[instrument(skip_all, fields(index = %settings.index))]
pub async fn run(service: &SearchIndexService, settings: &Settings) -> Result<(), AppError> {
    let index = settings.index.as_str();
    let product = sample_product(Utc::now());
    let id = product.document_id();

    let outcome = service.index(&settings.scratch_index, &product, None).await?;
    info!(
        index = %settings.scratch_index,
        doc_id = %outcome.id,
        "Indexed without an id; the service assigned one"
    );

    service.index_with_document_id(index, &product).await?;

    let fetched: ProductDocument = service.get(index, &id).await?;
    log_document("Fetched document", &fetched);

    for query in demo_queries() {
        let result: SearchResult<ProductDocument> = service.search(index, &query).await?;
        info!(
            kind = query.kind(),
            total = result.total,
            returned = result.len(),
            "Search finished"
        );
        for hit in &result.hits {
            debug!(doc_id = %hit.id, score = ?hit.score, name = %hit.document.name, "Hit");
        }
    }

    let update = FieldUpdate::new()
        .set("status", "Not Ready")
        .set("size", "L")
        .set_timestamp("updated_at", Utc::now());
    service.update::<ProductDocument>(index, &id, &update).await?;

    let fetched: ProductDocument = service.get(index, &id).await?;
    log_document("Fetched updated document", &fetched);

    service.delete(index, &id).await?;

    match service.get::<ProductDocument>(index, &id).await {
        Err(err) if err.is_not_found() => {
            info!(doc_id = %id, "Document is gone after delete, as expected");
            Ok(())
        }
        Err(err) => Err(err.into()),
        Ok(_) => Err(AppError::UnexpectedResult(format!(
            "document {} is still readable after delete",
            id
        ))),
    }
}

fn log_document(message: &str, document: &ProductDocument) {
    info!(
        doc_id = document.id,
        name = %document.name,
        status = %document.status,
        size = %document.size,
        updated_at = ?document.updated_at,
        "{}",
        message
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use docsearch_repository::{
        ClusterInfo, HitSet, IndexOutcome, RawHit, SearchError, SearchIndexProvider,
        StoredDocument, WriteResult,
    };
    use docsearch_shared::SearchRequest;
    use serde_json::Value;
    use std::collections::BTreeMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    /// Keeps documents in a map and answers every search with the whole index.
    #[derive(Default)]
    struct MapProvider {
        documents: Mutex<BTreeMap<(String, String), Value>>,
        searches: Mutex<Vec<String>>,
        ignore_deletes: bool,
    }

    #[async_trait]
    impl SearchIndexProvider for MapProvider {
        async fn ping(&self) -> Result<ClusterInfo, SearchError> {
            Ok(ClusterInfo {
                cluster_name: "map".to_string(),
                version: None,
            })
        }

        async fn index_document(
            &self,
            index: &str,
            id: Option<&str>,
            source: &Value,
        ) -> Result<IndexOutcome, SearchError> {
            let mut documents = self.documents.lock().await;
            let id = id
                .map(str::to_string)
                .unwrap_or_else(|| format!("auto-{}", documents.len()));
            documents.insert((index.to_string(), id.clone()), source.clone());
            Ok(IndexOutcome {
                id,
                result: WriteResult::Created,
                version: Some(1),
            })
        }

        async fn get_document(
            &self,
            index: &str,
            id: &str,
        ) -> Result<StoredDocument, SearchError> {
            self.documents
                .lock()
                .await
                .get(&(index.to_string(), id.to_string()))
                .map(|source| StoredDocument {
                    id: id.to_string(),
                    source: source.clone(),
                })
                .ok_or_else(|| SearchError::document_not_found(index, id))
        }

        async fn search(
            &self,
            index: &str,
            request: &SearchRequest,
        ) -> Result<HitSet, SearchError> {
            self.searches
                .lock()
                .await
                .push(request.query.kind().to_string());
            let hits: Vec<RawHit> = self
                .documents
                .lock()
                .await
                .iter()
                .filter(|((doc_index, _), _)| doc_index == index)
                .map(|((_, id), source)| RawHit {
                    id: id.clone(),
                    score: Some(1.0),
                    source: source.clone(),
                })
                .collect();
            Ok(HitSet {
                total: hits.len() as u64,
                hits,
            })
        }

        async fn update_document(
            &self,
            index: &str,
            id: &str,
            update: &FieldUpdate,
        ) -> Result<IndexOutcome, SearchError> {
            let mut documents = self.documents.lock().await;
            let source = documents
                .get_mut(&(index.to_string(), id.to_string()))
                .and_then(Value::as_object_mut)
                .ok_or_else(|| SearchError::document_not_found(index, id))?;
            for (field, value) in update.fields() {
                source.insert(field.clone(), value.clone());
            }
            Ok(IndexOutcome {
                id: id.to_string(),
                result: WriteResult::Updated,
                version: Some(2),
            })
        }

        async fn delete_document(&self, index: &str, id: &str) -> Result<(), SearchError> {
            if self.ignore_deletes {
                return Ok(());
            }
            self.documents
                .lock()
                .await
                .remove(&(index.to_string(), id.to_string()))
                .map(|_| ())
                .ok_or_else(|| SearchError::document_not_found(index, id))
        }
    }

    fn test_settings() -> Settings {
        Settings::from_lookup(|_| None).unwrap()
    }

    #[tokio::test]
    async fn test_walkthrough_completes() {
        let provider = Arc::new(MapProvider::default());
        let service = SearchIndexService::new(provider.clone());

        run(&service, &test_settings()).await.unwrap();

        let documents = provider.documents.lock().await;
        assert_eq!(documents.len(), 1);
        let ((index, _), source) = documents.iter().next().unwrap();
        assert_eq!(index, "my_products");
        assert_eq!(source["name"], "Martabak Manis");

        assert_eq!(
            *provider.searches.lock().await,
            vec!["match_all", "wildcard", "match", "term", "multi_match"]
        );
    }

    #[tokio::test]
    async fn test_walkthrough_fails_when_delete_has_no_effect() {
        let provider = Arc::new(MapProvider {
            ignore_deletes: true,
            ..MapProvider::default()
        });
        let service = SearchIndexService::new(provider);

        let err = run(&service, &test_settings()).await.unwrap_err();
        assert!(matches!(err, AppError::UnexpectedResult(_)));
    }

    #[test]
    fn test_sample_product() {
        let product = sample_product(Utc::now());
        assert_eq!(product.seller_id.to_string(), "ea838b0c-a235-48c0-a84f-90a8aca284e2");
        assert_eq!(product.document_id().to_string(), "1");
    }
}
