//! Typed parsing of OpenSearch response bodies.
//!
//! Every response is deserialized into a struct and then checked for the
//! parts the client relies on. A body that is missing expected nesting is a
//! `DecodingError`, never a panic.

use serde::Deserialize;
use serde_json::Value;

use crate::errors::SearchError;
use crate::types::{ClusterInfo, HitSet, IndexOutcome, RawHit, StoredDocument, WriteResult};

#[derive(Debug, Deserialize)]
struct SearchResponseBody {
    hits: Option<HitsEnvelope>,
}

#[derive(Debug, Deserialize)]
struct HitsEnvelope {
    total: Option<TotalHits>,
    hits: Option<Vec<HitBody>>,
}

/// `hits.total` is an object since Elasticsearch 7 and a bare number before.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TotalHits {
    Count(u64),
    Object { value: u64 },
}

impl TotalHits {
    fn value(&self) -> u64 {
        match self {
            TotalHits::Count(value) | TotalHits::Object { value } => *value,
        }
    }
}

#[derive(Debug, Deserialize)]
struct HitBody {
    #[serde(rename = "_id")]
    id: Option<String>,
    #[serde(rename = "_score")]
    score: Option<f64>,
    #[serde(rename = "_source")]
    source: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct GetResponseBody {
    #[serde(rename = "_id")]
    id: Option<String>,
    found: Option<bool>,
    #[serde(rename = "_source")]
    source: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct WriteResponseBody {
    #[serde(rename = "_id")]
    id: String,
    result: Option<String>,
    #[serde(rename = "_version")]
    version: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct InfoResponseBody {
    cluster_name: Option<String>,
    version: Option<VersionBody>,
}

#[derive(Debug, Deserialize)]
struct VersionBody {
    number: Option<String>,
}

fn parse_json<'a, T: Deserialize<'a>>(body: &'a str, what: &str) -> Result<T, SearchError> {
    serde_json::from_str(body)
        .map_err(|e| SearchError::decoding(format!("Malformed {} response: {}", what, e)))
}

/// Parse the body of a `_search` response.
pub fn parse_search_response(body: &str) -> Result<HitSet, SearchError> {
    let response: SearchResponseBody = parse_json(body, "search")?;

    let envelope = response
        .hits
        .ok_or_else(|| SearchError::decoding("Search response has no 'hits' object"))?;
    let hits = envelope
        .hits
        .ok_or_else(|| SearchError::decoding("Search response has no 'hits.hits' array"))?;

    let hits = hits
        .into_iter()
        .enumerate()
        .map(|(position, hit)| {
            let id = hit.id.ok_or_else(|| {
                SearchError::decoding(format!("Hit {} has no '_id'", position))
            })?;
            let source = hit.source.ok_or_else(|| {
                SearchError::decoding(format!("Hit {} ({}) has no '_source'", position, id))
            })?;
            Ok(RawHit {
                id,
                score: hit.score,
                source,
            })
        })
        .collect::<Result<Vec<_>, SearchError>>()?;

    let total = envelope
        .total
        .map(|total| total.value())
        .unwrap_or(hits.len() as u64);

    Ok(HitSet { total, hits })
}

/// Parse the body of a get-by-id response.
///
/// `found: false` is reported as `DocumentNotFound` for `index`/`id`.
pub fn parse_get_response(body: &str, index: &str, id: &str) -> Result<StoredDocument, SearchError> {
    let response: GetResponseBody = parse_json(body, "get")?;

    if response.found == Some(false) {
        return Err(SearchError::document_not_found(index, id));
    }

    let source = response
        .source
        .ok_or_else(|| SearchError::decoding("Get response has no '_source'"))?;

    Ok(StoredDocument {
        id: response.id.unwrap_or_else(|| id.to_string()),
        source,
    })
}

/// Parse the body of an index or update response.
pub fn parse_write_response(body: &str) -> Result<IndexOutcome, SearchError> {
    let response: WriteResponseBody = parse_json(body, "write")?;

    Ok(IndexOutcome {
        id: response.id,
        result: response
            .result
            .as_deref()
            .map(WriteResult::from)
            .unwrap_or_else(|| WriteResult::Other("unknown".to_string())),
        version: response.version,
    })
}

/// Parse the body of the root (info) endpoint.
pub fn parse_info_response(body: &str) -> Result<ClusterInfo, SearchError> {
    let response: InfoResponseBody = parse_json(body, "info")?;

    let cluster_name = response
        .cluster_name
        .ok_or_else(|| SearchError::decoding("Info response has no 'cluster_name'"))?;

    Ok(ClusterInfo {
        cluster_name,
        version: response.version.and_then(|version| version.number),
    })
}
