//! OpenSearch query builders.
//!
//! Bodies are assembled as `serde_json::Value` trees, so field names and query
//! text are escaped by the serializer whatever they contain.

use serde_json::{json, Map, Value};

use crate::errors::SearchError;
use docsearch_shared::{Query, SearchRequest};

/// Build the body of a `_search` request.
///
/// Pagination keys are only present when set, leaving the service defaults
/// (`from: 0`, `size: 10`) otherwise.
pub fn build_search_body(request: &SearchRequest) -> Result<Value, SearchError> {
    let mut body = Map::new();
    body.insert("query".to_string(), build_query_clause(&request.query)?);

    if let Some(from) = request.from {
        body.insert("from".to_string(), json!(from));
    }
    if let Some(size) = request.size {
        body.insert("size".to_string(), json!(size));
    }

    Ok(Value::Object(body))
}

/// Build the clause that goes under `"query"`.
pub fn build_query_clause(query: &Query) -> Result<Value, SearchError> {
    validate_query(query)?;

    let clause = match query {
        Query::MatchAll => json!({ "match_all": {} }),
        Query::Wildcard { field, pattern } => json!({ "wildcard": single_field(field, pattern) }),
        Query::Match { field, text } => json!({ "match": single_field(field, text) }),
        Query::Term { field, value } => json!({ "term": single_field(field, value) }),
        Query::MultiMatch { fields, text } => json!({
            "multi_match": {
                "query": text,
                "fields": fields
            }
        }),
    };

    Ok(clause)
}

/// Check that a query names only addressable fields.
pub fn validate_query(query: &Query) -> Result<(), SearchError> {
    if let Query::MultiMatch { fields, .. } = query {
        if fields.is_empty() {
            return Err(SearchError::validation(
                "multi_match requires at least one field",
            ));
        }
    }
    query.fields().into_iter().try_for_each(validate_field_name)
}

/// Reject field names the service cannot address.
pub fn validate_field_name(field: &str) -> Result<(), SearchError> {
    if field.trim().is_empty() {
        return Err(SearchError::validation("field name must not be empty"));
    }
    if field.chars().any(char::is_control) {
        return Err(SearchError::validation(format!(
            "field name {:?} contains control characters",
            field
        )));
    }
    Ok(())
}

fn single_field(field: &str, value: &str) -> Value {
    let mut object = Map::new();
    object.insert(field.to_string(), Value::String(value.to_string()));
    Value::Object(object)
}
