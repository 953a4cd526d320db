//! Search query types.
//!
//! A [`Query`] only records what to match; turning it into a request body is
//! the backend's job, which keeps field names and text out of any string
//! templating.

use serde::{Deserialize, Serialize};

/// Suffix of the unanalyzed sub-field the service creates for text fields.
pub const KEYWORD_SUFFIX: &str = ".keyword";

/// The query kinds supported by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Query {
    /// Every document in the index.
    MatchAll,
    /// Glob match (`*` and `?`) on the raw field value.
    ///
    /// This is the slowest kind: the service has to walk the term dictionary,
    /// and a leading wildcard touches every term.
    Wildcard { field: String, pattern: String },
    /// Analyzed match, tolerant of case and tokenization differences.
    Match { field: String, text: String },
    /// Exact, case-sensitive equality on the field's raw value.
    Term { field: String, value: String },
    /// Analyzed match across several fields; a document ranks by its best field.
    MultiMatch { fields: Vec<String>, text: String },
}

impl Query {
    /// Match every document.
    pub fn match_all() -> Self {
        Query::MatchAll
    }

    /// Glob match on `field`.
    pub fn wildcard(field: impl Into<String>, pattern: impl Into<String>) -> Self {
        Query::Wildcard {
            field: field.into(),
            pattern: pattern.into(),
        }
    }

    /// Analyzed match on `field`.
    pub fn match_text(field: impl Into<String>, text: impl Into<String>) -> Self {
        Query::Match {
            field: field.into(),
            text: text.into(),
        }
    }

    /// Exact match on `field` as given.
    pub fn term(field: impl Into<String>, value: impl Into<String>) -> Self {
        Query::Term {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Exact match on the `.keyword` sub-field of a text field.
    pub fn term_keyword(field: impl AsRef<str>, value: impl Into<String>) -> Self {
        let field = field.as_ref();
        let field = if field.ends_with(KEYWORD_SUFFIX) {
            field.to_string()
        } else {
            format!("{}{}", field, KEYWORD_SUFFIX)
        };
        Query::term(field, value)
    }

    /// Analyzed match across `fields`.
    pub fn multi_match<I, S>(fields: I, text: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Query::MultiMatch {
            fields: fields.into_iter().map(Into::into).collect(),
            text: text.into(),
        }
    }

    /// Short name of the query kind, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Query::MatchAll => "match_all",
            Query::Wildcard { .. } => "wildcard",
            Query::Match { .. } => "match",
            Query::Term { .. } => "term",
            Query::MultiMatch { .. } => "multi_match",
        }
    }

    /// Field names referenced by the query.
    pub fn fields(&self) -> Vec<&str> {
        match self {
            Query::MatchAll => vec![],
            Query::Wildcard { field, .. } | Query::Match { field, .. } | Query::Term { field, .. } => {
                vec![field.as_str()]
            }
            Query::MultiMatch { fields, .. } => fields.iter().map(String::as_str).collect(),
        }
    }
}

/// A query plus pagination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: Query,
    /// Offset of the first hit to return.
    pub from: Option<u64>,
    /// Maximum number of hits to return. The service defaults to 10.
    pub size: Option<u64>,
}

impl SearchRequest {
    /// Create a request with the service's default pagination.
    pub fn new(query: Query) -> Self {
        Self {
            query,
            from: None,
            size: None,
        }
    }

    /// Set the offset of the first hit.
    pub fn with_from(mut self, from: u64) -> Self {
        self.from = Some(from);
        self
    }

    /// Set the maximum number of hits.
    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }
}

impl From<Query> for SearchRequest {
    fn from(query: Query) -> Self {
        SearchRequest::new(query)
    }
}
