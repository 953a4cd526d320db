//! Search error types.
//!
//! Every failure path of the client surfaces as one of these variants. The
//! client never retries and never falls back; callers decide what to do.

use docsearch_shared::CodecError;
use thiserror::Error;

/// Errors that can occur while talking to the search service.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SearchError {
    /// The service could not be reached, or the request timed out.
    #[error("Transport error: {0}")]
    TransportError(String),

    /// The service was reached but rejected the request.
    #[error("Service error (status {status}): {message}")]
    ServiceError { status: u16, message: String },

    /// No document exists at the requested id.
    #[error("Document not found: index={index}, id={id}")]
    DocumentNotFound { index: String, id: String },

    /// A document could not be serialized for the service.
    #[error("Encoding error: {0}")]
    EncodingError(String),

    /// A document or response did not have the expected shape.
    #[error("Decoding error: {0}")]
    DecodingError(String),

    /// The request was rejected before being sent.
    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl SearchError {
    /// Create a transport error.
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::TransportError(msg.into())
    }

    /// Create a service error.
    pub fn service(status: u16, message: impl Into<String>) -> Self {
        Self::ServiceError {
            status,
            message: message.into(),
        }
    }

    /// Create a document not found error.
    pub fn document_not_found(index: &str, id: &str) -> Self {
        Self::DocumentNotFound {
            index: index.to_string(),
            id: id.to_string(),
        }
    }

    /// Create an encoding error.
    pub fn encoding(msg: impl Into<String>) -> Self {
        Self::EncodingError(msg.into())
    }

    /// Create a decoding error.
    pub fn decoding(msg: impl Into<String>) -> Self {
        Self::DecodingError(msg.into())
    }

    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    /// Whether the error reports a missing document.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::DocumentNotFound { .. })
    }

    /// HTTP status reported by the service, if the service answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ServiceError { status, .. } => Some(*status),
            Self::DocumentNotFound { .. } => Some(404),
            _ => None,
        }
    }
}

impl From<CodecError> for SearchError {
    fn from(err: CodecError) -> Self {
        match err {
            CodecError::Encoding(msg) => Self::EncodingError(msg),
            CodecError::Decoding(msg) => Self::DecodingError(msg),
        }
    }
}
