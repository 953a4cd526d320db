//! Document trait and identifiers.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::codec::CodecError;

/// Identifier of a document within an index.
///
/// The search service addresses documents by a string id, so integer ids are
/// rendered in decimal on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DocumentId {
    Int(i64),
    Str(String),
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentId::Int(id) => write!(f, "{}", id),
            DocumentId::Str(id) => f.write_str(id),
        }
    }
}

impl From<i64> for DocumentId {
    fn from(id: i64) -> Self {
        DocumentId::Int(id)
    }
}

impl From<&str> for DocumentId {
    fn from(id: &str) -> Self {
        DocumentId::Str(id.to_string())
    }
}

impl From<String> for DocumentId {
    fn from(id: String) -> Self {
        DocumentId::Str(id)
    }
}

/// A record that can be stored in a search index.
///
/// Implementors are plain serde types. The identifier is part of the record
/// and is also used as its address in the index; it never changes once
/// assigned, so partial updates are not allowed to touch [`Document::ID_FIELD`].
pub trait Document: Serialize + DeserializeOwned + Send + Sync {
    /// Name of the field holding the identifier in the serialized form.
    const ID_FIELD: &'static str = "id";

    /// The document's identifier.
    fn document_id(&self) -> DocumentId;

    /// Reject values the wire format cannot represent faithfully.
    fn validate(&self) -> Result<(), CodecError> {
        Ok(())
    }
}
