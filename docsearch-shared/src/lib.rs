//! # Docsearch Shared
//!
//! Shared types for the document search client: the document model and its
//! codec, document identifiers, and the backend-agnostic query union.

pub mod codec;
pub mod document;
pub mod product;
pub mod query;

pub use codec::{decode, encode, from_value, to_value, CodecError};
pub use document::{Document, DocumentId};
pub use product::ProductDocument;
pub use query::{Query, SearchRequest};
