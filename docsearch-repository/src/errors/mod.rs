//! Error types for the document search client.

mod search_error;

pub use search_error::SearchError;
