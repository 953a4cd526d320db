//! # Docsearch
//!
//! Entry point library for the document search demo.
//!
//! This crate provides the environment configuration, dependency wiring and
//! the document lifecycle walkthrough run by the `docsearch` binary.

pub mod config;
pub mod walkthrough;

pub use config::{Dependencies, Settings};

use docsearch_repository::SearchError;
use thiserror::Error;

/// Errors that can occur during startup or while running the walkthrough.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Search error.
    #[error("Search error: {0}")]
    SearchError(#[from] SearchError),

    /// The service answered, but not with what the walkthrough expected.
    #[error("Unexpected result: {0}")]
    UnexpectedResult(String),
}

impl AppError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
