//! Settings read from the environment.

use std::env;
use std::time::Duration;

use docsearch_repository::config::{DEFAULT_TIMEOUT, DEFAULT_URL};
use docsearch_repository::ConnectionConfig;

use crate::AppError;

/// Default index for the walkthrough.
const DEFAULT_INDEX: &str = "products";

/// Default index for the write without an id.
const DEFAULT_SCRATCH_INDEX: &str = "my_products";

/// Everything the binary needs to know before it talks to the search service.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub connection: ConnectionConfig,
    /// Index the walkthrough writes, searches, updates and deletes in.
    pub index: String,
    /// Index that receives the document written without an id.
    pub scratch_index: String,
}

impl Settings {
    /// Read settings from the process environment.
    ///
    /// # Environment Variables
    ///
    /// - `SEARCH_URLS`: comma-separated endpoint URLs (default: http://localhost:9200)
    /// - `SEARCH_USERNAME` / `SEARCH_PASSWORD`: basic credentials
    /// - `SEARCH_API_TOKEN`: bearer token, takes precedence over basic credentials
    /// - `SEARCH_TIMEOUT_SECS`: transport timeout in seconds (default: 30)
    /// - `SEARCH_INDEX`: walkthrough index (default: products)
    /// - `SEARCH_SCRATCH_INDEX`: index for the write without an id (default: my_products)
    /// - `SEARCH_REFRESH_ON_WRITE`: `true`/`false` (default: true)
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - Parsed settings
    /// * `Err(AppError)` - If a variable is set to a malformed value
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read settings through `lookup`, which returns a variable's value if set.
    ///
    /// Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let urls = var("SEARCH_URLS").unwrap_or_else(|| DEFAULT_URL.to_string());
        let mut connection =
            ConnectionConfig::new(urls.split(',').filter(|url| !url.trim().is_empty()))
                .map_err(|e| AppError::config(format!("SEARCH_URLS: {}", e)))?;

        let timeout = match var("SEARCH_TIMEOUT_SECS") {
            Some(raw) => raw.parse::<u64>().map(Duration::from_secs).map_err(|_| {
                AppError::config(format!(
                    "SEARCH_TIMEOUT_SECS must be a whole number of seconds, got '{}'",
                    raw
                ))
            })?,
            None => DEFAULT_TIMEOUT,
        };
        connection = connection.with_timeout(timeout);

        let refresh_on_write = match var("SEARCH_REFRESH_ON_WRITE") {
            Some(raw) => parse_bool("SEARCH_REFRESH_ON_WRITE", &raw)?,
            None => true,
        };
        connection = connection.with_refresh_on_write(refresh_on_write);

        match (
            var("SEARCH_API_TOKEN"),
            var("SEARCH_USERNAME"),
            var("SEARCH_PASSWORD"),
        ) {
            (Some(token), _, _) => connection = connection.with_bearer_token(token),
            (None, Some(username), password) => {
                connection = connection.with_basic_auth(username, password.unwrap_or_default())
            }
            (None, None, Some(_)) => {
                return Err(AppError::config(
                    "SEARCH_PASSWORD is set but SEARCH_USERNAME is not",
                ))
            }
            (None, None, None) => {}
        }

        Ok(Self {
            connection,
            index: var("SEARCH_INDEX").unwrap_or_else(|| DEFAULT_INDEX.to_string()),
            scratch_index: var("SEARCH_SCRATCH_INDEX")
                .unwrap_or_else(|| DEFAULT_SCRATCH_INDEX.to_string()),
        })
    }
}

fn parse_bool(key: &str, raw: &str) -> Result<bool, AppError> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(AppError::config(format!(
            "{} must be true or false, got '{}'",
            key, raw
        ))),
    }
}
