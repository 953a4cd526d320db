//! Connection configuration for the search service.

use std::fmt;
use std::time::Duration;

use url::Url;

use crate::errors::SearchError;

/// Default search service URL.
pub const DEFAULT_URL: &str = "http://localhost:9200";

/// Default transport timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Credentials presented to the search service.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    Basic { username: String, password: String },
    Bearer(String),
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
            Credentials::Bearer(_) => f.debug_tuple("Bearer").field(&"<redacted>").finish(),
        }
    }
}

/// How to reach the search service.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionConfig {
    /// One or more endpoints. Several endpoints are used round-robin.
    pub endpoints: Vec<Url>,
    pub credentials: Option<Credentials>,
    /// Applied to every request; `None` leaves the transport default.
    pub timeout: Option<Duration>,
    /// Make writes visible to reads before the write call returns.
    pub refresh_on_write: bool,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            endpoints: Url::parse(DEFAULT_URL).into_iter().collect(),
            credentials: None,
            timeout: Some(DEFAULT_TIMEOUT),
            refresh_on_write: false,
        }
    }
}

impl ConnectionConfig {
    /// Create a config for the given endpoint URLs.
    pub fn new<I, S>(endpoints: I) -> Result<Self, SearchError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let endpoints = endpoints
            .into_iter()
            .map(|raw| {
                let raw = raw.as_ref().trim();
                let url = Url::parse(raw).map_err(|e| {
                    SearchError::validation(format!("Invalid endpoint URL '{}': {}", raw, e))
                })?;
                // `host:port` parses with the host as the scheme.
                if !matches!(url.scheme(), "http" | "https") || url.host().is_none() {
                    return Err(SearchError::validation(format!(
                        "Invalid endpoint URL '{}': expected http://host[:port] or https://host[:port]",
                        raw
                    )));
                }
                Ok(url)
            })
            .collect::<Result<Vec<_>, _>>()?;

        if endpoints.is_empty() {
            return Err(SearchError::validation("At least one endpoint is required"));
        }

        Ok(Self {
            endpoints,
            ..Self::default()
        })
    }

    /// Authenticate with a username and password.
    pub fn with_basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials = Some(Credentials::Basic {
            username: username.into(),
            password: password.into(),
        });
        self
    }

    /// Authenticate with a bearer token.
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.credentials = Some(Credentials::Bearer(token.into()));
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_refresh_on_write(mut self, refresh_on_write: bool) -> Self {
        self.refresh_on_write = refresh_on_write;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ConnectionConfig::default();
        assert_eq!(config.endpoints.len(), 1);
        assert_eq!(config.endpoints[0].as_str(), "http://localhost:9200/");
        assert_eq!(config.timeout, Some(DEFAULT_TIMEOUT));
        assert!(config.credentials.is_none());
        assert!(!config.refresh_on_write);
    }

    #[test]
    fn test_multiple_endpoints() {
        let config =
            ConnectionConfig::new(["http://node-1:9200", " http://node-2:9200 "]).unwrap();
        assert_eq!(config.endpoints.len(), 2);
        assert_eq!(config.endpoints[1].host_str(), Some("node-2"));
    }

    #[test]
    fn test_invalid_endpoints() {
        for raw in ["not a url", "localhost:9200", "ftp://node-1:21", "http://"] {
            let err = ConnectionConfig::new([raw]).unwrap_err();
            assert!(matches!(err, SearchError::ValidationError(_)), "{}", raw);
        }

        assert!(ConnectionConfig::new(["https://search.internal"]).is_ok());

        let err = ConnectionConfig::new(Vec::<String>::new()).unwrap_err();
        assert!(matches!(err, SearchError::ValidationError(_)));
    }

    #[test]
    fn test_credentials_are_redacted() {
        let config = ConnectionConfig::default().with_basic_auth("elastic", "elastic123");
        let printed = format!("{:?}", config);
        assert!(printed.contains("elastic"));
        assert!(!printed.contains("elastic123"));

        let config = ConnectionConfig::default().with_bearer_token("s3cr3t-token");
        assert!(!format!("{:?}", config).contains("s3cr3t-token"));
    }
}
