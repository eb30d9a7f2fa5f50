use crate::error::ApiError;
use std::time::Duration;
use url::Url;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_PROVIDER: &str = "google";

/// Fixed addressing and credential policy for every backend call.
///
/// Built once at start-up and handed to [`crate::SessionClient`]; there is no
/// way to change it afterwards. Credentials are always the session cookie
/// (same-origin policy), never a bearer token or CSRF header.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    base_url: Url,
    timeout: Duration,
    provider: String,
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url)?;

        Ok(Self {
            base_url,
            timeout: DEFAULT_TIMEOUT,
            provider: DEFAULT_PROVIDER.to_string(),
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = provider.into();
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Identity provider registration id used in provider-specific paths
    pub fn provider(&self) -> &str {
        &self.provider
    }

    /// Absolute URL for an endpoint path. The base may carry a path prefix
    /// (e.g. `/api`), so this appends rather than resolving.
    pub fn url_for(&self, endpoint: &str) -> String {
        format!(
            "{}{}",
            self.base_url.as_str().trim_end_matches('/'),
            endpoint
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_for_keeps_path_prefix() {
        let config = ClientConfig::new("http://localhost:8080/api").unwrap();
        assert_eq!(
            config.url_for("/auth/user"),
            "http://localhost:8080/api/auth/user"
        );

        let config = ClientConfig::new("http://localhost:8080/api/").unwrap();
        assert_eq!(
            config.url_for("/movies/popular"),
            "http://localhost:8080/api/movies/popular"
        );
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::new("http://localhost:8080").unwrap();
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert_eq!(config.provider(), "google");
        assert_eq!(config.url_for("/auth/user"), "http://localhost:8080/auth/user");
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            ClientConfig::new("not a url"),
            Err(ApiError::InvalidBaseUrl(_))
        ));
    }
}
