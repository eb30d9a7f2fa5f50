use popcorn_api::ClientConfig;

use crate::error::AuthError;

/// Where the browser must go to start the provider flow.
///
/// This is a full-page navigation handled by the backend, not an API call.
pub fn authorization_url(config: &ClientConfig) -> String {
    config.url_for(&format!("/oauth2/authorization/{}", config.provider()))
}

/// Open the provider flow in the system browser
pub fn open_authorization_page(url: &str) -> Result<(), AuthError> {
    tracing::info!("Opening browser at {}", url);
    open::that(url).map_err(AuthError::Browser)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorization_url() {
        let config = ClientConfig::new("http://localhost:8080/api").unwrap();
        assert_eq!(
            authorization_url(&config),
            "http://localhost:8080/api/oauth2/authorization/google"
        );

        let config = config.with_provider("github");
        assert_eq!(
            authorization_url(&config),
            "http://localhost:8080/api/oauth2/authorization/github"
        );
    }
}
