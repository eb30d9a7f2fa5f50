use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Could not open browser: {0}")]
    Browser(#[source] std::io::Error),

    #[error("Invalid location: {0}")]
    Location(#[from] url::ParseError),

    #[error("API client error: {0}")]
    Api(#[from] popcorn_api::ApiError),
}

impl From<config::ConfigError> for AuthError {
    fn from(err: config::ConfigError) -> Self {
        AuthError::Configuration(err.to_string())
    }
}
