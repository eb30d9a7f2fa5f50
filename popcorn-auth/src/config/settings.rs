use config::{Config, ConfigError, Environment, File, Source};
use popcorn_api::{ApiError, ClientConfig};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Settings {
    /// Backend base address, including any path prefix
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Root URL of this client; the provider redirects back here
    #[serde(default = "default_app_url")]
    pub app_url: String,

    #[serde(default = "default_provider")]
    pub provider: String,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_api_base_url() -> String {
    "http://localhost:8080/api".to_string()
}

fn default_app_url() -> String {
    "http://localhost:3000/".to_string()
}

fn default_provider() -> String {
    "google".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var("POPCORN_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
        Self::from_path(&config_path)
    }

    pub fn from_path(config_path: &str) -> Result<Self, ConfigError> {
        Self::build(File::with_name(config_path).required(false))
    }

    fn build<S>(file: S) -> Result<Self, ConfigError>
    where
        S: Source + Send + Sync + 'static,
    {
        let settings = Config::builder()
            .add_source(file)
            .add_source(Environment::with_prefix("POPCORN").separator("__"))
            .build()?;

        settings.try_deserialize()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.api_base_url.is_empty() {
            return Err("api_base_url is required".to_string());
        }
        if !self.api_base_url.starts_with("http") {
            return Err("api_base_url must be a valid HTTP(S) URL".to_string());
        }
        if !self.app_url.starts_with("http") {
            return Err("app_url must be a valid HTTP(S) URL".to_string());
        }
        if self.provider.trim().is_empty() {
            return Err("provider must not be empty".to_string());
        }
        if self.request_timeout_secs == 0 {
            return Err("request_timeout_secs must be greater than zero".to_string());
        }
        Ok(())
    }

    /// The immutable client configuration shared by every backend call
    pub fn client_config(&self) -> Result<ClientConfig, ApiError> {
        Ok(ClientConfig::new(&self.api_base_url)?
            .with_timeout(Duration::from_secs(self.request_timeout_secs))
            .with_provider(self.provider.clone()))
    }
}
