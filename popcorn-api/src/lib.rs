mod config;
pub mod endpoints;
mod error;
pub mod repositories;
mod session;

pub use crate::config::ClientConfig;
pub use crate::error::ApiError;
pub use crate::session::{SessionClient, SessionError};
pub use endpoints::{auth::Session, movies::Movie, ApiRequest, MovieId};
use endpoints::RequestData;
use repositories::*;
use serde::de::DeserializeOwned;

/// Cookie-carrying HTTP client bound to one [`ClientConfig`]
pub struct Client {
    inner: reqwest::Client,
    config: ClientConfig,
}

impl Client {
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let inner = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(config.timeout())
            .build()?;

        Ok(Self { inner, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Send `request` and decode its JSON body
    pub async fn send<R>(&self, request: R) -> Result<R::Response, ApiError>
    where
        R: ApiRequest,
    {
        let body = self.fetch(request).await?;
        decode_body(&body)
    }

    /// Send `request` and only check its status. The body of a 2xx response
    /// is discarded unread, whatever its content type.
    pub async fn execute<R>(&self, request: R) -> Result<(), ApiError>
    where
        R: ApiRequest,
    {
        self.fetch(request).await.map(|_| ())
    }

    async fn fetch<R>(&self, request: R) -> Result<Vec<u8>, ApiError>
    where
        R: ApiRequest,
    {
        let endpoint = request.endpoint();
        let url = self.config.url_for(&endpoint);
        tracing::debug!("{} {}", R::METHOD, endpoint);

        let builder = self.inner.request(R::METHOD, url.as_str());
        let builder = match request.data() {
            RequestData::Empty => builder,
            RequestData::Query(query) => builder.query(query),
        };

        let response = builder.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(ApiError::Status {
                status,
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        Ok(body.to_vec())
    }
}

/// Decode a response body; an empty body reads as JSON `null`
fn decode_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    let body: &[u8] = if body.iter().all(u8::is_ascii_whitespace) {
        b"null"
    } else {
        body
    };

    serde_json::from_slice(body).map_err(From::from)
}

pub struct Request;

impl Request {
    pub fn auth() -> AuthRepository {
        AuthRepository::new()
    }

    pub fn movies() -> MovieRepository {
        MovieRepository::new()
    }
}
