use crate::endpoints::{auth::Session, movies::Movie};
use crate::{ApiError, Client, ClientConfig, Request};
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

/// Failure of a session-level operation.
///
/// A failed probe is never reported as "not authenticated"; callers get
/// `Network` and decide for themselves.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Network error: {0}")]
    Network(#[source] ApiError),

    #[error("Authorization code exchange failed: {0}")]
    Exchange(#[source] ApiError),

    #[error("Authorization code exchange did not establish a session")]
    ExchangeDeclined,
}

/// Backend operations that need the session cookie
pub struct SessionClient {
    client: Client,
}

impl SessionClient {
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        Ok(Self {
            client: Client::new(config)?,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        self.client.config()
    }

    /// `GET /auth/user`
    pub async fn get_current_session(&self) -> Result<Session, SessionError> {
        let session = self
            .client
            .send(Request::auth().user())
            .await
            .map_err(SessionError::Network)?;

        tracing::debug!(authenticated = session.authenticated, "Session probe answered");
        Ok(session)
    }

    /// `GET /login/oauth2/code/{provider}?code=...`
    pub async fn exchange_authorization_code(
        &self,
        code: &SecretString,
    ) -> Result<Session, SessionError> {
        let req = Request::auth().exchange_code(self.config().provider(), code.expose_secret());
        let session = self
            .client
            .send(req)
            .await
            .map_err(SessionError::Exchange)?;

        if !session.authenticated {
            return Err(SessionError::ExchangeDeclined);
        }

        Ok(session)
    }

    /// `POST /auth/logout`. Any 2xx is a success; the body is not decoded.
    pub async fn logout(&self) -> Result<(), SessionError> {
        self.client
            .execute(Request::auth().logout())
            .await
            .map_err(|e| {
                tracing::debug!(status = ?e.status(), "Logout rejected");
                SessionError::Network(e)
            })
    }

    /// `GET /movies/popular`
    pub async fn fetch_items(&self) -> Result<Vec<Movie>, SessionError> {
        self.client
            .send(Request::movies().popular())
            .await
            .map_err(SessionError::Network)
    }
}
