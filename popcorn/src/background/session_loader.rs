use crate::events::{BackgroundJob, DataEvent};
use popcorn_api::SessionClient;
use popcorn_auth::{authorization_url, open_authorization_page, PendingAuthorization, Ticket};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Runs backend calls for background jobs and reports the outcome as
/// [`DataEvent`]s. Failures are logged here and only their message crosses
/// the channel.
#[derive(Clone)]
pub struct SessionLoader {
    pub client: Arc<SessionClient>,
    pub data_tx: mpsc::UnboundedSender<DataEvent>,
}

impl SessionLoader {
    pub fn new(client: Arc<SessionClient>, data_tx: mpsc::UnboundedSender<DataEvent>) -> Self {
        Self { client, data_tx }
    }

    /// Run one job to completion
    pub async fn run(&self, job: BackgroundJob) {
        match job {
            BackgroundJob::ProbeSession { ticket } => self.probe_session(ticket).await,
            BackgroundJob::ExchangeCode { ticket, pending } => {
                self.exchange_code(ticket, pending).await
            }
            BackgroundJob::Logout { ticket } => self.logout(ticket).await,
            BackgroundJob::FetchMovies { ticket } => self.fetch_movies(ticket).await,
            BackgroundJob::OpenAuthorizationPage => self.open_authorization_page().await,
        }
    }

    pub async fn probe_session(&self, ticket: Ticket) {
        tracing::info!(generation = ticket.generation(), "Probing session");
        let event = match self.client.get_current_session().await {
            Ok(session) => {
                tracing::info!("Session probe answered (authenticated={})", session.authenticated);
                DataEvent::SessionProbed { ticket, session }
            }
            Err(e) => {
                tracing::error!("Failed to fetch current session: {}", e);
                DataEvent::SessionProbeFailed {
                    ticket,
                    error: e.to_string(),
                }
            }
        };
        self.send(event);
    }

    pub async fn exchange_code(&self, ticket: Ticket, pending: PendingAuthorization) {
        tracing::info!(generation = ticket.generation(), "Exchanging authorization code");
        let event = match self.client.exchange_authorization_code(pending.code()).await {
            Ok(session) => DataEvent::CodeExchanged { ticket, session },
            Err(e) => {
                tracing::error!("Failed to exchange authorization code: {}", e);
                DataEvent::CodeExchangeFailed {
                    ticket,
                    error: e.to_string(),
                }
            }
        };
        self.send(event);
    }

    pub async fn logout(&self, ticket: Ticket) {
        tracing::info!(generation = ticket.generation(), "Logging out");
        let event = match self.client.logout().await {
            Ok(()) => DataEvent::LoggedOut { ticket },
            Err(e) => {
                tracing::error!("Failed to logout: {}", e);
                DataEvent::LogoutFailed {
                    ticket,
                    error: e.to_string(),
                }
            }
        };
        self.send(event);
    }

    pub async fn fetch_movies(&self, ticket: Ticket) {
        tracing::info!(generation = ticket.generation(), "Loading popular movies");
        let event = match self.client.fetch_items().await {
            Ok(movies) => {
                tracing::info!("Loaded {} movies from API", movies.len());
                DataEvent::MoviesLoaded { ticket, movies }
            }
            Err(e) => {
                tracing::error!("Failed to load movies from API: {}", e);
                DataEvent::MoviesLoadFailed {
                    ticket,
                    error: e.to_string(),
                }
            }
        };
        self.send(event);
    }

    /// Hand the user to the identity provider in the system browser
    pub async fn open_authorization_page(&self) {
        let url = authorization_url(self.client.config());
        let result = tokio::task::spawn_blocking(move || open_authorization_page(&url)).await;
        let event = match result {
            Ok(Ok(())) => DataEvent::AuthorizationPageOpened,
            Ok(Err(e)) => DataEvent::AuthorizationPageFailed {
                error: e.to_string(),
            },
            Err(e) => DataEvent::AuthorizationPageFailed {
                error: e.to_string(),
            },
        };
        self.send(event);
    }

    fn send(&self, event: DataEvent) {
        if self.data_tx.send(event).is_err() {
            tracing::debug!("Event loop gone, dropping data event");
        }
    }
}
