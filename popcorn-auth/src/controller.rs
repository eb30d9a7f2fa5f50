//! Authentication lifecycle state machine.
//!
//! The controller never talks to the network itself. It decides which
//! backend call a transition needs, stamps it with a [`Ticket`], and later
//! applies the outcome to [`ViewState`] and the [`Router`]. Outcomes carrying
//! a ticket from an older generation are dropped, which covers both
//! supersession (a new page load) and teardown ([`AuthController::invalidate`]).

use itertools::Itertools;
use popcorn_api::{Movie, Session};

use crate::location::{PendingAuthorization, Router};
use crate::view::ViewState;

pub const PROBE_FAILED_MESSAGE: &str = "Failed to fetch user information.";
pub const EXCHANGE_FAILED_MESSAGE: &str = "Failed to complete login. Please try again.";
pub const LOGOUT_FAILED_MESSAGE: &str = "Failed to logout. Please try again.";
pub const ITEMS_FAILED_MESSAGE: &str = "Failed to load movies. Please try again later.";
pub const LOGIN_FAILED_MESSAGE: &str = "Login failed. Please try again.";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum AuthPhase {
    #[default]
    Anonymous,
    ExchangingCode,
    Authenticated,
    LoggingOut,
}

/// Generation stamp for an in-flight backend call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

/// What a page load needs from the backend
#[derive(Debug)]
pub enum LoadPlan {
    ProbeSession(Ticket),
    ExchangeCode(Ticket, PendingAuthorization),
}

#[derive(Debug, Default, Clone)]
pub struct AuthController {
    phase: AuthPhase,
    generation: u64,
}

impl AuthController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> AuthPhase {
        self.phase
    }

    pub fn ticket(&self) -> Ticket {
        Ticket(self.generation)
    }

    /// An exchange or logout is in flight
    pub fn is_busy(&self) -> bool {
        matches!(self.phase, AuthPhase::ExchangingCode | AuthPhase::LoggingOut)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.generation
    }

    fn next_ticket(&mut self) -> Ticket {
        self.generation += 1;
        Ticket(self.generation)
    }

    /// Drop every in-flight outcome (the consumer of the view is gone)
    pub fn invalidate(&mut self) {
        let ticket = self.next_ticket();
        if self.is_busy() {
            self.phase = AuthPhase::Anonymous;
        }
        tracing::debug!(generation = ticket.0, "Auth controller invalidated");
    }

    /// Entry action for a (re)load of the current location.
    ///
    /// A pending code always wins: when one is present only the exchange is
    /// planned and no session probe is issued. Returns `None` while an
    /// exchange or logout is still in flight.
    pub fn page_load(&mut self, router: &Router, view: &mut ViewState) -> Option<LoadPlan> {
        if self.is_busy() {
            tracing::warn!(phase = ?self.phase, "Ignoring page load while a transition is in flight");
            return None;
        }

        view.error_message = None;
        let ticket = self.next_ticket();

        match router.current().pending_authorization() {
            Some(pending) => {
                tracing::info!("Authorization code present, exchanging");
                self.phase = AuthPhase::ExchangingCode;
                Some(LoadPlan::ExchangeCode(ticket, pending))
            }
            None => {
                tracing::info!("No authorization code, probing session");
                Some(LoadPlan::ProbeSession(ticket))
            }
        }
    }

    /// Apply the result of `GET /auth/user`. Returns true if it was applied.
    pub fn probe_resolved(
        &mut self,
        ticket: Ticket,
        result: Result<Session, String>,
        view: &mut ViewState,
    ) -> bool {
        if !self.is_current(ticket) {
            tracing::debug!(generation = ticket.0, "Dropping stale session probe");
            return false;
        }
        if self.phase == AuthPhase::ExchangingCode {
            tracing::debug!("Session probe superseded by code exchange");
            return false;
        }

        match result {
            Ok(session) if session.authenticated => {
                tracing::info!("Existing session found");
                self.phase = AuthPhase::Authenticated;
                view.current_user = Some(session);
            }
            Ok(_) => {
                tracing::info!("No existing session");
                self.phase = AuthPhase::Anonymous;
                view.current_user = None;
            }
            Err(error) => {
                // A failed probe says nothing about the session; keep the phase
                tracing::warn!("Session probe failed: {}", error);
                view.error_message = Some(PROBE_FAILED_MESSAGE.to_string());
            }
        }
        true
    }

    /// Apply the result of the code exchange.
    ///
    /// The code is stripped from the location whether or not the exchange
    /// succeeded. On success the returned ticket authorizes the follow-up
    /// items fetch.
    pub fn exchange_resolved(
        &mut self,
        ticket: Ticket,
        result: Result<Session, String>,
        view: &mut ViewState,
        router: &mut Router,
    ) -> Option<Ticket> {
        if !self.is_current(ticket) || self.phase != AuthPhase::ExchangingCode {
            tracing::debug!(generation = ticket.0, "Dropping stale code exchange");
            return None;
        }

        router.strip_authorization_code();

        match result {
            Ok(session) if session.authenticated => {
                tracing::info!("Code exchange established a session");
                self.phase = AuthPhase::Authenticated;
                view.current_user = Some(session);
                Some(ticket)
            }
            Ok(_) => {
                tracing::warn!("Code exchange answered without a session");
                self.fail_exchange(view);
                None
            }
            Err(error) => {
                tracing::warn!("Code exchange failed: {}", error);
                self.fail_exchange(view);
                None
            }
        }
    }

    fn fail_exchange(&mut self, view: &mut ViewState) {
        self.phase = AuthPhase::Anonymous;
        view.current_user = None;
        view.error_message = Some(EXCHANGE_FAILED_MESSAGE.to_string());
    }

    /// Start a logout. Only an authenticated session can log out.
    pub fn begin_logout(&mut self, view: &mut ViewState) -> Option<Ticket> {
        if self.phase != AuthPhase::Authenticated {
            tracing::debug!(phase = ?self.phase, "Logout ignored");
            return None;
        }

        view.error_message = None;
        self.phase = AuthPhase::LoggingOut;
        Some(self.next_ticket())
    }

    /// Apply the logout outcome. Local state is cleared either way; a
    /// failure is still reported. A new generation starts, so a fetch issued
    /// while the logout was in flight cannot repopulate the items.
    pub fn logout_resolved(
        &mut self,
        ticket: Ticket,
        result: Result<(), String>,
        view: &mut ViewState,
    ) -> bool {
        if !self.is_current(ticket) {
            tracing::debug!(generation = ticket.0, "Dropping stale logout");
            return false;
        }

        self.next_ticket();
        self.phase = AuthPhase::Anonymous;
        view.current_user = None;
        view.items.clear();

        if let Err(error) = result {
            tracing::warn!("Logout failed, local session cleared anyway: {}", error);
            view.error_message = Some(LOGOUT_FAILED_MESSAGE.to_string());
        } else {
            tracing::info!("Logged out");
        }
        true
    }

    /// Start an items fetch in the current generation
    pub fn begin_fetch(&self, view: &mut ViewState) -> Ticket {
        view.error_message = None;
        self.ticket()
    }

    /// Apply an items fetch. A failure never touches the session or the
    /// items already shown.
    pub fn items_resolved(
        &self,
        ticket: Ticket,
        result: Result<Vec<Movie>, String>,
        view: &mut ViewState,
    ) -> bool {
        if !self.is_current(ticket) {
            tracing::debug!(generation = ticket.0, "Dropping stale items fetch");
            return false;
        }

        match result {
            Ok(movies) => {
                let received = movies.len();
                let movies: Vec<Movie> = movies
                    .into_iter()
                    .unique_by(|movie| movie.id.clone())
                    .collect();
                if movies.len() < received {
                    tracing::warn!(
                        "Dropped {} movies with duplicate ids",
                        received - movies.len()
                    );
                }
                view.items = movies;
            }
            Err(error) => {
                tracing::warn!("Items fetch failed: {}", error);
                view.error_message = Some(ITEMS_FAILED_MESSAGE.to_string());
            }
        }
        true
    }

    /// Start the provider hand-off. Refused while a user is signed in.
    pub fn begin_login(&self, view: &mut ViewState) -> bool {
        if view.current_user.is_some() {
            return false;
        }
        view.error_message = None;
        true
    }

    /// The provider hand-off could not be started
    pub fn login_failed(&self, view: &mut ViewState) {
        view.error_message = Some(LOGIN_FAILED_MESSAGE.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use popcorn_api::MovieId;
    use secrecy::ExposeSecret;

    fn router_at(url: &str) -> Router {
        let mut router = Router::new("http://localhost:3000/").unwrap();
        router.visit(url).unwrap();
        router
    }

    fn movie(id: i64, title: &str) -> Movie {
        Movie {
            id: MovieId::Number(id),
            title: title.to_string(),
            genre: Some("Drama".to_string()),
            poster_url: None,
        }
    }

    /// Controller and view after a successful probe
    fn signed_in() -> (AuthController, ViewState) {
        let mut controller = AuthController::new();
        let mut view = ViewState::new();
        let router = router_at("/");
        let Some(LoadPlan::ProbeSession(ticket)) = controller.page_load(&router, &mut view) else {
            panic!("expected probe");
        };
        controller.probe_resolved(ticket, Ok(Session::authenticated("Ada")), &mut view);
        (controller, view)
    }

    #[test]
    fn test_initial_state() {
        let controller = AuthController::new();
        assert_eq!(controller.phase(), AuthPhase::Anonymous);
    }

    #[test]
    fn test_load_without_code_probes() {
        let mut controller = AuthController::new();
        let mut view = ViewState::new();

        let plan = controller.page_load(&router_at("/"), &mut view);
        assert!(matches!(plan, Some(LoadPlan::ProbeSession(_))));
        assert_eq!(controller.phase(), AuthPhase::Anonymous);
    }

    #[test]
    fn test_probe_anonymous_stays_anonymous_without_error() {
        let mut controller = AuthController::new();
        let mut view = ViewState::new();
        let Some(LoadPlan::ProbeSession(ticket)) = controller.page_load(&router_at("/"), &mut view)
        else {
            panic!("expected probe");
        };

        assert!(controller.probe_resolved(ticket, Ok(Session::anonymous()), &mut view));
        assert_eq!(controller.phase(), AuthPhase::Anonymous);
        assert!(view.current_user().is_none());
        assert!(view.error_message().is_none());
    }

    #[test]
    fn test_probe_authenticated() {
        let (controller, view) = signed_in();
        assert_eq!(controller.phase(), AuthPhase::Authenticated);
        assert_eq!(view.greeting(), "Welcome, Ada!");
    }

    #[test]
    fn test_probe_network_error_is_not_logout() {
        let (mut controller, mut view) = signed_in();
        let Some(LoadPlan::ProbeSession(ticket)) = controller.page_load(&router_at("/"), &mut view)
        else {
            panic!("expected probe");
        };

        controller.probe_resolved(ticket, Err("connection reset".to_string()), &mut view);

        assert_eq!(controller.phase(), AuthPhase::Authenticated);
        assert!(view.current_user().is_some());
        assert_eq!(view.error_message(), Some(PROBE_FAILED_MESSAGE));
    }

    #[test]
    fn test_load_with_code_plans_exchange_only() {
        let mut controller = AuthController::new();
        let mut view = ViewState::new();

        let plan = controller.page_load(&router_at("/?code=abc123"), &mut view);
        match plan {
            Some(LoadPlan::ExchangeCode(_, pending)) => {
                assert_eq!(pending.code().expose_secret(), "abc123");
            }
            other => panic!("expected exchange, got {other:?}"),
        }
        assert_eq!(controller.phase(), AuthPhase::ExchangingCode);
    }

    #[test]
    fn test_exchange_success_strips_code_and_requests_fetch() {
        let mut controller = AuthController::new();
        let mut view = ViewState::new();
        let mut router = router_at("/?code=abc123");
        let Some(LoadPlan::ExchangeCode(ticket, _)) = controller.page_load(&router, &mut view)
        else {
            panic!("expected exchange");
        };

        let fetch = controller.exchange_resolved(
            ticket,
            Ok(Session::authenticated("Ada")),
            &mut view,
            &mut router,
        );

        assert_eq!(fetch, Some(ticket));
        assert_eq!(controller.phase(), AuthPhase::Authenticated);
        assert_eq!(view.greeting(), "Welcome, Ada!");
        assert!(router.current().query_param("code").is_none());
    }

    #[test]
    fn test_exchange_failure_strips_code() {
        let mut controller = AuthController::new();
        let mut view = ViewState::new();
        let mut router = router_at("/?code=expired");
        let Some(LoadPlan::ExchangeCode(ticket, _)) = controller.page_load(&router, &mut view)
        else {
            panic!("expected exchange");
        };

        let fetch = controller.exchange_resolved(
            ticket,
            Err("401 invalid_grant".to_string()),
            &mut view,
            &mut router,
        );

        assert_eq!(fetch, None);
        assert_eq!(controller.phase(), AuthPhase::Anonymous);
        assert_eq!(view.greeting(), "Welcome, Guest!");
        assert_eq!(view.error_message(), Some(EXCHANGE_FAILED_MESSAGE));
        assert!(!router.current().has_authorization_code());
    }

    #[test]
    fn test_reload_after_exchange_probes_instead() {
        let mut controller = AuthController::new();
        let mut view = ViewState::new();
        let mut router = router_at("/?code=abc123");
        let Some(LoadPlan::ExchangeCode(ticket, _)) = controller.page_load(&router, &mut view)
        else {
            panic!("expected exchange");
        };
        controller.exchange_resolved(
            ticket,
            Ok(Session::authenticated("Ada")),
            &mut view,
            &mut router,
        );

        let reload = controller.page_load(&router, &mut view);
        assert!(matches!(reload, Some(LoadPlan::ProbeSession(_))));
    }

    #[test]
    fn test_no_concurrent_exchange() {
        let mut controller = AuthController::new();
        let mut view = ViewState::new();
        let router = router_at("/?code=abc123");

        assert!(controller.page_load(&router, &mut view).is_some());
        assert!(controller.page_load(&router, &mut view).is_none());
    }

    #[test]
    fn test_exchange_wins_over_stale_probe() {
        let mut controller = AuthController::new();
        let mut view = ViewState::new();

        // Probe issued by an earlier load, still in flight
        let Some(LoadPlan::ProbeSession(probe)) = controller.page_load(&router_at("/"), &mut view)
        else {
            panic!("expected probe");
        };

        let mut router = router_at("/?code=abc123");
        let Some(LoadPlan::ExchangeCode(exchange, _)) = controller.page_load(&router, &mut view)
        else {
            panic!("expected exchange");
        };

        // Probe lands first while the exchange is in flight
        assert!(!controller.probe_resolved(probe, Ok(Session::anonymous()), &mut view));
        controller.exchange_resolved(
            exchange,
            Ok(Session::authenticated("Ada")),
            &mut view,
            &mut router,
        );
        // ...or after it
        assert!(!controller.probe_resolved(probe, Ok(Session::anonymous()), &mut view));

        assert_eq!(controller.phase(), AuthPhase::Authenticated);
        assert_eq!(view.greeting(), "Welcome, Ada!");
    }

    #[test]
    fn test_logout_success_clears_view() {
        let (mut controller, mut view) = signed_in();
        let fetch = controller.begin_fetch(&mut view);
        controller.items_resolved(fetch, Ok(vec![movie(1, "Heat")]), &mut view);

        let ticket = controller.begin_logout(&mut view).unwrap();
        assert_eq!(controller.phase(), AuthPhase::LoggingOut);
        assert!(controller.logout_resolved(ticket, Ok(()), &mut view));

        assert_eq!(controller.phase(), AuthPhase::Anonymous);
        assert!(view.current_user().is_none());
        assert!(view.items().is_empty());
        assert!(view.error_message().is_none());
    }

    #[test]
    fn test_logout_failure_is_fail_open() {
        let (mut controller, mut view) = signed_in();

        let ticket = controller.begin_logout(&mut view).unwrap();
        controller.logout_resolved(ticket, Err("connection refused".to_string()), &mut view);

        assert_eq!(controller.phase(), AuthPhase::Anonymous);
        assert!(view.current_user().is_none());
        assert_eq!(view.error_message(), Some(LOGOUT_FAILED_MESSAGE));
    }

    #[test]
    fn test_logout_requires_session() {
        let mut controller = AuthController::new();
        let mut view = ViewState::new();
        assert!(controller.begin_logout(&mut view).is_none());
        assert_eq!(controller.phase(), AuthPhase::Anonymous);
    }

    #[test]
    fn test_fetch_failure_is_isolated() {
        let (controller, mut view) = signed_in();
        let ticket = controller.begin_fetch(&mut view);
        controller.items_resolved(ticket, Ok(vec![movie(1, "Heat")]), &mut view);
        let before = view.clone();

        let ticket = controller.begin_fetch(&mut view);
        controller.items_resolved(ticket, Err("503".to_string()), &mut view);

        assert_eq!(view.current_user(), before.current_user());
        assert_eq!(view.items(), before.items());
        assert_eq!(view.error_message(), Some(ITEMS_FAILED_MESSAGE));
        assert_eq!(controller.phase(), AuthPhase::Authenticated);
    }

    #[test]
    fn test_fetch_drops_duplicate_ids() {
        let (controller, mut view) = signed_in();
        let ticket = controller.begin_fetch(&mut view);
        controller.items_resolved(
            ticket,
            Ok(vec![movie(1, "Heat"), movie(2, "Ran"), movie(1, "Heat again")]),
            &mut view,
        );

        let titles: Vec<_> = view.items().iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["Heat", "Ran"]);
    }

    #[test]
    fn test_fetch_started_before_logout_is_dropped() {
        let (mut controller, mut view) = signed_in();
        let fetch = controller.begin_fetch(&mut view);

        let logout = controller.begin_logout(&mut view).unwrap();
        controller.logout_resolved(logout, Ok(()), &mut view);

        assert!(!controller.items_resolved(fetch, Ok(vec![movie(1, "Heat")]), &mut view));
        assert!(view.items().is_empty());
    }

    #[test]
    fn test_fetch_started_during_logout_is_dropped() {
        let (mut controller, mut view) = signed_in();

        let logout = controller.begin_logout(&mut view).unwrap();
        let fetch = controller.begin_fetch(&mut view);
        assert!(controller.logout_resolved(logout, Ok(()), &mut view));

        assert!(!controller.items_resolved(fetch, Ok(vec![movie(1, "Heat")]), &mut view));
        assert!(view.current_user().is_none());
        assert!(view.items().is_empty());
    }

    #[test]
    fn test_logout_starts_new_generation() {
        let (mut controller, mut view) = signed_in();

        let logout = controller.begin_logout(&mut view).unwrap();
        controller.logout_resolved(logout, Err("timeout".to_string()), &mut view);

        assert!(controller.ticket().generation() > logout.generation());
        assert!(!controller.is_current(logout));
    }

    #[test]
    fn test_invalidate_drops_late_responses() {
        let mut controller = AuthController::new();
        let mut view = ViewState::new();
        let mut router = router_at("/?code=abc123");
        let Some(LoadPlan::ExchangeCode(ticket, _)) = controller.page_load(&router, &mut view)
        else {
            panic!("expected exchange");
        };

        controller.invalidate();
        let applied = controller.exchange_resolved(
            ticket,
            Ok(Session::authenticated("Ada")),
            &mut view,
            &mut router,
        );

        assert_eq!(applied, None);
        assert!(view.current_user().is_none());
        assert_eq!(controller.phase(), AuthPhase::Anonymous);
    }

    #[test]
    fn test_login_refused_when_signed_in() {
        let (controller, mut view) = signed_in();
        assert!(!controller.begin_login(&mut view));

        let controller = AuthController::new();
        let mut view = ViewState::new();
        assert!(controller.begin_login(&mut view));
        controller.login_failed(&mut view);
        assert_eq!(view.error_message(), Some(LOGIN_FAILED_MESSAGE));
    }
}
