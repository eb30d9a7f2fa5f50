use popcorn_api::{Movie, Session};
use popcorn_auth::{PendingAuthorization, Ticket};

/// Commands to execute (user actions → state transitions and background jobs)
#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    // Session lifecycle
    LoadPage,
    VisitLocation(String),
    StartLogin,
    Logout,

    // Data loading
    LoadMovies,

    // Redirect URL entry
    EnterCallbackMode,
    ExitCallbackMode,
    AppendCallbackText(String),
    DeleteCallbackChar,
    SubmitCallback,

    // Movie list selection
    SelectNext,
    SelectPrevious,
    NavigateToTop,
    NavigateToBottom,

    // Navigation
    NavigateBack,
    NavigateToLogs,

    // Log screen
    ScrollLogsUp,
    ScrollLogsDown,
    ScrollLogsPageUp,
    ScrollLogsPageDown,

    // Key sequence state
    SetPendingKey(char),
    ClearPendingKey,

    ToggleHelp,

    // System
    Quit,
}

/// Side effects requested by a state transition, run off the event loop
#[derive(Debug)]
pub enum BackgroundJob {
    ProbeSession {
        ticket: Ticket,
    },
    ExchangeCode {
        ticket: Ticket,
        pending: PendingAuthorization,
    },
    Logout {
        ticket: Ticket,
    },
    FetchMovies {
        ticket: Ticket,
    },
    OpenAuthorizationPage,
}

/// Where a job runs. A new job in an occupied slot replaces the old one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskSlot {
    /// Probe, exchange and logout; the controller allows one at a time
    Session,
    Movies,
    Browser,
}

impl BackgroundJob {
    pub fn slot(&self) -> TaskSlot {
        match self {
            Self::ProbeSession { .. } | Self::ExchangeCode { .. } | Self::Logout { .. } => {
                TaskSlot::Session
            }
            Self::FetchMovies { .. } => TaskSlot::Movies,
            Self::OpenAuthorizationPage => TaskSlot::Browser,
        }
    }
}

/// Events from background tasks (responses to jobs)
#[derive(Debug, Clone)]
pub enum DataEvent {
    // Session probe
    SessionProbed {
        ticket: Ticket,
        session: Session,
    },
    SessionProbeFailed {
        ticket: Ticket,
        error: String,
    },

    // Code exchange
    CodeExchanged {
        ticket: Ticket,
        session: Session,
    },
    CodeExchangeFailed {
        ticket: Ticket,
        error: String,
    },

    // Logout
    LoggedOut {
        ticket: Ticket,
    },
    LogoutFailed {
        ticket: Ticket,
        error: String,
    },

    // Movies
    MoviesLoaded {
        ticket: Ticket,
        movies: Vec<Movie>,
    },
    MoviesLoadFailed {
        ticket: Ticket,
        error: String,
    },

    // Provider hand-off
    AuthorizationPageOpened,
    AuthorizationPageFailed {
        error: String,
    },
}
