// Authentication and session lifecycle for the popcorn client
mod authorize;
mod config;
mod controller;
mod error;
mod location;
mod view;

pub use authorize::{authorization_url, open_authorization_page};
pub use self::config::{load_settings, Settings};
pub use controller::{
    AuthController, AuthPhase, LoadPlan, Ticket, EXCHANGE_FAILED_MESSAGE, ITEMS_FAILED_MESSAGE,
    LOGIN_FAILED_MESSAGE, LOGOUT_FAILED_MESSAGE, PROBE_FAILED_MESSAGE,
};
pub use error::AuthError;
pub use location::{Location, PendingAuthorization, Route, Router};
pub use view::{AuthControl, ViewState};
