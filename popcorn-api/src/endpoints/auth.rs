use super::{ApiRequest, RequestData};
use reqwest::Method;
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::borrow::Cow;

// Common

/// The server's view of the current principal, as last reported
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub authenticated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Any additional profile fields the backend chooses to return
    #[serde(flatten)]
    pub profile: Map<String, Value>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self {
            authenticated: false,
            name: None,
            profile: Map::new(),
        }
    }

    pub fn authenticated(name: impl Into<String>) -> Self {
        Self {
            authenticated: true,
            name: Some(name.into()),
            profile: Map::new(),
        }
    }

    /// Name of the principal. Always `None` for an unauthenticated session.
    pub fn display_name(&self) -> Option<&str> {
        if self.authenticated {
            self.name.as_deref()
        } else {
            None
        }
    }

    pub fn profile_field(&self, key: &str) -> Option<&Value> {
        if self.authenticated {
            self.profile.get(key)
        } else {
            None
        }
    }
}

// Requests

/// Session probe ("who am I")
#[derive(Default, Debug, Clone, Serialize)]
pub struct GetCurrentUser;

impl GetCurrentUser {
    pub fn new() -> Self {
        Self
    }
}

impl ApiRequest for GetCurrentUser {
    type Response = Session;

    fn endpoint(&self) -> Cow<'_, str> {
        "/auth/user".into()
    }
}

/// Exchange of a provider authorization code for a server session
#[derive(Clone, Serialize)]
pub struct ExchangeCode {
    #[serde(skip)]
    provider: String,
    code: String,
}

impl ExchangeCode {
    pub fn new(provider: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            code: code.into(),
        }
    }
}

impl std::fmt::Debug for ExchangeCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExchangeCode")
            .field("provider", &self.provider)
            .field("code", &"[REDACTED]")
            .finish()
    }
}

impl ApiRequest for ExchangeCode {
    type Response = Session;

    fn endpoint(&self) -> Cow<'_, str> {
        format!("/login/oauth2/code/{}", self.provider).into()
    }

    fn data(&self) -> RequestData<&Self> {
        RequestData::Query(self)
    }
}

/// Session-cookie-only logout; no anti-forgery token is attached.
/// Sent with [`crate::Client::execute`], so the body is never decoded.
#[derive(Default, Debug, Clone, Serialize)]
pub struct Logout;

impl Logout {
    pub fn new() -> Self {
        Self
    }
}

impl ApiRequest for Logout {
    type Response = IgnoredAny;

    const METHOD: Method = Method::POST;

    fn endpoint(&self) -> Cow<'_, str> {
        "/auth/logout".into()
    }
}
