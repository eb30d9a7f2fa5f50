use popcorn_api::{Movie, Session};

/// Presentation-facing state. Only [`crate::AuthController`] changes it;
/// everything else reads.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    pub(crate) current_user: Option<Session>,
    pub(crate) error_message: Option<String>,
    pub(crate) items: Vec<Movie>,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_user(&self) -> Option<&Session> {
        self.current_user.as_ref()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn items(&self) -> &[Movie] {
        &self.items
    }

    pub fn greeting(&self) -> String {
        let name = match &self.current_user {
            Some(session) => session.display_name().unwrap_or("User"),
            None => "Guest",
        };
        format!("Welcome, {}!", name)
    }

    pub fn auth_control(&self) -> AuthControl {
        AuthControl::for_view(self)
    }
}

/// The single authentication control shown for a view: login while
/// anonymous, logout while signed in, never both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthControl {
    Login,
    Logout,
}

impl AuthControl {
    pub fn for_view(view: &ViewState) -> Self {
        if view.current_user.is_some() {
            AuthControl::Logout
        } else {
            AuthControl::Login
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AuthControl::Login => "Login",
            AuthControl::Logout => "Logout",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guest_view() {
        let view = ViewState::new();
        assert_eq!(view.greeting(), "Welcome, Guest!");
        assert_eq!(view.auth_control(), AuthControl::Login);
        assert!(view.items().is_empty());
        assert!(view.error_message().is_none());
    }

    #[test]
    fn test_signed_in_view() {
        let view = ViewState {
            current_user: Some(Session::authenticated("Ada")),
            ..Default::default()
        };
        assert_eq!(view.greeting(), "Welcome, Ada!");
        assert_eq!(view.auth_control(), AuthControl::Logout);
    }

    #[test]
    fn test_signed_in_without_name() {
        let mut session = Session::authenticated("x");
        session.name = None;
        let view = ViewState {
            current_user: Some(session),
            ..Default::default()
        };
        assert_eq!(view.greeting(), "Welcome, User!");
    }
}
