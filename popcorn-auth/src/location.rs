//! The client's URL surface: the current location, the routes it can name,
//! and the one-time `code` parameter the identity provider hands back.

use secrecy::SecretString;
use std::fmt::Display;
use url::Url;

const CODE_PARAM: &str = "code";

/// One-time authorization code carried by the provider's redirect
#[derive(Debug)]
pub struct PendingAuthorization {
    code: SecretString,
}

impl PendingAuthorization {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: SecretString::from(code.into()),
        }
    }

    pub fn code(&self) -> &SecretString {
        &self.code
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    /// Landing target some backends redirect to after login; it only
    /// forwards to `Home`.
    LoginSuccess,
    Unknown,
}

impl Route {
    /// Resolve a path against the client's root path
    pub fn resolve(path: &str, root_path: &str) -> Route {
        let root = root_path.trim_end_matches('/');
        let Some(rest) = path.strip_prefix(root) else {
            return Route::Unknown;
        };

        match rest.trim_matches('/') {
            "" => Route::Home,
            "login-success" => Route::LoginSuccess,
            _ => Route::Unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location(Url);

impl Location {
    pub fn parse(input: &str) -> Result<Self, url::ParseError> {
        Url::parse(input).map(Self)
    }

    pub fn url(&self) -> &Url {
        &self.0
    }

    pub fn query_param(&self, key: &str) -> Option<String> {
        self.0
            .query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }

    /// The authorization code, if this location carries a non-empty one
    pub fn pending_authorization(&self) -> Option<PendingAuthorization> {
        self.query_param(CODE_PARAM)
            .filter(|code| !code.is_empty())
            .map(PendingAuthorization::new)
    }

    pub fn has_authorization_code(&self) -> bool {
        self.0.query_pairs().any(|(k, _)| k == CODE_PARAM)
    }

    /// Same location with every `code` parameter removed; other parameters
    /// are kept and an emptied query is dropped.
    pub fn without_code(&self) -> Location {
        let remaining: Vec<(String, String)> = self
            .0
            .query_pairs()
            .filter(|(k, _)| k != CODE_PARAM)
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        let mut url = self.0.clone();
        if remaining.is_empty() {
            url.set_query(None);
        } else {
            url.query_pairs_mut().clear().extend_pairs(remaining);
        }
        Location(url)
    }

    fn join(&self, input: &str) -> Result<Location, url::ParseError> {
        self.0.join(input).map(Location)
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// In-memory stand-in for the browser history: holds the current location
/// and applies the client's redirect rules.
#[derive(Debug, Clone)]
pub struct Router {
    root: Location,
    current: Location,
}

impl Router {
    pub fn new(app_url: &str) -> Result<Self, url::ParseError> {
        let mut root = Location::parse(app_url)?;
        root.0.set_query(None);
        root.0.set_fragment(None);

        Ok(Self {
            current: root.clone(),
            root,
        })
    }

    pub fn root(&self) -> &Location {
        &self.root
    }

    pub fn current(&self) -> &Location {
        &self.current
    }

    pub fn route_of(&self, location: &Location) -> Route {
        if location.url().origin() != self.root.url().origin() {
            return Route::Unknown;
        }
        Route::resolve(location.url().path(), self.root.url().path())
    }

    /// Navigate to an absolute URL or a path relative to the client root.
    ///
    /// Returns the route that was asked for. Anything other than `Home`
    /// redirects to the root and loses its query.
    pub fn visit(&mut self, input: &str) -> Result<Route, url::ParseError> {
        let location = self.root.join(input.trim())?;
        let route = self.route_of(&location);

        match route {
            Route::Home => self.current = location,
            Route::LoginSuccess | Route::Unknown => {
                tracing::debug!("Redirecting {} to {}", location, self.root);
                self.current = self.root.clone();
            }
        }

        Ok(route)
    }

    /// Rewrite the current location in place (no new history entry)
    pub fn replace(&mut self, location: Location) {
        self.current = location;
    }

    /// Drop a consumed authorization code from the current location.
    /// Returns true if the location changed.
    pub fn strip_authorization_code(&mut self) -> bool {
        if !self.current.has_authorization_code() {
            return false;
        }
        let stripped = self.current.without_code();
        tracing::debug!("Rewriting location to {}", stripped);
        self.replace(stripped);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    fn router() -> Router {
        Router::new("http://localhost:3000/").unwrap()
    }

    #[test]
    fn test_route_resolution() {
        assert_eq!(Route::resolve("/", "/"), Route::Home);
        assert_eq!(Route::resolve("/login-success", "/"), Route::LoginSuccess);
        assert_eq!(Route::resolve("/movies/12", "/"), Route::Unknown);

        assert_eq!(Route::resolve("/app", "/app/"), Route::Home);
        assert_eq!(Route::resolve("/app/login-success/", "/app/"), Route::LoginSuccess);
        assert_eq!(Route::resolve("/application", "/app/"), Route::Unknown);
        assert_eq!(Route::resolve("/other", "/app/"), Route::Unknown);
    }

    #[test]
    fn test_pending_authorization_extracted_from_query() {
        let location = Location::parse("http://localhost:3000/?code=abc123&scope=email").unwrap();
        let pending = location.pending_authorization().unwrap();
        assert_eq!(pending.code().expose_secret(), "abc123");
    }

    #[test]
    fn test_empty_code_is_not_pending() {
        let location = Location::parse("http://localhost:3000/?code=").unwrap();
        assert!(location.pending_authorization().is_none());
        assert!(location.has_authorization_code());
    }

    #[test]
    fn test_pending_authorization_debug_is_redacted() {
        let pending = PendingAuthorization::new("abc123");
        assert!(!format!("{:?}", pending).contains("abc123"));
    }

    #[test]
    fn test_without_code_keeps_other_params() {
        let location = Location::parse("http://localhost:3000/?code=abc&tab=popular").unwrap();
        assert_eq!(
            location.without_code().to_string(),
            "http://localhost:3000/?tab=popular"
        );

        let location = Location::parse("http://localhost:3000/?code=abc").unwrap();
        assert_eq!(location.without_code().to_string(), "http://localhost:3000/");
    }

    #[test]
    fn test_visit_relative_and_absolute() {
        let mut router = router();

        assert_eq!(router.visit("/?code=abc").unwrap(), Route::Home);
        assert_eq!(router.current().to_string(), "http://localhost:3000/?code=abc");

        assert_eq!(
            router.visit("http://localhost:3000/?code=def").unwrap(),
            Route::Home
        );
        assert_eq!(router.current().query_param("code").as_deref(), Some("def"));
    }

    #[test]
    fn test_login_success_redirects_to_root() {
        let mut router = router();
        assert_eq!(router.visit("/login-success").unwrap(), Route::LoginSuccess);
        assert_eq!(router.current(), router.root());
    }

    #[test]
    fn test_unknown_route_redirects_and_drops_query() {
        let mut router = router();
        assert_eq!(router.visit("/nowhere?code=abc").unwrap(), Route::Unknown);
        assert_eq!(router.current(), router.root());
        assert!(router.current().pending_authorization().is_none());
    }

    #[test]
    fn test_foreign_origin_is_unknown() {
        let mut router = router();
        assert_eq!(
            router.visit("https://evil.example.com/?code=abc").unwrap(),
            Route::Unknown
        );
        assert_eq!(router.current(), router.root());
    }

    #[test]
    fn test_strip_authorization_code() {
        let mut router = router();
        router.visit("/?code=abc").unwrap();

        assert!(router.strip_authorization_code());
        assert_eq!(router.current().to_string(), "http://localhost:3000/");
        assert!(!router.strip_authorization_code());
    }

    #[test]
    fn test_root_drops_query_and_fragment() {
        let router = Router::new("http://localhost:3000/?code=abc#top").unwrap();
        assert_eq!(router.root().to_string(), "http://localhost:3000/");
    }
}
