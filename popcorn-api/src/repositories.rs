use crate::endpoints::{
    auth::{ExchangeCode, GetCurrentUser, Logout},
    movies::ListPopularMovies,
};

pub struct AuthRepository;

impl AuthRepository {
    pub fn new() -> Self {
        Self {}
    }

    pub fn user(&self) -> GetCurrentUser {
        GetCurrentUser::new()
    }

    pub fn exchange_code(
        &self,
        provider: impl Into<String>,
        code: impl Into<String>,
    ) -> ExchangeCode {
        ExchangeCode::new(provider, code)
    }

    pub fn logout(&self) -> Logout {
        Logout::new()
    }
}

pub struct MovieRepository;

impl MovieRepository {
    pub fn new() -> Self {
        Self {}
    }

    pub fn popular(&self) -> ListPopularMovies {
        ListPopularMovies::new()
    }
}
