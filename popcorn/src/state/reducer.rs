use super::{AppState, LoadingState};
use crate::events::{BackgroundJob, DataEvent};

/// Pure state transition function for data events
///
/// Session outcomes are handed to the auth controller, which owns every
/// change to the view. Follow-up work is queued on the state, never run here.
pub fn reduce_data_event(state: &mut AppState, event: DataEvent) {
    match event {
        // Session probe
        DataEvent::SessionProbed { ticket, session } => {
            if state
                .auth
                .probe_resolved(ticket, Ok(session), &mut state.view)
            {
                state.session_loading = LoadingState::Loaded;
            }
        }

        DataEvent::SessionProbeFailed { ticket, error } => {
            if state
                .auth
                .probe_resolved(ticket, Err(error.clone()), &mut state.view)
            {
                state.session_loading = LoadingState::Error(error);
            }
        }

        // Code exchange
        DataEvent::CodeExchanged { ticket, session } => {
            let applied = state.auth.is_current(ticket);
            let fetch =
                state
                    .auth
                    .exchange_resolved(ticket, Ok(session), &mut state.view, &mut state.router);
            if applied {
                state.session_loading = LoadingState::Loaded;
            }
            if let Some(ticket) = fetch {
                state.movies_loading = LoadingState::loading();
                state.enqueue(BackgroundJob::FetchMovies { ticket });
            }
        }

        DataEvent::CodeExchangeFailed { ticket, error } => {
            let applied = state.auth.is_current(ticket);
            state.auth.exchange_resolved(
                ticket,
                Err(error.clone()),
                &mut state.view,
                &mut state.router,
            );
            if applied {
                state.session_loading = LoadingState::Error(error);
            }
        }

        // Logout
        DataEvent::LoggedOut { ticket } => {
            if state.auth.logout_resolved(ticket, Ok(()), &mut state.view) {
                state.session_loading = LoadingState::Loaded;
                clear_movies(state);
            }
        }

        DataEvent::LogoutFailed { ticket, error } => {
            if state
                .auth
                .logout_resolved(ticket, Err(error.clone()), &mut state.view)
            {
                state.session_loading = LoadingState::Error(error);
                clear_movies(state);
            }
        }

        // Movies
        DataEvent::MoviesLoaded { ticket, movies } => {
            if state
                .auth
                .items_resolved(ticket, Ok(movies), &mut state.view)
            {
                state.movies_loading = LoadingState::Loaded;
                let count = state.view.items().len();
                if state.home.selected_movie_index >= count {
                    state.home.selected_movie_index = count.saturating_sub(1);
                }
            }
        }

        DataEvent::MoviesLoadFailed { ticket, error } => {
            if state
                .auth
                .items_resolved(ticket, Err(error.clone()), &mut state.view)
            {
                state.movies_loading = LoadingState::Error(error);
            }
        }

        // Provider hand-off
        DataEvent::AuthorizationPageOpened => {
            tracing::info!("Waiting for the provider to redirect back");
        }

        DataEvent::AuthorizationPageFailed { error } => {
            tracing::error!("Could not open authorization page: {}", error);
            state.auth.login_failed(&mut state.view);
        }
    }
}

/// Logout emptied the list; a fetch still in flight will be dropped
fn clear_movies(state: &mut AppState) {
    state.home.selected_movie_index = 0;
    if state.movies_loading.is_loading() {
        state.movies_loading = LoadingState::NotStarted;
    }
}
