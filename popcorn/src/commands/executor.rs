use crate::events::{AppCommand, BackgroundJob};
use crate::state::*;
use crate::ui::screens::Screen;
use popcorn_auth::LoadPlan;

/// Logs are paged 20 entries at a time
const LOG_PAGE_SIZE: usize = 20;

/// Execute a command against the app state
///
/// Commands never perform IO. Anything that needs the backend or the system
/// browser is queued as a [`BackgroundJob`] and picked up by the job handler.
pub fn execute_command(command: AppCommand, state: &mut AppState) {
    // Save whether we're setting a pending key (we don't want to clear it in that case)
    let is_setting_pending_key = matches!(command, AppCommand::SetPendingKey(_));

    match command {
        AppCommand::LoadPage => load_page(state),

        AppCommand::VisitLocation(input) => {
            if state.auth.is_busy() {
                tracing::warn!("Ignoring new location while a login or logout is in flight");
                state.home.callback_error =
                    Some("Wait for the current sign-in to finish".to_string());
            } else {
                match state.router.visit(&input) {
                    Ok(route) => {
                        tracing::info!("Visited {:?} route", route);
                        state.home.callback_error = None;
                        load_page(state);
                    }
                    Err(e) => {
                        tracing::warn!("Rejected location: {}", e);
                        state.home.callback_error = Some(format!("Invalid URL: {}", e));
                    }
                }
            }
        }

        AppCommand::StartLogin => {
            if state.auth.begin_login(&mut state.view) {
                tracing::info!("Starting provider login");
                state.enqueue(BackgroundJob::OpenAuthorizationPage);
            } else {
                tracing::debug!("Login ignored, already signed in");
            }
        }

        AppCommand::Logout => {
            if let Some(ticket) = state.auth.begin_logout(&mut state.view) {
                state.session_loading = LoadingState::loading();
                // The new generation orphans any movie fetch in flight
                if state.movies_loading.is_loading() {
                    state.movies_loading = LoadingState::NotStarted;
                }
                state.enqueue(BackgroundJob::Logout { ticket });
            }
        }

        AppCommand::LoadMovies => {
            let ticket = state.auth.begin_fetch(&mut state.view);
            state.movies_loading = LoadingState::loading();
            state.enqueue(BackgroundJob::FetchMovies { ticket });
        }

        AppCommand::EnterCallbackMode => {
            state.home.input_mode = InputMode::Callback;
            state.home.callback_input.clear();
            state.home.callback_error = None;
        }

        AppCommand::ExitCallbackMode => {
            state.home.input_mode = InputMode::Normal;
            state.home.callback_input.clear();
            state.home.callback_error = None;
        }

        AppCommand::AppendCallbackText(text) => {
            state.home.callback_input.push_str(&text);
        }

        AppCommand::DeleteCallbackChar => {
            state.home.callback_input.pop();
        }

        AppCommand::SubmitCallback => {
            let input = state.home.callback_input.trim().to_string();
            if input.is_empty() {
                state.home.callback_error = Some("Paste the URL you were redirected to".to_string());
            } else {
                execute_command(AppCommand::VisitLocation(input), state);
                if state.home.callback_error.is_none() {
                    state.home.input_mode = InputMode::Normal;
                    state.home.callback_input.clear();
                }
            }
        }

        AppCommand::SelectNext => {
            if let Screen::Home = state.current_screen() {
                let count = state.view.items().len();
                if count > 0 {
                    state.home.selected_movie_index = (state.home.selected_movie_index + 1) % count;
                }
            }
        }

        AppCommand::SelectPrevious => {
            if let Screen::Home = state.current_screen() {
                let count = state.view.items().len();
                if count > 0 {
                    if state.home.selected_movie_index == 0 {
                        state.home.selected_movie_index = count - 1;
                    } else {
                        state.home.selected_movie_index -= 1;
                    }
                }
            }
        }

        AppCommand::NavigateToTop => match state.current_screen_mut() {
            Screen::Home => state.home.selected_movie_index = 0,
            Screen::Logs(logs_state) => {
                logs_state.scroll_offset = logs_state.total_entries.saturating_sub(1)
            }
        },

        AppCommand::NavigateToBottom => {
            let count = state.view.items().len();
            match state.current_screen_mut() {
                Screen::Home => state.home.selected_movie_index = count.saturating_sub(1),
                Screen::Logs(logs_state) => logs_state.scroll_offset = 0,
            }
        }

        AppCommand::NavigateBack => {
            // Navigate back in history (pop from navigation stack)
            state.navigate_back();
        }

        AppCommand::NavigateToLogs => {
            // Navigate to logs screen (no logging to avoid feedback loop)
            if !matches!(state.current_screen(), Screen::Logs(_)) {
                state.navigate_to(Screen::Logs(LogsState::default()));
            }
        }

        AppCommand::ScrollLogsUp => {
            if let Screen::Logs(logs_state) = state.current_screen_mut() {
                // Scroll up means going back in time (increase offset)
                if logs_state.scroll_offset < logs_state.total_entries.saturating_sub(1) {
                    logs_state.scroll_offset += 1;
                }
            }
        }

        AppCommand::ScrollLogsDown => {
            if let Screen::Logs(logs_state) = state.current_screen_mut() {
                // Scroll down means going forward in time (decrease offset)
                logs_state.scroll_offset = logs_state.scroll_offset.saturating_sub(1);
            }
        }

        AppCommand::ScrollLogsPageUp => {
            if let Screen::Logs(logs_state) = state.current_screen_mut() {
                logs_state.scroll_offset = (logs_state.scroll_offset + LOG_PAGE_SIZE)
                    .min(logs_state.total_entries.saturating_sub(1));
            }
        }

        AppCommand::ScrollLogsPageDown => {
            if let Screen::Logs(logs_state) = state.current_screen_mut() {
                logs_state.scroll_offset = logs_state.scroll_offset.saturating_sub(LOG_PAGE_SIZE);
            }
        }

        AppCommand::SetPendingKey(c) => {
            state.pending_key = Some(c);
        }

        AppCommand::ClearPendingKey => {
            state.pending_key = None;
        }

        AppCommand::ToggleHelp => {
            state.help_visible = !state.help_visible;
        }

        AppCommand::Quit => {
            // Late responses must not land in a view nobody is looking at
            state.auth.invalidate();
            state.should_quit = true;
        }
    }

    // Clear pending key after any command except SetPendingKey
    // This ensures multi-key sequences are properly reset after completion
    if !is_setting_pending_key && state.pending_key.is_some() {
        state.pending_key = None;
    }
}

/// Run the page-load entry action for the router's current location
fn load_page(state: &mut AppState) {
    let Some(plan) = state.auth.page_load(&state.router, &mut state.view) else {
        return;
    };

    state.session_loading = LoadingState::loading();
    // A new generation orphans any movie fetch in flight
    if state.movies_loading.is_loading() {
        state.movies_loading = LoadingState::NotStarted;
    }

    match plan {
        LoadPlan::ExchangeCode(ticket, pending) => {
            state.enqueue(BackgroundJob::ExchangeCode { ticket, pending });
        }
        LoadPlan::ProbeSession(ticket) => {
            state.enqueue(BackgroundJob::ProbeSession { ticket });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use popcorn_auth::{AuthPhase, Router};

    fn state_at(location: &str) -> AppState {
        let mut router = Router::new("http://localhost:3000/").unwrap();
        router.visit(location).unwrap();
        AppState::new(router)
    }

    #[test]
    fn test_load_page_with_code_only_exchanges() {
        let mut state = state_at("/?code=abc");

        execute_command(AppCommand::LoadPage, &mut state);

        let jobs = state.drain_jobs();
        assert_eq!(jobs.len(), 1);
        assert!(matches!(jobs[0], BackgroundJob::ExchangeCode { .. }));
        assert_eq!(state.auth.phase(), AuthPhase::ExchangingCode);
        assert!(state.session_loading.is_loading());
    }

    #[test]
    fn test_second_load_refused_during_exchange() {
        let mut state = state_at("/?code=abc");
        execute_command(AppCommand::LoadPage, &mut state);
        state.drain_jobs();

        execute_command(AppCommand::LoadPage, &mut state);
        execute_command(
            AppCommand::VisitLocation("/?code=other".to_string()),
            &mut state,
        );

        assert!(state.drain_jobs().is_empty());
        assert!(state.router.current().to_string().contains("code=abc"));
    }

    #[test]
    fn test_submit_callback_visits_location() {
        let mut state = state_at("/");
        execute_command(AppCommand::EnterCallbackMode, &mut state);
        execute_command(
            AppCommand::AppendCallbackText("http://localhost:3000/?code=xyz".to_string()),
            &mut state,
        );

        execute_command(AppCommand::SubmitCallback, &mut state);

        assert_eq!(state.home.input_mode, InputMode::Normal);
        assert!(state.home.callback_input.is_empty());
        let jobs = state.drain_jobs();
        assert!(matches!(jobs[0], BackgroundJob::ExchangeCode { .. }));
    }

    #[test]
    fn test_submit_invalid_callback_stays_in_input() {
        let mut state = state_at("/");
        execute_command(AppCommand::EnterCallbackMode, &mut state);
        execute_command(
            AppCommand::AppendCallbackText("http://[::1".to_string()),
            &mut state,
        );

        execute_command(AppCommand::SubmitCallback, &mut state);

        assert_eq!(state.home.input_mode, InputMode::Callback);
        assert!(state.home.callback_error.is_some());
        assert!(state.drain_jobs().is_empty());
    }

    #[test]
    fn test_start_login_queues_browser_job() {
        let mut state = state_at("/");

        execute_command(AppCommand::StartLogin, &mut state);

        let jobs = state.drain_jobs();
        assert!(matches!(jobs[0], BackgroundJob::OpenAuthorizationPage));
    }

    #[test]
    fn test_logout_ignored_when_anonymous() {
        let mut state = state_at("/");

        execute_command(AppCommand::Logout, &mut state);

        assert!(state.drain_jobs().is_empty());
        assert!(!state.session_loading.is_loading());
    }

    #[test]
    fn test_load_movies_allowed_when_anonymous() {
        let mut state = state_at("/");

        execute_command(AppCommand::LoadMovies, &mut state);

        assert!(state.movies_loading.is_loading());
        assert!(matches!(
            state.drain_jobs()[0],
            BackgroundJob::FetchMovies { .. }
        ));
    }

    #[test]
    fn test_quit_invalidates_in_flight_work() {
        let mut state = state_at("/");
        execute_command(AppCommand::LoadPage, &mut state);
        let ticket = state.auth.ticket();

        execute_command(AppCommand::Quit, &mut state);

        assert!(state.should_quit);
        assert!(!state.auth.is_current(ticket));
    }

    #[test]
    fn test_pending_key_cleared_after_command() {
        let mut state = state_at("/");
        execute_command(AppCommand::SetPendingKey('g'), &mut state);
        assert_eq!(state.pending_key, Some('g'));

        execute_command(AppCommand::NavigateToTop, &mut state);
        assert_eq!(state.pending_key, None);
    }

    #[test]
    fn test_logs_navigation_is_not_stacked_twice() {
        let mut state = state_at("/");
        execute_command(AppCommand::NavigateToLogs, &mut state);
        execute_command(AppCommand::NavigateToLogs, &mut state);

        assert_eq!(state.history.len(), 2);
        execute_command(AppCommand::NavigateBack, &mut state);
        assert!(matches!(state.current_screen(), Screen::Home));
    }
}
