pub mod reducer;

use crate::events::BackgroundJob;
use crate::ui::screens::Screen;
use popcorn_auth::{AuthController, Router, ViewState};
use throbber_widgets_tui::ThrobberState;

/// Represents loading state separate from data state
#[derive(Default, Debug, Clone, PartialEq)]
pub enum LoadingState {
    #[default]
    NotStarted,
    Loading(ThrobberState),
    Loaded,
    Error(String),
}

impl LoadingState {
    pub fn loading() -> Self {
        LoadingState::Loading(ThrobberState::default())
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LoadingState::Loading(_))
    }
}

/// Represents input mode for the home screen
#[derive(Default, Debug, Clone, PartialEq)]
pub enum InputMode {
    #[default]
    Normal,
    /// Typing or pasting the URL the identity provider redirected to
    Callback,
}

#[derive(Default, Debug, Clone)]
pub struct HomeState {
    pub input_mode: InputMode,
    pub callback_input: String,
    pub callback_error: Option<String>,
    pub selected_movie_index: usize,
}

#[derive(Default, Debug, Clone)]
pub struct LogsState {
    pub scroll_offset: usize,
    pub total_entries: usize,
}

#[derive(Debug)]
pub struct AppState {
    pub history: Vec<Screen>,

    // Session
    pub view: ViewState,
    pub auth: AuthController,
    pub router: Router,
    pub session_loading: LoadingState,
    pub movies_loading: LoadingState,

    // UI state
    pub home: HomeState,
    pub help_visible: bool,
    pub pending_key: Option<char>,

    // System
    pub should_quit: bool,

    jobs: Vec<BackgroundJob>,
}

impl AppState {
    pub fn new(router: Router) -> Self {
        Self {
            history: vec![Screen::Home],

            view: ViewState::new(),
            auth: AuthController::new(),
            router,
            session_loading: LoadingState::NotStarted,
            movies_loading: LoadingState::NotStarted,

            home: HomeState::default(),
            help_visible: false,
            pending_key: None,

            should_quit: false,

            jobs: Vec::new(),
        }
    }

    /// Queue a background job for the runtime to pick up
    pub fn enqueue(&mut self, job: BackgroundJob) {
        tracing::debug!("Queued job: {:?}", job);
        self.jobs.push(job);
    }

    /// Take every queued job, oldest first
    pub fn drain_jobs(&mut self) -> Vec<BackgroundJob> {
        std::mem::take(&mut self.jobs)
    }

    /// Get the current screen (last in navigation stack)
    pub fn current_screen(&self) -> &Screen {
        self.history.last().unwrap_or(&Screen::Home)
    }

    /// Get mutable reference to current screen
    pub fn current_screen_mut(&mut self) -> &mut Screen {
        if self.history.is_empty() {
            self.history.push(Screen::Home);
        }
        let last = self.history.len() - 1;
        &mut self.history[last]
    }

    /// Navigate to a new screen (push to stack)
    pub fn navigate_to(&mut self, screen: Screen) {
        tracing::debug!(
            "Navigating to new screen, stack depth: {} -> {}",
            self.history.len(),
            self.history.len() + 1
        );
        self.history.push(screen);
    }

    /// Navigate back (pop from stack)
    /// Returns true if navigation succeeded, false if already at root
    pub fn navigate_back(&mut self) -> bool {
        if self.history.len() > 1 {
            self.history.pop();
            true
        } else {
            tracing::debug!("Cannot navigate back, already at root screen");
            false
        }
    }

    /// Throbber of whichever load is running, for animation ticks
    pub fn loading_state(&mut self) -> Option<&mut ThrobberState> {
        for loading in [&mut self.session_loading, &mut self.movies_loading] {
            if let LoadingState::Loading(throbber_state) = loading {
                return Some(throbber_state);
            }
        }
        None
    }

    /// Combined indicator for the title bar; session work takes precedence
    pub fn title_loading(&self) -> &LoadingState {
        match (&self.session_loading, &self.movies_loading) {
            (LoadingState::Loading(_), _) | (LoadingState::Error(_), _) => &self.session_loading,
            (_, LoadingState::NotStarted) => &self.session_loading,
            (_, movies) => movies,
        }
    }
}
