use crate::commands::{executor, handlers};
use crate::events::{AppCommand, BackgroundJob, DataEvent};
use crate::input::KeyEvent;
use crate::state::{reducer, AppState};
use popcorn_auth::Router;

/// Trait for running background jobs (production = spawned tasks, test = recorder)
///
/// Commands and data events only queue jobs on the state. The handler decides
/// what actually happens to them, which lets tests assert on the jobs without
/// a runtime or a backend.
pub trait JobHandler {
    fn spawn(&mut self, job: BackgroundJob);
}

/// Testable application core without terminal dependencies
///
/// Generic over H (handler) for zero-cost abstraction.
pub struct AppCore<H: JobHandler> {
    ui_state: AppState,
    handler: H,
}

impl<H: JobHandler> AppCore<H> {
    /// Create a new application core with the given handler
    pub fn new(router: Router, handler: H) -> Self {
        Self {
            ui_state: AppState::new(router),
            handler,
        }
    }

    /// Handle keyboard input and execute the resulting command
    pub fn handle_key(&mut self, event: KeyEvent) {
        if let Some(command) = handlers::handle_key_input(event, &self.ui_state) {
            self.execute(command);
        }
    }

    /// Handle a bracketed paste from the terminal
    pub fn handle_paste(&mut self, text: &str) {
        if let Some(command) = handlers::handle_paste(text, &self.ui_state) {
            self.execute(command);
        }
    }

    /// Execute a command and hand any queued jobs to the handler
    pub fn execute(&mut self, command: AppCommand) {
        executor::execute_command(command, &mut self.ui_state);
        self.flush_jobs();
    }

    /// Handle a data event (for test injection or async results)
    pub fn handle_data_event(&mut self, event: DataEvent) {
        reducer::reduce_data_event(&mut self.ui_state, event);
        self.flush_jobs();
    }

    fn flush_jobs(&mut self) {
        for job in self.ui_state.drain_jobs() {
            self.handler.spawn(job);
        }
    }

    /// Get read-only access to the current UI state (for rendering or assertions)
    pub fn state(&self) -> &AppState {
        &self.ui_state
    }

    /// Mutable state access for render-time widget state (throbbers, log bounds)
    pub fn state_mut(&mut self) -> &mut AppState {
        &mut self.ui_state
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    /// Check if the application should quit
    pub fn should_quit(&self) -> bool {
        self.ui_state.should_quit
    }
}
