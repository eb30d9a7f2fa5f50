use crate::app_core::{AppCore, JobHandler};
use crate::events::{AppCommand, BackgroundJob, DataEvent};
use crate::input::{Key, KeyEvent};
use crate::state::AppState;
use crate::ui::screens::Screen;
use popcorn_auth::Router;

pub const TEST_APP_URL: &str = "http://localhost:3000/";

/// Job handler for tests: records jobs instead of running them
///
/// Tests play the backend by reading the recorded jobs and injecting the
/// matching `DataEvent`s.
#[derive(Debug, Default)]
pub struct RecordingJobHandler {
    jobs: Vec<BackgroundJob>,
}

impl RecordingJobHandler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl JobHandler for RecordingJobHandler {
    fn spawn(&mut self, job: BackgroundJob) {
        self.jobs.push(job);
    }
}

pub struct TestApp {
    core: AppCore<RecordingJobHandler>,
}

impl TestApp {
    /// Create a test app sitting at the client root
    pub fn new() -> Self {
        Self::at(TEST_APP_URL)
    }

    /// Create a test app whose initial location is `location`
    /// (absolute, or relative to the client root)
    pub fn at(location: &str) -> Self {
        let mut router = Router::new(TEST_APP_URL).expect("test app url is valid");
        router.visit(location).expect("test location is valid");
        Self {
            core: AppCore::new(router, RecordingJobHandler::new()),
        }
    }

    /// Run the page-load entry action, as the app does on start-up
    pub fn load(&mut self) {
        self.core.execute(AppCommand::LoadPage);
    }

    /// Execute a command directly
    pub fn execute(&mut self, command: AppCommand) {
        self.core.execute(command);
    }

    /// Send a single key event
    pub fn send_key(&mut self, key: Key) {
        self.core.handle_key(KeyEvent::new(key));
    }

    /// Send a key event with modifiers
    pub fn send_key_event(&mut self, event: KeyEvent) {
        self.core.handle_key(event);
    }

    /// Send multiple keys in sequence
    pub fn send_keys(&mut self, keys: &[Key]) {
        for key in keys {
            self.send_key(*key);
        }
    }

    /// Type text one character at a time
    pub fn type_text(&mut self, text: &str) {
        for c in text.chars() {
            self.send_key(Key::Char(c));
        }
    }

    /// Paste text as the terminal would
    pub fn paste(&mut self, text: &str) {
        self.core.handle_paste(text);
    }

    /// Inject a data event (simulate a backend response)
    pub fn send_data_event(&mut self, event: DataEvent) {
        self.core.handle_data_event(event);
    }

    /// Take the jobs spawned since the last call
    pub fn take_jobs(&mut self) -> Vec<BackgroundJob> {
        std::mem::take(&mut self.core.handler_mut().jobs)
    }

    /// Take the single job spawned since the last call
    pub fn take_single_job(&mut self) -> BackgroundJob {
        let mut jobs = self.take_jobs();
        assert_eq!(jobs.len(), 1, "Expected exactly one job, got {:?}", jobs);
        jobs.remove(0)
    }

    /// Get read-only access to current state
    pub fn state(&self) -> &AppState {
        self.core.state()
    }

    /// Assert that the app is on a specific screen type
    ///
    /// Uses discriminant comparison to check screen type without
    /// requiring full equality of state.
    pub fn assert_screen_type(&self, expected_discriminant: std::mem::Discriminant<Screen>) {
        let current = self.state().current_screen();
        assert_eq!(
            std::mem::discriminant(current),
            expected_discriminant,
            "Expected different screen. Current: {:?}",
            current
        );
    }

    /// Assert that no background job was spawned since the last take
    pub fn assert_no_jobs(&mut self) {
        let jobs = self.take_jobs();
        assert!(jobs.is_empty(), "Expected no jobs, got {:?}", jobs);
    }

    /// Assert that the app should quit
    pub fn assert_should_quit(&self) {
        assert!(
            self.core.should_quit(),
            "App should be marked for quit but is not"
        );
    }

    /// Assert that the app should NOT quit
    pub fn assert_not_quit(&self) {
        assert!(
            !self.core.should_quit(),
            "App should NOT be marked for quit but is"
        );
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}
