use anyhow::{Context, Result};
use crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste, Event, EventStream, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::sync::Arc;

use crate::app_core::{AppCore, JobHandler};
use crate::background::{session_loader::SessionLoader, BackgroundTaskManager};
use crate::events::{AppCommand, BackgroundJob};
use crate::input::KeyEvent;
use crate::log_buffer::LogBuffer;
use crate::logging::init_logging_with_buffer;
use crate::ui::screens::Screen;
use popcorn_api::SessionClient;
use popcorn_auth::{Router, Settings};

type Tui = Terminal<CrosstermBackend<std::io::Stdout>>;

/// Production job handler: one tokio task per job, one task per slot
pub struct TaskSpawner {
    task_manager: BackgroundTaskManager,
    loader: SessionLoader,
}

impl TaskSpawner {
    pub fn new(loader: SessionLoader) -> Self {
        Self {
            task_manager: BackgroundTaskManager::new(),
            loader,
        }
    }

    pub fn cancel_all(&mut self) {
        let aborted = self.task_manager.cancel_all();
        if aborted > 0 {
            tracing::info!("Cancelled {} unfinished background jobs", aborted);
        }
    }
}

impl JobHandler for TaskSpawner {
    fn spawn(&mut self, job: BackgroundJob) {
        let slot = job.slot();
        let loader = self.loader.clone();
        self.task_manager.spawn(slot, async move {
            loader.run(job).await;
        });
    }
}

pub struct App {
    settings: Settings,
    initial_location: Option<String>,
}

impl App {
    pub fn new(settings: Settings, initial_location: Option<String>) -> Self {
        Self {
            settings,
            initial_location,
        }
    }

    pub async fn run(&self) -> Result<()> {
        // Create log buffer before initializing logging
        let log_buffer = LogBuffer::new(5000);
        let (log_path, _log_guard) = init_logging_with_buffer(log_buffer.clone())?;

        tracing::info!("popcorn starting, logging to {}", log_path.display());

        let client = SessionClient::new(self.settings.client_config()?)
            .context("Failed to build the API client")?;
        let router = Router::new(&self.settings.app_url)
            .with_context(|| format!("Invalid app_url: {}", self.settings.app_url))?;

        let (data_tx, data_rx) = tokio::sync::mpsc::unbounded_channel();
        let loader = SessionLoader::new(Arc::new(client), data_tx);
        let mut core = AppCore::new(router, TaskSpawner::new(loader));

        self.init_data(&mut core);

        let mut terminal = self.init()?;
        let result = self.event_loop(&mut terminal, &mut core, data_rx, &log_buffer).await;

        tracing::info!("Cleaning up application");

        // Cancel all in-flight backend calls
        core.handler_mut().cancel_all();

        self.exit(terminal)?;

        result
    }

    async fn event_loop(
        &self,
        terminal: &mut Tui,
        core: &mut AppCore<TaskSpawner>,
        mut data_rx: tokio::sync::mpsc::UnboundedReceiver<crate::events::DataEvent>,
        log_buffer: &LogBuffer,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        tracing::info!("Entering main event loop");

        let mut interval = tokio::time::interval(std::time::Duration::from_millis(100));
        loop {
            // Update total_entries for logs screen if active
            if let Screen::Logs(logs_state) = core.state_mut().current_screen_mut() {
                logs_state.total_entries = log_buffer.len();
            }

            terminal.draw(|f| {
                crate::ui::render_app(f, core.state(), log_buffer);
            })?;

            tokio::select! {
                _ = interval.tick() => {
                    if let Some(throbber_state) = core.state_mut().loading_state() {
                        throbber_state.calc_next();
                    }
                }
                Some(Ok(event)) = event_stream.next() => {
                    // Don't log when on logs screen to avoid feedback loop
                    let on_logs_screen = matches!(core.state().current_screen(), Screen::Logs(_));
                    match event {
                        Event::Key(key) if matches!(key.kind, KeyEventKind::Press) => {
                            if !on_logs_screen {
                                tracing::debug!("Key press: {:?}", key.code);
                            }
                            core.handle_key(KeyEvent::from(key));
                        }
                        Event::Paste(text) => {
                            if !on_logs_screen {
                                tracing::debug!("Pasted {} characters", text.len());
                            }
                            core.handle_paste(&text);
                        }
                        _ => {
                            // Ignore other events
                        }
                    }
                }
                Some(data_event) = data_rx.recv() => {
                    tracing::debug!("Received data event: {:?}", data_event);
                    core.handle_data_event(data_event);
                }
            }

            if core.should_quit() {
                tracing::info!("Quit requested, exiting event loop");
                return Ok(());
            }
        }
    }

    /// Entry action: visit the location given on the command line, or load
    /// the client root
    fn init_data(&self, core: &mut AppCore<TaskSpawner>) {
        match &self.initial_location {
            Some(location) => {
                tracing::info!("Starting at the given location");
                core.execute(AppCommand::VisitLocation(location.clone()));
            }
            None => core.execute(AppCommand::LoadPage),
        }
    }

    fn init(&self) -> Result<Tui, std::io::Error> {
        enable_raw_mode()?;
        let mut stdout = std::io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
        let backend = CrosstermBackend::new(stdout);
        Terminal::new(backend)
    }

    fn exit(&self, mut terminal: Tui) -> Result<(), std::io::Error> {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableBracketedPaste
        )?;
        terminal.show_cursor()?;
        Ok(())
    }
}
