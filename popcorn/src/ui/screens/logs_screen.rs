use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Row, Table},
};
use tracing::Level;

use crate::log_buffer::{LogBuffer, LogEntry};
use crate::state::{AppState, LogsState};
use crate::ui::{components::help_bar, layouts, theme};
use popcorn_auth::AuthPhase;

const NO_LOGS_MESSAGE: &str = "No logs yet";

const KEY_HINTS: &[help_bar::KeyHint] = &[
    ("j/k", "scroll"),
    ("G", "newest"),
    ("gg", "oldest"),
    ("PgUp/PgDn", "page"),
    ("h/Esc", "back"),
    ("?", "help"),
];

/// Which part of the session lifecycle a log line belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source {
    Auth,
    Api,
    Jobs,
    App,
    Other,
}

impl Source {
    fn of(target: &str) -> Self {
        if target.starts_with("popcorn_auth") {
            Source::Auth
        } else if target.starts_with("popcorn_api") {
            Source::Api
        } else if target.starts_with("popcorn::background") {
            Source::Jobs
        } else if target.starts_with("popcorn") {
            Source::App
        } else {
            Source::Other
        }
    }

    fn label(self) -> &'static str {
        match self {
            Source::Auth => "auth",
            Source::Api => "api",
            Source::Jobs => "jobs",
            Source::App => "app",
            Source::Other => "deps",
        }
    }

    /// Auth transitions and backend calls stand out from the rest
    fn is_session(self) -> bool {
        matches!(self, Source::Auth | Source::Api | Source::Jobs)
    }
}

fn phase_label(phase: AuthPhase) -> &'static str {
    match phase {
        AuthPhase::Anonymous => "signed out",
        AuthPhase::ExchangingCode => "exchanging code",
        AuthPhase::Authenticated => "signed in",
        AuthPhase::LoggingOut => "logging out",
    }
}

pub fn render(f: &mut Frame, app: &AppState, state: &LogsState, log_buffer: &LogBuffer) {
    let (title_area, content_area, help_area) = layouts::screen_layout(f.area());

    let title = format!(
        "Logs ({} entries) | session: {}",
        state.total_entries,
        phase_label(app.auth.phase())
    );
    f.render_widget(Paragraph::new(title).style(theme::title_style()), title_area);

    render_logs(f, content_area, state, log_buffer);

    let scroll_info = (state.scroll_offset > 0)
        .then(|| format!("(scrolled {} from bottom)", state.scroll_offset));
    help_bar::render_help_bar(f, help_area, KEY_HINTS, scroll_info.as_deref());
}

fn render_logs(f: &mut Frame, area: Rect, state: &LogsState, log_buffer: &LogBuffer) {
    let entries = log_buffer.get_entries();
    let total = entries.len();

    if total == 0 {
        let paragraph = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(NO_LOGS_MESSAGE, theme::loading_style())),
        ])
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Logs"));
        f.render_widget(paragraph, area);
        return;
    }

    // Newest at the bottom; borders and the header take four rows
    let visible = area.height.saturating_sub(4) as usize;
    let end = total.saturating_sub(state.scroll_offset);
    let start = end.saturating_sub(visible);

    let rows: Vec<Row> = entries[start..end].iter().map(log_row).collect();

    let widths = [
        Constraint::Length(12), // Time
        Constraint::Length(5),  // Level
        Constraint::Length(6),  // Source
        Constraint::Min(30),    // Message
    ];

    let table = Table::new(rows, widths)
        .block(Block::default().borders(Borders::ALL).title(format!(
            " Logs [{}-{} of {}] ",
            start + 1,
            end,
            total
        )))
        .header(
            Row::new(vec!["Time", "Level", "Source", "Message"])
                .style(theme::header_style())
                .bottom_margin(1),
        );

    f.render_widget(table, area);
}

fn log_row(entry: &LogEntry) -> Row<'static> {
    let source = Source::of(&entry.target);

    let (level, color) = match entry.level {
        Level::ERROR => ("ERROR", theme::COLOR_ERROR),
        Level::WARN => ("WARN", theme::COLOR_LOADING),
        Level::INFO => ("INFO", theme::COLOR_SUCCESS),
        Level::DEBUG => ("DEBUG", Color::Blue),
        Level::TRACE => ("TRACE", theme::COLOR_MUTED),
    };
    let mut style = Style::default().fg(color);
    if source.is_session() || entry.level == Level::ERROR {
        style = style.add_modifier(Modifier::BOLD);
    }

    Row::new(vec![
        entry.timestamp.format("%H:%M:%S%.3f").to_string(),
        level.to_string(),
        source.label().to_string(),
        entry.message.clone(),
    ])
    .style(style)
}
