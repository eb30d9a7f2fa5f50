use ratatui::{
    layout::Alignment,
    prelude::*,
    widgets::{Block, Borders, Clear, List, ListItem},
    Frame,
};

use crate::state::{AppState, InputMode};
use crate::ui::{layouts, screens::Screen, theme};
use popcorn_auth::AuthControl;

pub fn render_help_popup(f: &mut Frame, state: &AppState) {
    let (width, height) = layouts::popup_sizes::LARGE;
    let area = layouts::centered_popup(width, height, f.area());
    f.render_widget(Clear, area);

    let block = Block::default()
        .title(" Help (press ? or Esc to close) ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(theme::accent_border_style());
    let inner = block.inner(area);
    f.render_widget(block, area);

    let items: Vec<ListItem> = get_help_items(state)
        .iter()
        .map(|(key, description)| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:15}", key), theme::header_style()),
                Span::raw(*description),
            ]))
        })
        .collect();

    let list = List::new(items).style(Style::default().fg(Color::White));

    f.render_widget(list, inner);
}

fn get_help_items(state: &AppState) -> Vec<(&'static str, &'static str)> {
    let mut items = vec![];

    // Screen-specific help
    match state.current_screen() {
        Screen::Home => {
            match state.view.auth_control() {
                AuthControl::Login => items.push(("i", "Login with the identity provider")),
                AuthControl::Logout => items.push(("o", "Logout")),
            }
            items.push(("c", "Enter the URL the provider redirected to"));
            if state.home.input_mode == InputMode::Callback {
                items.push(("Type/paste", "Redirect URL, e.g. http://localhost:3000/?code=..."));
                items.push(("Enter", "Visit the URL"));
                items.push(("Esc", "Cancel"));
            }
            items.push(("m", "Load popular movies"));
            items.push(("r", "Reload the current location"));
            items.push(("↑/k", "Move selection up"));
            items.push(("↓/j", "Move selection down"));
        }
        Screen::Logs(..) => {
            items.push(("↑/k", "Scroll up (older logs)"));
            items.push(("↓/j", "Scroll down (newer logs)"));
            items.push(("Page Up", "Scroll up one page"));
            items.push(("Page Down", "Scroll down one page"));
            items.push(("g then g", "Scroll to oldest logs"));
            items.push(("G", "Scroll to newest logs"));
            items.push(("h/←/Esc", "Back to home"));
        }
    }

    // Global help
    items.push(("", ""));
    items.push(("--- Global ---", ""));
    items.push(("g then l", "Go to logs"));
    items.push(("g then g", "Navigate to top of list"));
    items.push(("G", "Navigate to bottom of list"));
    items.push(("?", "Toggle this help"));
    items.push(("q", "Quit application"));

    items
}
