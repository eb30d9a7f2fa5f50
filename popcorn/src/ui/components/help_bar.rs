//! Bottom bar listing the keys that do something on the current screen.

use ratatui::prelude::Rect;
use ratatui::{
    layout::Alignment,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::ui::theme;

/// A key and what it does, e.g. `("i", "login")`
pub type KeyHint = (&'static str, &'static str);

/// Render `hints` as `key: action | key: action`, with an optional status
/// note after them.
pub fn render_help_bar(f: &mut Frame, area: Rect, hints: &[KeyHint], status: Option<&str>) {
    let help = Paragraph::new(hint_line(hints, status))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(help, area);
}

fn hint_line(hints: &[KeyHint], status: Option<&str>) -> Line<'static> {
    let mut spans = Vec::with_capacity(hints.len() * 3 + 1);
    for (i, (key, action)) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", theme::help_text_style()));
        }
        spans.push(Span::styled(*key, theme::header_style()));
        spans.push(Span::styled(format!(": {}", action), theme::help_text_style()));
    }
    if let Some(status) = status {
        spans.push(Span::styled(format!("  {}", status), theme::loading_style()));
    }
    Line::from(spans)
}
