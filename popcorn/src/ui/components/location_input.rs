//! Input field for the URL the identity provider redirected to.

use ratatui::prelude::Rect;
use ratatui::{
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::ui::theme;

/// Render the redirect URL input with the text typed so far.
///
/// A rejected submission shows its reason in the block title.
pub fn render_location_input(f: &mut Frame, area: Rect, input: &str, error: Option<&str>) {
    let title = match error {
        Some(error) => Line::from(Span::styled(format!(" {} ", error), theme::error_style())),
        None => Line::from(" Redirect URL (Enter: submit, Esc: cancel) "),
    };

    let paragraph = Paragraph::new(format!("{}_", input))
        .style(theme::input_focused_style())
        .block(Block::default().borders(Borders::ALL).title(title));

    f.render_widget(paragraph, area);
}
