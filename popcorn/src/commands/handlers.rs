use crate::events::AppCommand;
use crate::input::{Key, KeyEvent};
use crate::state::*;
use crate::ui::screens::Screen;
use popcorn_auth::AuthControl;

/// Map user input (KeyEvent) to AppCommand based on current UI state
/// Returns None if the key should be ignored
pub fn handle_key_input(event: KeyEvent, state: &AppState) -> Option<AppCommand> {
    let key = event.key;

    // Ctrl+C always quits, even while typing
    if event.modifiers.ctrl && key == Key::Char('c') {
        return Some(AppCommand::Quit);
    }

    // Priority 1: Redirect URL entry (highest priority)
    if let Screen::Home = state.current_screen() {
        if state.home.input_mode == InputMode::Callback {
            return match key {
                Key::Enter => Some(AppCommand::SubmitCallback),
                Key::Esc => Some(AppCommand::ExitCallbackMode),
                Key::Backspace => Some(AppCommand::DeleteCallbackChar),
                Key::Char(c) => Some(AppCommand::AppendCallbackText(c.to_string())),
                _ => None,
            };
        }
    }

    // Priority 2: Check if we're currently showing the help popup
    if state.help_visible {
        return match key {
            Key::Char('?') | Key::Esc => Some(AppCommand::ToggleHelp),
            Key::Char('q') => Some(AppCommand::Quit),
            _ => None,
        };
    }

    // Handle multi-key sequences
    if let Some(pending) = state.pending_key {
        return match (pending, key) {
            // 'g' followed by 'g' -> navigate to top of list
            ('g', Key::Char('g')) => Some(AppCommand::NavigateToTop),
            // 'g' followed by 'l' -> go to logs
            ('g', Key::Char('l')) => Some(AppCommand::NavigateToLogs),
            // Any other key clears the pending key
            _ => Some(AppCommand::ClearPendingKey),
        };
    }

    match (state.current_screen(), key) {
        // Global help toggle
        (_, Key::Char('?')) => Some(AppCommand::ToggleHelp),

        // Global quit command
        (_, Key::Char('q')) => Some(AppCommand::Quit),

        // Multi-key sequence initiator: 'g' sets pending key
        (_, Key::Char('g')) => Some(AppCommand::SetPendingKey('g')),

        // Navigate to bottom: 'G' (Shift+g)
        (_, Key::Char('G')) => Some(AppCommand::NavigateToBottom),

        // Home screen: only the control that is on screen responds
        (Screen::Home, Key::Char('i')) => match state.view.auth_control() {
            AuthControl::Login => Some(AppCommand::StartLogin),
            AuthControl::Logout => None,
        },
        (Screen::Home, Key::Char('o')) => match state.view.auth_control() {
            AuthControl::Logout => Some(AppCommand::Logout),
            AuthControl::Login => None,
        },
        (Screen::Home, Key::Char('m')) => Some(AppCommand::LoadMovies),
        (Screen::Home, Key::Char('r')) => Some(AppCommand::LoadPage),
        (Screen::Home, Key::Char('c')) => Some(AppCommand::EnterCallbackMode),
        (Screen::Home, Key::Up | Key::Char('k')) => Some(AppCommand::SelectPrevious),
        (Screen::Home, Key::Down | Key::Char('j')) => Some(AppCommand::SelectNext),

        // Logs screen
        (Screen::Logs(..), Key::Esc | Key::Left | Key::Char('h')) => {
            Some(AppCommand::NavigateBack)
        }
        (Screen::Logs(..), Key::Up | Key::Char('k')) => Some(AppCommand::ScrollLogsUp),
        (Screen::Logs(..), Key::Down | Key::Char('j')) => Some(AppCommand::ScrollLogsDown),
        (Screen::Logs(..), Key::PageUp) => Some(AppCommand::ScrollLogsPageUp),
        (Screen::Logs(..), Key::PageDown) => Some(AppCommand::ScrollLogsPageDown),

        // Ignore other keys
        _ => None,
    }
}

/// Map pasted text to a command. Only the redirect URL input accepts it.
pub fn handle_paste(text: &str, state: &AppState) -> Option<AppCommand> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    match state.current_screen() {
        Screen::Home if state.home.input_mode == InputMode::Callback => {
            Some(AppCommand::AppendCallbackText(text.to_string()))
        }
        _ => None,
    }
}
