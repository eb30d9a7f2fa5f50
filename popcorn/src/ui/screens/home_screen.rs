use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

use crate::state::{AppState, InputMode, LoadingState};
use crate::ui::{
    components::{
        help_bar::{self, KeyHint},
        location_input, screen_title,
    },
    layouts, theme,
};
use popcorn_api::Movie;
use popcorn_auth::AuthControl;

pub const EMPTY_MOVIES_MESSAGE: &str = "No movies to display";
const UNTITLED: &str = "(untitled)";

pub fn render(f: &mut Frame, state: &AppState) {
    let editing = state.home.input_mode == InputMode::Callback;
    let areas = layouts::home_layout(f.area(), editing);

    screen_title::render_screen_title(
        f,
        areas.title,
        &state.view.greeting(),
        state.title_loading(),
    );
    render_session(f, areas.session, state);
    if let Some(input_area) = areas.input {
        location_input::render_location_input(
            f,
            input_area,
            &state.home.callback_input,
            state.home.callback_error.as_deref(),
        );
    }
    render_movies(f, areas.movies, state);
    help_bar::render_help_bar(f, areas.help, &key_hints(state), None);
}

/// Error line, the single auth control, and the current location
fn render_session(f: &mut Frame, area: Rect, state: &AppState) {
    let control = state.view.auth_control();
    let key = match control {
        AuthControl::Login => "i",
        AuthControl::Logout => "o",
    };

    let mut lines = Vec::new();
    match state.view.error_message() {
        Some(message) => lines.push(Line::from(Span::styled(message, theme::error_style()))),
        None => lines.push(Line::from("")),
    }
    lines.push(Line::from(vec![
        Span::styled(format!(" {} ", control.label()), theme::control_style()),
        Span::styled(format!("  press {}", key), theme::help_text_style()),
    ]));

    let location = state.router.current();
    let mut location_spans = vec![
        Span::styled("Location: ", theme::help_text_style()),
        Span::raw(location.without_code().to_string()),
    ];
    if location.has_authorization_code() {
        location_spans.push(Span::styled(
            "  (authorization code pending)",
            theme::loading_style(),
        ));
    }
    lines.push(Line::from(location_spans));

    let paragraph =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Session"));
    f.render_widget(paragraph, area);
}

fn render_movies(f: &mut Frame, area: Rect, state: &AppState) {
    let movies = state.view.items();

    if movies.is_empty() {
        render_no_movies(f, area, state);
        return;
    }

    let items: Vec<ListItem> = movies
        .iter()
        .enumerate()
        .map(|(i, movie)| {
            let style = if i == state.home.selected_movie_index {
                theme::selection_style()
            } else {
                Style::default()
            };
            ListItem::new(movie_card(movie)).style(style)
        })
        .collect();

    let title = format!("Popular Movies ({})", movies.len());
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));

    f.render_widget(list, area);
}

/// One movie as a two-line card: title and genre, then the poster URL
fn movie_card(movie: &Movie) -> Vec<Line<'_>> {
    let title = if movie.title.is_empty() {
        UNTITLED
    } else {
        movie.title.as_str()
    };
    let mut heading = vec![Span::styled(title, theme::header_style())];
    if let Some(genre) = &movie.genre {
        heading.push(Span::styled(format!("  {}", genre), theme::help_text_style()));
    }

    let poster = movie.poster_url.as_deref().unwrap_or("no poster");
    vec![
        Line::from(heading),
        Line::from(Span::styled(
            format!("  {}", poster),
            Style::default().fg(theme::COLOR_MUTED),
        )),
    ]
}

/// Placeholder for an empty list, with what the user can do about it
fn render_no_movies(f: &mut Frame, area: Rect, state: &AppState) {
    let hint = match (&state.movies_loading, state.view.current_user()) {
        (LoadingState::Loading(..), _) => Span::styled("Loading movies...", theme::loading_style()),
        (LoadingState::Error(..), _) => {
            Span::styled("Press m to try again", theme::help_text_style())
        }
        (_, Some(_)) => Span::styled("Press m to load popular movies", theme::help_text_style()),
        (_, None) => Span::styled(
            "Press m to load popular movies, or i to login first",
            theme::help_text_style(),
        ),
    };

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(EMPTY_MOVIES_MESSAGE, theme::loading_style())),
        Line::from(""),
        Line::from(hint),
    ];
    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Popular Movies"));

    f.render_widget(paragraph, area);
}

fn key_hints(state: &AppState) -> Vec<KeyHint> {
    if state.home.input_mode == InputMode::Callback {
        return vec![("Enter", "submit"), ("Esc", "cancel")];
    }
    let control = match state.view.auth_control() {
        AuthControl::Login => ("i", "login"),
        AuthControl::Logout => ("o", "logout"),
    };
    vec![
        control,
        ("c", "redirect URL"),
        ("m", "movies"),
        ("r", "reload"),
        ("j/k", "select"),
        ("?", "help"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::DataEvent;
    use crate::state::reducer::reduce_data_event;
    use popcorn_api::{MovieId, Session};
    use popcorn_auth::{LoadPlan, Router};
    use ratatui::{backend::TestBackend, Terminal};

    fn render_to_string(state: &AppState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| render(f, state)).unwrap();

        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    fn home_state() -> AppState {
        AppState::new(Router::new("http://localhost:3000/").unwrap())
    }

    fn sign_in(state: &mut AppState, name: &str) {
        let Some(LoadPlan::ProbeSession(ticket)) =
            state.auth.page_load(&state.router, &mut state.view)
        else {
            panic!("expected a session probe");
        };
        reduce_data_event(
            state,
            DataEvent::SessionProbed {
                ticket,
                session: Session::authenticated(name),
            },
        );
    }

    #[test]
    fn test_guest_sees_login_only() {
        let screen = render_to_string(&home_state());

        assert!(screen.contains("Welcome, Guest!"));
        assert!(screen.contains(" Login "));
        assert!(!screen.contains(" Logout "));
        assert!(screen.contains(EMPTY_MOVIES_MESSAGE));
        assert!(screen.contains("or i to login first"));
        assert!(screen.contains("i: login"));
    }

    #[test]
    fn test_signed_in_user_sees_logout_only() {
        let mut state = home_state();
        sign_in(&mut state, "Ada");

        let screen = render_to_string(&state);

        assert!(screen.contains("Welcome, Ada!"));
        assert!(screen.contains(" Logout "));
        assert!(!screen.contains(" Login "));
        assert!(screen.contains("o: logout"));
        assert!(screen.contains("Press m to load popular movies"));
    }

    #[test]
    fn test_movies_and_error_line_render() {
        let mut state = home_state();
        sign_in(&mut state, "Ada");
        let ticket = state.auth.begin_fetch(&mut state.view);
        reduce_data_event(
            &mut state,
            DataEvent::MoviesLoaded {
                ticket,
                movies: vec![Movie {
                    id: MovieId::Number(7),
                    title: "Heat".to_string(),
                    genre: Some("Crime".to_string()),
                    poster_url: Some("https://img.example/heat.jpg".to_string()),
                }],
            },
        );
        let ticket = state.auth.begin_fetch(&mut state.view);
        reduce_data_event(
            &mut state,
            DataEvent::MoviesLoadFailed {
                ticket,
                error: "timeout".to_string(),
            },
        );

        let screen = render_to_string(&state);

        assert!(screen.contains("Heat"));
        assert!(screen.contains("Crime"));
        assert!(screen.contains("https://img.example/heat.jpg"));
        assert!(screen.contains("Failed to load movies. Please try again later."));
    }

    #[test]
    fn test_untitled_movie_gets_placeholder() {
        let mut state = home_state();
        let ticket = state.auth.begin_fetch(&mut state.view);
        reduce_data_event(
            &mut state,
            DataEvent::MoviesLoaded {
                ticket,
                movies: vec![Movie {
                    id: MovieId::Number(3),
                    title: String::new(),
                    genre: Some("Noir".to_string()),
                    poster_url: None,
                }],
            },
        );

        let screen = render_to_string(&state);

        assert!(screen.contains(UNTITLED));
        assert!(screen.contains("Noir"));
    }

    #[test]
    fn test_pending_code_is_not_shown() {
        let mut router = Router::new("http://localhost:3000/").unwrap();
        router.visit("/?code=s3cret").unwrap();
        let state = AppState::new(router);

        let screen = render_to_string(&state);

        assert!(!screen.contains("s3cret"));
        assert!(screen.contains("authorization code pending"));
    }
}
