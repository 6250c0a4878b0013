//! Fixtures shared by the UI tests.

use crate::app::App;
use crate::catalog::{CatalogClient, CatalogOptions, ListingMode, MovieSummary};
use ratatui::{backend::TestBackend, Terminal};

use super::render::render;

pub(super) fn test_app() -> App {
    let catalog = CatalogClient::new(CatalogOptions::default()).unwrap();
    App::new(catalog, ListingMode::New)
}

/// Install a resolved listing with one summary per title, fully revealed.
pub(super) fn load_movies(app: &mut App, titles: &[&str]) {
    let ticket = app.view.reload_listing();
    let movies: Vec<MovieSummary> = titles
        .iter()
        .enumerate()
        .map(|(i, title)| {
            serde_json::from_value(serde_json::json!({
                "id": i + 1,
                "title": title,
                "release_date": "2021-10-22",
                "vote_average": 7.8,
                "overview": format!("Overview of {}", title),
            }))
            .unwrap()
        })
        .collect();
    app.view.apply_listing::<String>(ticket.seq, Ok(movies));
    app.revealed = titles.len();
}

/// Render one frame and return the screen as text rows.
pub(super) fn draw(app: &mut App, width: u16, height: u16) -> Vec<String> {
    let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
    terminal.draw(|f| render(f, app)).unwrap();
    let buffer = terminal.backend().buffer();
    (0..height)
        .map(|y| (0..width).map(|x| buffer[(x, y)].symbol()).collect::<String>())
        .collect()
}

pub(super) fn screen_contains(rows: &[String], needle: &str) -> bool {
    rows.iter().any(|row| row.contains(needle))
}
