//! Render functions for the TUI.
//!
//! Draws the browse screen (header, card grid, status bar) and layers the
//! active overlay on top of it.

use crate::app::App;
use crate::controller::Overlay;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    widgets::Paragraph,
    Frame,
};

use super::{detail, grid, header, help, menus, status};

/// Minimum terminal dimensions required for normal operation.
pub(super) const MIN_WIDTH: u16 = 60;
pub(super) const MIN_HEIGHT: u16 = 10;

/// Rows taken by the header: heading line, search line, bottom border.
const HEADER_HEIGHT: u16 = 3;

/// Main render dispatch function.
///
/// Handles terminal size validation before rendering.
pub(super) fn render(f: &mut Frame, app: &mut App) {
    let area = f.area();

    // Guard against zero-width/height to prevent panics
    if area.width < 1 || area.height < 1 {
        return;
    }

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        // For very small terminals (less than 3 lines), just show minimal message
        let msg = if area.height < 3 || area.width < 20 {
            Paragraph::new("Too small")
        } else {
            Paragraph::new(format!(
                "Terminal too small\n\nMinimum: {}x{}\nCurrent: {}x{}",
                MIN_WIDTH, MIN_HEIGHT, area.width, area.height
            ))
            .alignment(Alignment::Center)
        };
        f.render_widget(msg, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    header::render(f, app, chunks[0]);
    grid::render(f, app, chunks[1]);
    status::render(f, app, chunks[2]);

    match app.view.overlay() {
        Overlay::Detail => detail::render(f, app, chunks[1]),
        Overlay::SortMenu | Overlay::FilterMenu => menus::render(f, app),
        Overlay::Help => help::render(f, app),
        Overlay::None => {}
    }
}

/// A rectangle `width` x `height` centered in `area`, shrunk to leave a
/// two-cell margin when `area` is smaller.
pub(super) fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(4));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::test_support::{draw, load_movies, screen_contains, test_app};

    #[tokio::test]
    async fn test_too_small_message() {
        let mut app = test_app();
        let rows = draw(&mut app, 40, 8);
        assert!(screen_contains(&rows, "Terminal too small"));
    }

    #[tokio::test]
    async fn test_browse_screen_layout() {
        let mut app = test_app();
        load_movies(&mut app, &["Dune", "Heat"]);
        let rows = draw(&mut app, 100, 30);
        assert!(rows[0].contains("New Added Movies"));
        assert!(screen_contains(&rows, "Dune"));
        assert!(screen_contains(&rows, "Heat"));
        assert!(rows[29].contains("quit"));
    }

    #[tokio::test]
    async fn test_unrevealed_cards_hidden() {
        let mut app = test_app();
        load_movies(&mut app, &["Dune", "Heat"]);
        app.revealed = 1;
        let rows = draw(&mut app, 100, 30);
        assert!(screen_contains(&rows, "Dune"));
        assert!(!screen_contains(&rows, "Heat"));
    }

    #[test]
    fn test_centered_rect_fits_area() {
        let area = Rect::new(0, 0, 80, 24);
        let r = centered_rect(40, 10, area);
        assert_eq!(r, Rect::new(20, 7, 40, 10));
        let r = centered_rect(200, 200, area);
        assert_eq!(r, Rect::new(2, 2, 76, 20));
    }
}
