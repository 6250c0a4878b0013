use crate::app::{App, SPINNER_FRAMES};
use crate::catalog::MovieSummary;
use crate::util::{clean_text, truncate_to_width};
use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Card height: border, title, year and rating, two overview lines, border.
const CARD_HEIGHT: u16 = 6;

/// Render the movie card grid.
///
/// Records the column count and scroll row on `app` so navigation moves by
/// the rows actually drawn.
pub fn render(f: &mut Frame, app: &mut App, area: Rect) {
    if area.width < 4 || area.height < 3 {
        return;
    }

    let cols = App::columns_for_width(area.width);
    app.grid_columns = cols;
    app.clamp_selection();

    let len = app.view.arranged().len();
    if len == 0 {
        render_empty(f, app, area);
        return;
    }

    let visible_rows = ((area.height / CARD_HEIGHT) as usize).max(1);
    let selected_row = app.selected / cols;
    if selected_row < app.grid_scroll_row {
        app.grid_scroll_row = selected_row;
    } else if selected_row >= app.grid_scroll_row + visible_rows {
        app.grid_scroll_row = selected_row + 1 - visible_rows;
    }

    let app = &*app;
    let arranged = app.view.arranged();
    let card_width = area.width / cols as u16;
    let first = app.grid_scroll_row * cols;
    let last = len.min(first + visible_rows * cols).min(app.revealed);

    for (index, movie) in arranged.iter().enumerate().take(last).skip(first) {
        let slot = index - first;
        let row = (slot / cols) as u16;
        let col = (slot % cols) as u16;
        let height = CARD_HEIGHT.min(area.height.saturating_sub(row * CARD_HEIGHT));
        let width = if col as usize == cols - 1 {
            area.width - col * card_width
        } else {
            card_width
        };
        let card = Rect::new(
            area.x + col * card_width,
            area.y + row * CARD_HEIGHT,
            width,
            height,
        );
        render_card(f, app, movie, index == app.selected, card);
    }
}

fn render_card(f: &mut Frame, app: &App, movie: &MovieSummary, focused: bool, area: Rect) {
    if area.width < 3 || area.height < 3 {
        return;
    }
    let inner = area.width.saturating_sub(2) as usize;

    let title = clean_text(movie.display_title());
    let year = movie
        .release_year()
        .map(|y| y.to_string())
        .unwrap_or_else(|| "----".to_string());

    let mut lines = vec![
        Line::from(Span::styled(
            truncate_to_width(&title, inner).into_owned(),
            app.style("card_title"),
        )),
        Line::from(vec![
            Span::styled(year, app.style("card_year")),
            Span::raw("  "),
            Span::styled(format!("★ {}", movie.rating_label()), app.style("card_rating")),
        ]),
    ];

    if focused {
        let overview = clean_text(&movie.overview);
        lines.push(Line::from(Span::styled(
            truncate_to_width(&overview, inner * 2).into_owned(),
            app.style("card_overview"),
        )));
    }

    let border = if focused {
        "card_border_selected"
    } else {
        "card_border"
    };
    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.style(border)),
        )
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

/// Placeholder text when there is nothing to show.
fn empty_message(app: &App) -> String {
    let view = &app.view;
    if view.is_list_loading() || view.is_search_loading() {
        let spinner = SPINNER_FRAMES[app.spinner_frame % SPINNER_FRAMES.len()];
        return format!("{} Loading movies...", spinner);
    }
    if view.is_search_active() && view.displayed().is_empty() {
        return format!("No movies found for \"{}\"", clean_text(view.search_query().trim()));
    }
    if !view.displayed().is_empty() {
        return "No movies match the current filter (f to change)".to_string();
    }
    "No movies to show (r to reload)".to_string()
}

fn render_empty(f: &mut Frame, app: &App, area: Rect) {
    let y = area.y + area.height / 2;
    let line = Rect::new(area.x, y.min(area.y + area.height - 1), area.width, 1);
    let paragraph = Paragraph::new(empty_message(app))
        .alignment(Alignment::Center)
        .style(app.style("grid_empty"));
    f.render_widget(paragraph, line);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::{FilterOptions, MediaFilter};
    use crate::ui::test_support::{draw, load_movies, screen_contains, test_app};

    #[tokio::test]
    async fn test_render_records_columns() {
        let mut app = test_app();
        load_movies(&mut app, &["A", "B", "C"]);
        draw(&mut app, 100, 30);
        assert_eq!(app.grid_columns, 3);
        draw(&mut app, 60, 30);
        assert_eq!(app.grid_columns, 1);
    }

    #[tokio::test]
    async fn test_only_focused_card_shows_overview() {
        let mut app = test_app();
        load_movies(&mut app, &["Dune", "Heat"]);
        let rows = draw(&mut app, 100, 30);
        assert!(screen_contains(&rows, "Overview of Dune"));
        assert!(!screen_contains(&rows, "Overview of Heat"));
        assert!(screen_contains(&rows, "2021"));
        assert!(screen_contains(&rows, "★ 7.8"));
    }

    #[tokio::test]
    async fn test_scrolls_to_keep_selection_visible() {
        let mut app = test_app();
        let titles: Vec<String> = (0..20).map(|i| format!("Film{:02}", i)).collect();
        let refs: Vec<&str> = titles.iter().map(String::as_str).collect();
        load_movies(&mut app, &refs);
        // Sorted by release date, all equal, so arrival order holds
        app.selected = 19;
        let rows = draw(&mut app, 60, 16);
        assert!(app.grid_scroll_row > 0);
        assert!(screen_contains(&rows, "Film19"));
        assert!(!screen_contains(&rows, "Film00"));
    }

    #[tokio::test]
    async fn test_empty_states() {
        let mut app = test_app();
        app.view.reload_listing();
        assert!(empty_message(&app).contains("Loading movies"));

        load_movies(&mut app, &["Dune"]);
        app.view.set_filter(FilterOptions {
            media: MediaFilter::Series,
            ..FilterOptions::default()
        });
        let rows = draw(&mut app, 100, 30);
        assert!(screen_contains(&rows, "No movies match the current filter"));

        app.view.set_filter(FilterOptions::default());
        let ticket = app.view.set_search_query("zzz").unwrap();
        app.view.apply_search::<String>(ticket.seq, Ok(Vec::new()));
        assert_eq!(empty_message(&app), "No movies found for \"zzz\"");
    }
}
