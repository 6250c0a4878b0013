//! Sort and filter menu overlays.
//!
//! Both are radio-style lists: the cursor row is highlighted, the active
//! choice carries a filled marker. The filter menu stacks the language and
//! media groups so the menu cursor indexes them as one list.

use crate::app::App;
use crate::controller::{LanguageFilter, MediaFilter, Overlay, SortKey};
use ratatui::{
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::render::centered_rect;

const MENU_WIDTH: u16 = 34;

fn option_line(app: &App, label: &str, active: bool, cursor: bool) -> Line<'static> {
    let marker = if active { "(•)" } else { "( )" };
    let role = if cursor { "menu_cursor" } else { "menu_option" };
    Line::from(Span::styled(format!(" {} {:<24}", marker, label), app.style(role)))
}

fn heading_line(app: &App, text: &str) -> Line<'static> {
    Line::from(Span::styled(format!(" {}", text), app.style("menu_heading")))
}

fn sort_lines(app: &App) -> Vec<Line<'static>> {
    let current = app.view.sort_key();
    SortKey::ALL
        .iter()
        .enumerate()
        .map(|(i, key)| option_line(app, key.label(), *key == current, i == app.menu_cursor))
        .collect()
}

fn filter_lines(app: &App) -> Vec<Line<'static>> {
    let current = app.view.filter_options();
    let lang_rows = LanguageFilter::ALL.len();

    let mut lines = vec![heading_line(app, "Language")];
    lines.extend(LanguageFilter::ALL.iter().enumerate().map(|(i, lang)| {
        option_line(
            app,
            lang.label(),
            *lang == current.language,
            i == app.menu_cursor,
        )
    }));
    lines.push(Line::from(""));
    lines.push(heading_line(app, "Media"));
    lines.extend(MediaFilter::ALL.iter().enumerate().map(|(i, media)| {
        option_line(
            app,
            media.label(),
            *media == current.media,
            lang_rows + i == app.menu_cursor,
        )
    }));
    lines
}

/// Render whichever menu the overlay names.
pub fn render(f: &mut Frame, app: &App) {
    let (title, mut lines) = match app.view.overlay() {
        Overlay::SortMenu => (" Sort by ", sort_lines(app)),
        Overlay::FilterMenu => (" Filter ", filter_lines(app)),
        _ => return,
    };
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        " Enter select  b/Esc close",
        app.style("header_meta"),
    )));

    let height = lines.len() as u16 + 2;
    let area = centered_rect(MENU_WIDTH, height, f.area());
    if area.width < 20 || area.height < 5 {
        return;
    }

    f.render_widget(Clear, area);
    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(app.style("menu_border"))
            .title(title),
    );
    f.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use crate::ui::test_support::{draw, load_movies, screen_contains, test_app};

    #[tokio::test]
    async fn test_sort_menu_marks_current_key() {
        let mut app = test_app();
        load_movies(&mut app, &["Dune"]);
        app.open_sort_menu();
        let rows = draw(&mut app, 100, 30);
        assert!(screen_contains(&rows, "Sort by"));
        assert!(screen_contains(&rows, "(•) Newest"));
        assert!(screen_contains(&rows, "( ) Popularity"));
    }

    #[tokio::test]
    async fn test_filter_menu_lists_both_groups() {
        let mut app = test_app();
        app.open_filter_menu();
        app.menu_down();
        app.choose_menu_option();
        let rows = draw(&mut app, 100, 30);
        assert!(screen_contains(&rows, "Language"));
        assert!(screen_contains(&rows, "Media"));
        assert!(screen_contains(&rows, "(•) Subtitled"));
        assert!(screen_contains(&rows, "(•) All media"));
    }
}
