use crate::app::{App, SPINNER_FRAMES};
use crate::catalog::ListingMode;
use crate::util::{clean_text, truncate_to_width};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Render the header: heading, listing tabs, sort and filter state on the
/// first line, the search bar on the second.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let mode = app.view.listing_mode();
    let mut first = vec![
        Span::styled(format!(" {} ", mode.heading()), app.style("header_title")),
        Span::raw(" "),
    ];
    for tab in [ListingMode::New, ListingMode::Popular] {
        let role = if tab == mode {
            "tab_active"
        } else {
            "tab_inactive"
        };
        first.push(Span::styled(format!(" {} ", tab.label()), app.style(role)));
        first.push(Span::raw(" "));
    }
    first.push(Span::styled(
        format!(
            " Sort: {} | Filter: {}",
            app.view.sort_key().label(),
            app.view.filter_options().summary()
        ),
        app.style("header_meta"),
    ));

    let lines = vec![Line::from(first), search_line(app, area.width)];
    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(app.style("card_border")),
    );
    f.render_widget(paragraph, area);
}

fn search_line(app: &App, width: u16) -> Line<'static> {
    // Room for the prefix and the loading suffix
    let room = (width as usize).saturating_sub(24);

    if app.search_mode {
        let input = clean_text(&app.search_input);
        return Line::from(vec![
            Span::styled(" Search: ", app.style("search_bar_active")),
            Span::styled(
                format!("{}_", truncate_to_width(&input, room)),
                app.style("search_bar_active"),
            ),
        ]);
    }

    if app.view.is_search_active() {
        let query = clean_text(app.view.search_query().trim());
        let mut spans = vec![
            Span::styled(" Results for ", app.style("search_bar")),
            Span::styled(
                format!("\"{}\"", truncate_to_width(&query, room)),
                app.style("search_bar_active"),
            ),
        ];
        if app.view.is_search_loading() {
            spans.push(Span::styled(
                format!(" {} searching", SPINNER_FRAMES[app.spinner_frame % SPINNER_FRAMES.len()]),
                app.style("spinner"),
            ));
        } else {
            spans.push(Span::styled("  (Esc to clear)", app.style("search_bar")));
        }
        return Line::from(spans);
    }

    Line::from(Span::styled(" / to search", app.style("search_bar")))
}
