use crate::app::{App, SPINNER_FRAMES};
use crate::catalog::{format_runtime, format_usd, MovieDetail, MovieSummary};
use crate::util::{clean_text, display_width};
use ratatui::{
    layout::Rect,
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Width of the field label column.
const LABEL_WIDTH: usize = 11;

/// Render the detail overlay over the grid area.
pub fn render(f: &mut Frame, app: &mut App, area: Rect) {
    if area.width < 10 || area.height < 4 {
        return;
    }

    let lines = match app.view.selected_movie() {
        Some(movie) => build_lines(app, movie, app.view.selected_detail()),
        None => return,
    };

    // Update visible lines and clamp before drawing so a resize never shows
    // an out-of-range offset
    let inner_width = area.width.saturating_sub(2) as usize;
    app.detail_visible_lines = area.height.saturating_sub(2) as usize;
    let content_lines = wrapped_height(&lines, inner_width);
    app.detail_scroll = App::clamp_scroll(
        app.detail_scroll,
        content_lines,
        app.detail_visible_lines,
    );

    f.render_widget(Clear, area);
    let paragraph = Paragraph::new(Text::from(lines))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.style("menu_border"))
                .title(" Details (b to go back) "),
        )
        .wrap(Wrap { trim: false })
        .scroll((app.detail_scroll as u16, 0));
    f.render_widget(paragraph, area);
}

/// Rows the lines occupy once wrapped to `width`.
fn wrapped_height(lines: &[Line<'_>], width: usize) -> usize {
    let width = width.max(1);
    lines
        .iter()
        .map(|line| display_width(&line.to_string()).div_ceil(width).max(1))
        .sum()
}

fn field(app: &App, label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:<LABEL_WIDTH$}", label), app.style("detail_label")),
        Span::styled(value, app.style("detail_body")),
    ])
}

fn build_lines(
    app: &App,
    movie: &MovieSummary,
    detail: Option<&MovieDetail>,
) -> Vec<Line<'static>> {
    let mut title = clean_text(movie.display_title()).into_owned();
    if let Some(year) = movie.release_year() {
        title.push_str(&format!(" ({})", year));
    }
    let mut lines = vec![Line::from(Span::styled(title, app.style("detail_title")))];

    if let Some(tagline) = detail.and_then(MovieDetail::tagline) {
        lines.push(Line::from(Span::styled(
            clean_text(tagline).into_owned(),
            app.style("detail_tagline"),
        )));
    }
    lines.push(Line::from(""));

    lines.push(field(
        app,
        "Rating",
        format!("★ {} ({} votes)", movie.rating_label(), movie.vote_count),
    ));
    if let Some(date) = movie.release() {
        lines.push(field(app, "Released", date.format("%B %-d, %Y").to_string()));
    }

    match detail {
        Some(detail) => push_detail_fields(app, detail, &mut lines),
        None => match &app.detail_error {
            Some(error) => lines.push(Line::from(Span::styled(
                error.clone(),
                app.style("status_error"),
            ))),
            None => lines.push(Line::from(Span::styled(
                format!(
                    "{} Loading details...",
                    SPINNER_FRAMES[app.spinner_frame % SPINNER_FRAMES.len()]
                ),
                app.style("detail_loading"),
            ))),
        },
    }

    let overview = clean_text(&movie.overview);
    if !overview.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Overview",
            app.style("menu_heading"),
        )));
        lines.push(Line::from(Span::styled(
            overview.into_owned(),
            app.style("detail_body"),
        )));
    }

    let poster = app.catalog.image_url(movie.poster_path.as_deref());
    let homepage = detail.and_then(MovieDetail::homepage);
    if poster.is_some() || homepage.is_some() {
        lines.push(Line::from(""));
    }
    if let Some(url) = poster {
        lines.push(Line::from(vec![
            Span::styled(format!("{:<LABEL_WIDTH$}", "Poster"), app.style("detail_label")),
            Span::styled(url, app.style("detail_link")),
            Span::styled("  (o to open)", app.style("detail_label")),
        ]));
    }
    if let Some(url) = homepage {
        lines.push(Line::from(vec![
            Span::styled(format!("{:<LABEL_WIDTH$}", "Homepage"), app.style("detail_label")),
            Span::styled(clean_text(url).into_owned(), app.style("detail_link")),
            Span::styled("  (w to open)", app.style("detail_label")),
        ]));
    }

    lines
}

fn push_detail_fields(app: &App, detail: &MovieDetail, lines: &mut Vec<Line<'static>>) {
    if let Some(minutes) = detail.runtime() {
        lines.push(field(app, "Runtime", format_runtime(minutes)));
    }
    if let Some(genres) = detail.genre_line() {
        lines.push(field(app, "Genres", clean_text(&genres).into_owned()));
    }
    if let Some(status) = detail.status() {
        lines.push(field(app, "Status", clean_text(status).into_owned()));
    }
    if let Some(budget) = detail.budget() {
        lines.push(field(app, "Budget", format_usd(budget)));
    }
    if let Some(revenue) = detail.revenue() {
        lines.push(field(app, "Revenue", format_usd(revenue)));
    }
    if let Some(companies) = detail.company_line() {
        lines.push(field(app, "Studios", clean_text(&companies).into_owned()));
    }
    if let Some(languages) = detail.language_line() {
        lines.push(field(app, "Languages", clean_text(&languages).into_owned()));
    }
    if let Some(imdb) = detail.imdb_id() {
        lines.push(field(app, "IMDb", clean_text(imdb).into_owned()));
    }
}
