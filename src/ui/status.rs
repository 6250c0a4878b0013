use crate::app::{App, SPINNER_FRAMES};
use crate::controller::Overlay;
use crate::keybindings::{Action, Context};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use std::borrow::Cow;

/// Hints shown per context, as (action, label) pairs.
const GLOBAL_HINTS: [(Action, &str); 8] = [
    (Action::ShowNew, "new"),
    (Action::ShowPopular, "popular"),
    (Action::EnterSearch, "search"),
    (Action::SortMenu, "sort"),
    (Action::FilterMenu, "filter"),
    (Action::Select, "details"),
    (Action::ShowHelp, "help"),
    (Action::Quit, "quit"),
];
const DETAIL_HINTS: [(Action, &str); 5] = [
    (Action::Back, "back"),
    (Action::ScrollDown, "scroll"),
    (Action::OpenPoster, "poster"),
    (Action::OpenHomepage, "homepage"),
    (Action::Quit, "quit"),
];
const MENU_HINTS: [(Action, &str); 3] = [
    (Action::Select, "choose"),
    (Action::Back, "close"),
    (Action::Quit, "quit"),
];
const SEARCH_HINTS: [(Action, &str); 2] = [
    (Action::CommitSearch, "search now"),
    (Action::ExitSearch, "clear"),
];

/// Join `[key]label` hints using the live bindings, skipping unbound actions.
fn hint_line(app: &App, context: Context, hints: &[(Action, &str)]) -> String {
    hints
        .iter()
        .filter_map(|(action, label)| {
            app.keybindings
                .key_hint(*action, context)
                .map(|key| format!("[{}]{}", key, label))
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render the status bar
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    // Status bar needs at least 1 char width to be meaningful
    if area.width < 1 || area.height < 1 {
        return;
    }

    let text: Cow<'_, str> = if let Some((msg, _)) = &app.status_message {
        Cow::Borrowed(&**msg)
    } else if app.search_mode {
        Cow::Owned(format!(
            "Type to search | {}",
            hint_line(app, Context::Search, &SEARCH_HINTS)
        ))
    } else {
        match app.view.overlay() {
            Overlay::Detail => Cow::Owned(hint_line(app, Context::Detail, &DETAIL_HINTS)),
            Overlay::SortMenu | Overlay::FilterMenu => {
                Cow::Owned(hint_line(app, Context::Menu, &MENU_HINTS))
            }
            Overlay::Help => Cow::Borrowed("j/k scroll | ? or b to close"),
            Overlay::None => Cow::Owned(hint_line(app, Context::Global, &GLOBAL_HINTS)),
        }
    };

    let mut spans = Vec::with_capacity(2);
    if app.is_loading() {
        spans.push(Span::styled(
            format!("{} ", SPINNER_FRAMES[app.spinner_frame % SPINNER_FRAMES.len()]),
            app.style("status_bar").patch(app.style("spinner")),
        ));
    }
    let role = if app.status_message.as_ref().is_some_and(|(msg, _)| msg.contains("failed")) {
        "status_error"
    } else {
        "status_bar"
    };
    spans.push(Span::styled(text, app.style(role)));

    let paragraph = Paragraph::new(Line::from(spans)).style(app.style("status_bar"));
    f.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::test_support::test_app;

    #[tokio::test]
    async fn test_global_hints_use_bindings() {
        let app = test_app();
        let line = hint_line(&app, Context::Global, &GLOBAL_HINTS);
        assert!(line.starts_with("[n]new [p]popular [/]search"));
        assert!(line.ends_with("[q]quit"));
    }

    #[tokio::test]
    async fn test_hints_follow_overrides() {
        let mut app = test_app();
        let overrides = [("quit".to_string(), "x".to_string())].into_iter().collect();
        assert!(app.keybindings.apply_overrides(&overrides).is_empty());
        let line = hint_line(&app, Context::Detail, &DETAIL_HINTS);
        assert!(line.contains("[x]quit"));
    }
}
