//! Input handling for the TUI.
//!
//! This module processes keyboard input and dispatches to the appropriate
//! handler based on the overlay currently showing.

use crate::app::{App, AppEvent};
use crate::catalog::ListingMode;
use crate::controller::Overlay;
use crate::keybindings::{Action as KbAction, Context as KbContext};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyModifiers};
use tokio::sync::mpsc;

use super::helpers::{dispatch, open_external};
use super::Action;

/// Lines moved by a page scroll in the detail and help panels.
const PAGE_LINES: usize = 10;

/// Keybinding context for the current input state.
fn current_context(app: &App) -> KbContext {
    if app.search_mode {
        return KbContext::Search;
    }
    match app.view.overlay() {
        Overlay::Detail => KbContext::Detail,
        Overlay::SortMenu | Overlay::FilterMenu => KbContext::Menu,
        Overlay::Help => KbContext::Help,
        Overlay::None => KbContext::Global,
    }
}

/// Main input dispatch function.
///
/// Routes input to the appropriate handler based on current mode and overlay.
pub(super) fn handle_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Result<Action> {
    // Ctrl+C always quits, whatever has focus
    if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
        return Ok(Action::Quit);
    }

    let context = current_context(app);
    let action = app.keybindings.action_for_key(code, modifiers, context);
    app.needs_redraw = true;

    match context {
        KbContext::Search => {
            handle_search_input(app, code, action, event_tx);
            Ok(Action::Continue)
        }
        KbContext::Detail => Ok(handle_detail_input(app, action)),
        KbContext::Menu => Ok(handle_menu_input(app, action)),
        KbContext::Help => Ok(handle_help_input(app, action)),
        KbContext::Global => Ok(handle_browse_input(app, action, event_tx)),
    }
}

/// Handle input while typing a search query.
///
/// Only the search bindings apply here; every other printable key is text.
fn handle_search_input(
    app: &mut App,
    code: KeyCode,
    action: Option<KbAction>,
    event_tx: &mpsc::Sender<AppEvent>,
) {
    match action {
        Some(KbAction::ExitSearch) => app.exit_search(),
        Some(KbAction::CommitSearch) => {
            // Cancel the pending debounce first so the tick handler cannot
            // issue the same query again
            app.search_debounce = None;
            app.search_mode = false;
            if let Some(ticket) = app.commit_search() {
                dispatch(app, ticket, event_tx);
            }
        }
        _ => match code {
            KeyCode::Backspace => app.search_backspace(),
            KeyCode::Char(c) => app.search_push(c),
            _ => {}
        },
    }
}

/// Handle input while the detail overlay is visible.
fn handle_detail_input(app: &mut App, action: Option<KbAction>) -> Action {
    match action {
        Some(KbAction::Quit) => return Action::Quit,
        Some(KbAction::Back) => app.close_detail(),
        Some(KbAction::ScrollDown) => app.scroll_down(1),
        Some(KbAction::ScrollUp) => app.scroll_up(1),
        Some(KbAction::PageDown) => app.scroll_down(PAGE_LINES),
        Some(KbAction::PageUp) => app.scroll_up(PAGE_LINES),
        Some(KbAction::OpenPoster) => open_poster(app),
        Some(KbAction::OpenHomepage) => open_homepage(app),
        Some(KbAction::CycleTheme) => cycle_theme(app),
        Some(KbAction::SortMenu) | Some(KbAction::FilterMenu) => {
            app.set_status("Close the detail view first");
        }
        _ => {}
    }
    Action::Continue
}

/// Handle input while the sort or filter menu is open.
fn handle_menu_input(app: &mut App, action: Option<KbAction>) -> Action {
    match action {
        Some(KbAction::Quit) => return Action::Quit,
        Some(KbAction::NavUp) => app.menu_up(),
        Some(KbAction::NavDown) => app.menu_down(),
        Some(KbAction::Select) => app.choose_menu_option(),
        Some(KbAction::Back) => app.view.dismiss_overlay(),
        // Pressing the menu's own key again closes it
        Some(KbAction::SortMenu) if app.view.overlay() == Overlay::SortMenu => {
            app.view.dismiss_overlay();
        }
        Some(KbAction::FilterMenu) if app.view.overlay() == Overlay::FilterMenu => {
            app.view.dismiss_overlay();
        }
        Some(KbAction::SortMenu) => {
            app.view.dismiss_overlay();
            app.open_sort_menu();
        }
        Some(KbAction::FilterMenu) => {
            app.view.dismiss_overlay();
            app.open_filter_menu();
        }
        _ => {}
    }
    Action::Continue
}

/// Handle input while the help overlay is visible.
fn handle_help_input(app: &mut App, action: Option<KbAction>) -> Action {
    match action {
        Some(KbAction::Quit) => return Action::Quit,
        Some(KbAction::Back) => {
            app.view.dismiss_overlay();
            app.help_scroll_offset = 0;
        }
        Some(KbAction::ScrollDown) => app.scroll_down(1),
        Some(KbAction::ScrollUp) => app.scroll_up(1),
        Some(KbAction::PageDown) => app.scroll_down(PAGE_LINES),
        Some(KbAction::PageUp) => app.scroll_up(PAGE_LINES),
        _ => {}
    }
    Action::Continue
}

/// Handle input on the grid with no overlay showing.
fn handle_browse_input(
    app: &mut App,
    action: Option<KbAction>,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action {
    match action {
        Some(KbAction::Quit) => return Action::Quit,
        Some(KbAction::NavUp) => app.nav_up(),
        Some(KbAction::NavDown) => app.nav_down(),
        Some(KbAction::NavLeft) => app.nav_left(),
        Some(KbAction::NavRight) => app.nav_right(),
        Some(KbAction::Select) => {
            if let Some(ticket) = app.open_detail() {
                dispatch(app, ticket, event_tx);
            }
        }
        Some(KbAction::Back) => {
            if app.view.is_search_active() || app.view.is_search_loading() {
                app.exit_search();
            }
        }
        Some(KbAction::ShowNew) => switch_listing(app, ListingMode::New, event_tx),
        Some(KbAction::ShowPopular) => switch_listing(app, ListingMode::Popular, event_tx),
        Some(KbAction::Reload) => {
            let ticket = app.view.reload_listing();
            dispatch(app, ticket, event_tx);
            app.set_status(format!("Reloading {}", app.view.listing_mode().heading()));
        }
        Some(KbAction::SortMenu) => {
            app.open_sort_menu();
        }
        Some(KbAction::FilterMenu) => {
            app.open_filter_menu();
        }
        Some(KbAction::EnterSearch) => app.enter_search(),
        Some(KbAction::OpenPoster) => open_poster(app),
        Some(KbAction::CycleTheme) => cycle_theme(app),
        Some(KbAction::ShowHelp) => {
            app.help_scroll_offset = 0;
            app.view.open_help();
        }
        _ => {}
    }
    Action::Continue
}

/// Switch between New and Popular. Selecting the current mode is a no-op.
fn switch_listing(app: &mut App, mode: ListingMode, event_tx: &mpsc::Sender<AppEvent>) {
    if let Some(ticket) = app.view.set_listing_mode(mode) {
        dispatch(app, ticket, event_tx);
        if !app.view.is_search_active() {
            app.reset_grid();
        }
    }
}

fn open_poster(app: &mut App) {
    match app.poster_url() {
        Some(url) => open_external(app, &url),
        None => app.set_status("No poster for this movie"),
    }
}

fn open_homepage(app: &mut App) {
    match app.homepage_url() {
        Some(url) => open_external(app, &url),
        None => app.set_status("No homepage for this movie"),
    }
}

fn cycle_theme(app: &mut App) {
    let name = app.cycle_theme();
    app.set_status(format!("Theme: {}", name));
}
