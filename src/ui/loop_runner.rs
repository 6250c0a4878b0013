//! Main event loop for the TUI.
//!
//! This module contains the core event loop that multiplexes terminal input,
//! background task events, and periodic ticks.

use crate::app::{App, AppEvent, SPINNER_FRAMES};
use anyhow::Result;
use crossterm::{
    event::Event,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::time::Duration;
use tokio::sync::mpsc;

#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};

use super::events::handle_app_event;
use super::helpers::dispatch;
use super::input::handle_input;
use super::render::render;

/// Tick period. Drives the spinner, the card entrance animation, status
/// expiry and the search debounce.
const TICK: Duration = Duration::from_millis(100);

/// Result of handling a key press event.
///
/// Returned by input handlers to signal whether the application should
/// continue running or terminate gracefully.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Continue the event loop and process more events.
    Continue,
    /// Exit the application and restore the terminal.
    Quit,
}

/// Runs the TUI application event loop.
///
/// Uses `tokio::select!` to multiplex three event sources:
/// - **Terminal input**: Key presses from crossterm's async event stream
/// - **Background tasks**: Listing, search and detail completions via the `AppEvent` channel
/// - **Periodic tick**: 100ms timer for animation, status expiry and debounced search
///
/// The initial listing fetch is issued before the first frame, so the grid
/// opens in its loading state.
///
/// # Panic Safety
///
/// Installs a panic hook that restores terminal state before unwinding,
/// ensuring the terminal is not left in raw mode on panic.
pub async fn run(
    app: &mut App,
    event_tx: mpsc::Sender<AppEvent>,
    mut event_rx: mpsc::Receiver<AppEvent>,
) -> Result<()> {
    // Install panic hook BEFORE setting up terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let mut terminal = setup_terminal()?;
    let mut event_stream = crossterm::event::EventStream::new();
    let mut tick_interval = tokio::time::interval(TICK);

    // Signal handlers for graceful shutdown (Unix only)
    // On non-Unix platforms, these become pending futures that never complete
    #[cfg(unix)]
    let mut sigterm = signal(SignalKind::terminate())?;
    #[cfg(unix)]
    let mut sigint = signal(SignalKind::interrupt())?;

    let ticket = app.view.reload_listing();
    dispatch(app, ticket, &event_tx);

    loop {
        // Only render when state has changed
        if app.needs_redraw {
            terminal.draw(|f| render(f, app))?;
            app.needs_redraw = false;
        }

        if app.clear_expired_status() {
            app.needs_redraw = true;
        }

        // Drain pending completions before handling more input so results
        // are not starved by fast typing
        while let Ok(event) = event_rx.try_recv() {
            handle_app_event(app, event);
        }

        // Platform-specific signal futures
        #[cfg(unix)]
        let sigterm_fut = sigterm.recv();
        #[cfg(not(unix))]
        let sigterm_fut = std::future::pending::<Option<()>>();

        #[cfg(unix)]
        let sigint_fut = sigint.recv();
        #[cfg(not(unix))]
        let sigint_fut = std::future::pending::<Option<()>>();

        tokio::select! {
            biased;

            _ = sigterm_fut => {
                tracing::info!("Received SIGTERM, shutting down gracefully");
                break;
            }

            _ = sigint_fut => {
                tracing::info!("Received SIGINT, shutting down gracefully");
                break;
            }

            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key))) => {
                        match handle_input(app, key.code, key.modifiers, &event_tx) {
                            Ok(Action::Quit) => break,
                            Ok(Action::Continue) => {}
                            Err(e) => app.set_status(format!("Error: {}", e)),
                        }
                    }
                    Some(Ok(Event::Resize(_, _))) => app.needs_redraw = true,
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::error!(error = %e, "Terminal event stream failed");
                        break;
                    }
                    None => break,
                }
            }

            Some(event) = event_rx.recv() => {
                handle_app_event(app, event);
            }

            _ = tick_interval.tick() => {
                handle_tick(app, &event_tx);
            }
        }
    }

    restore_terminal(terminal)?;
    Ok(())
}

/// Periodic housekeeping: spinner, card reveal and the search debounce.
fn handle_tick(app: &mut App, event_tx: &mpsc::Sender<AppEvent>) {
    if app.is_loading() {
        app.spinner_frame = (app.spinner_frame + 1) % SPINNER_FRAMES.len();
        app.needs_redraw = true;
    }

    if app.advance_reveal() {
        app.needs_redraw = true;
    }

    // Only fire the debounced search while still typing; Enter and Esc
    // handle their own commit
    if app.search_mode && app.search_due() {
        app.needs_redraw = true;
        if let Some(ticket) = app.commit_search() {
            dispatch(app, ticket, event_tx);
        }
    }
}

/// Set up the terminal for TUI rendering.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal to normal state.
fn restore_terminal(mut terminal: Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogClient, CatalogOptions, ListingMode, MovieSummary};
    use tokio::time;

    fn test_app() -> App {
        let catalog = CatalogClient::new(CatalogOptions::default()).unwrap();
        App::new(catalog, ListingMode::New)
    }

    #[tokio::test]
    async fn test_tick_reveals_one_card() {
        let mut app = test_app();
        let (tx, _rx) = mpsc::channel(8);
        let ticket = app.view.reload_listing();
        let movies: Vec<MovieSummary> = (1..=3)
            .map(|id| serde_json::from_value(serde_json::json!({ "id": id })).unwrap())
            .collect();
        app.view.apply_listing::<String>(ticket.seq, Ok(movies));

        handle_tick(&mut app, &tx);
        assert_eq!(app.revealed, 1);
        handle_tick(&mut app, &tx);
        handle_tick(&mut app, &tx);
        handle_tick(&mut app, &tx);
        assert_eq!(app.revealed, 3);
    }

    #[tokio::test]
    async fn test_tick_spins_only_while_loading() {
        let mut app = test_app();
        let (tx, _rx) = mpsc::channel(8);
        handle_tick(&mut app, &tx);
        assert_eq!(app.spinner_frame, 0);

        app.view.reload_listing();
        handle_tick(&mut app, &tx);
        handle_tick(&mut app, &tx);
        assert_eq!(app.spinner_frame, 2);
    }

    #[tokio::test]
    async fn test_tick_fires_debounced_search() {
        time::pause();
        let mut app = test_app();
        let (tx, _rx) = mpsc::channel(8);
        app.enter_search();
        app.search_push('a');

        handle_tick(&mut app, &tx);
        assert!(app.search_handle.is_none());
        assert_eq!(app.view.search_query(), "");

        time::advance(Duration::from_millis(350)).await;
        handle_tick(&mut app, &tx);
        assert_eq!(app.view.search_query(), "a");
        assert!(app.search_handle.is_some());
        assert!(app.search_debounce.is_none());
        assert!(app.search_mode);
    }
}
