//! Application event handling.
//!
//! Feeds background fetch completions into the view state and keeps the grid
//! cursor, entrance animation and status line in step with the result.

use crate::app::{App, AppEvent};
use crate::catalog::CatalogError;

/// Short status-bar text for a failed fetch.
fn failure_status(what: &str, error: &CatalogError) -> String {
    match error {
        CatalogError::HttpStatus(401) => {
            format!("{} failed: API token missing or rejected", what)
        }
        CatalogError::HttpStatus(404) => format!("{} failed: not found", what),
        CatalogError::Timeout => format!("{} failed: request timed out", what),
        CatalogError::Network(_) => format!("{} failed: network error", what),
        CatalogError::TaskPanicked(_) => format!("{} failed: internal error", what),
        other => format!("{} failed: {}", what, other),
    }
}

/// Handle a completion event from a background task.
pub(super) fn handle_app_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::ListingLoaded { seq, mode, result } => {
            let status = result
                .as_ref()
                .err()
                .map(|e| failure_status(&format!("Loading {}", mode.heading()), e));
            if app.view.apply_listing(seq, result) {
                app.listing_handle = None;
                match status {
                    Some(msg) => {
                        app.set_status(msg);
                        app.clamp_selection();
                    }
                    None if !app.view.is_search_active() => app.reset_grid(),
                    None => app.clamp_selection(),
                }
            }
        }
        AppEvent::SearchCompleted { seq, query, result } => {
            let status = result
                .as_ref()
                .err()
                .map(|e| failure_status(&format!("Search for \"{}\"", query), e));
            if app.view.apply_search(seq, result) {
                app.search_handle = None;
                if let Some(msg) = status {
                    app.set_status(msg);
                }
                app.reset_grid();
            }
        }
        AppEvent::DetailLoaded {
            seq,
            movie_id,
            result,
        } => {
            let result = result.and_then(|detail| {
                if detail.id == movie_id {
                    Ok(detail)
                } else {
                    Err(CatalogError::MismatchedDetail {
                        expected: movie_id,
                        received: detail.id,
                    })
                }
            });
            let status = result
                .as_ref()
                .err()
                .map(|e| failure_status("Loading details", e));
            if app.view.apply_detail(seq, movie_id, result) {
                app.detail_handle = None;
                app.detail_scroll = 0;
                if let Some(msg) = status {
                    app.detail_error = Some(msg.clone());
                    app.set_status(msg);
                }
            }
        }
    }
    app.needs_redraw = true;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogClient, CatalogOptions, ListingMode, MovieSummary};
    use crate::controller::Overlay;

    fn test_app() -> App {
        let catalog = CatalogClient::new(CatalogOptions::default()).unwrap();
        App::new(catalog, ListingMode::New)
    }

    fn movies(ids: &[u64]) -> Vec<MovieSummary> {
        ids.iter()
            .map(|id| serde_json::from_value(serde_json::json!({"id": id})).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_listing_loaded_resets_grid() {
        let mut app = test_app();
        app.selected = 3;
        app.revealed = 4;
        let ticket = app.view.reload_listing();
        handle_app_event(
            &mut app,
            AppEvent::ListingLoaded {
                seq: ticket.seq,
                mode: ticket.mode,
                result: Ok(movies(&[1, 2, 3])),
            },
        );
        assert_eq!(app.view.raw_summaries().len(), 3);
        assert!(!app.view.is_list_loading());
        assert_eq!(app.selected, 0);
        assert_eq!(app.revealed, 0);
    }

    #[tokio::test]
    async fn test_listing_failure_sets_status_and_keeps_grid() {
        let mut app = test_app();
        let ticket = app.view.reload_listing();
        app.view.apply_listing::<String>(ticket.seq, Ok(movies(&[1, 2])));

        let ticket = app.view.reload_listing();
        handle_app_event(
            &mut app,
            AppEvent::ListingLoaded {
                seq: ticket.seq,
                mode: ticket.mode,
                result: Err(CatalogError::HttpStatus(401)),
            },
        );
        assert_eq!(app.view.raw_summaries().len(), 2);
        assert!(!app.view.is_list_loading());
        let (msg, _) = app.status_message.as_ref().unwrap();
        assert!(msg.contains("API token"));
    }

    #[tokio::test]
    async fn test_stale_search_ignored() {
        let mut app = test_app();
        let stale = app.view.set_search_query("bat").unwrap();
        let _fresh = app.view.set_search_query("batman").unwrap();
        handle_app_event(
            &mut app,
            AppEvent::SearchCompleted {
                seq: stale.seq,
                query: stale.query,
                result: Ok(movies(&[1])),
            },
        );
        assert!(app.view.search_results().is_none());
        assert!(app.view.is_search_loading());
    }

    #[tokio::test]
    async fn test_detail_failure_keeps_overlay() {
        let mut app = test_app();
        let ticket = app.view.select_movie(movies(&[7]).remove(0));
        handle_app_event(
            &mut app,
            AppEvent::DetailLoaded {
                seq: ticket.seq,
                movie_id: 7,
                result: Err(CatalogError::Timeout),
            },
        );
        assert_eq!(app.view.overlay(), Overlay::Detail);
        assert!(app.view.selected_detail().is_none());
        assert!(app.detail_error.as_deref().unwrap().contains("timed out"));
        assert!(!app.is_loading());
    }

    #[tokio::test]
    async fn test_mismatched_detail_counts_as_failure() {
        let mut app = test_app();
        let ticket = app.view.select_movie(movies(&[7]).remove(0));
        let wrong = serde_json::from_value(serde_json::json!({"id": 8})).unwrap();
        handle_app_event(
            &mut app,
            AppEvent::DetailLoaded {
                seq: ticket.seq,
                movie_id: 7,
                result: Ok(wrong),
            },
        );
        assert_eq!(app.view.overlay(), Overlay::Detail);
        assert!(app.view.selected_detail().is_none());
        assert!(app.detail_error.is_some());
        assert!(!app.is_loading());
    }

    #[tokio::test]
    async fn test_panicked_listing_clears_loading() {
        let mut app = test_app();
        let ticket = app.view.reload_listing();
        handle_app_event(
            &mut app,
            AppEvent::ListingLoaded {
                seq: ticket.seq,
                mode: ticket.mode,
                result: Err(CatalogError::TaskPanicked("boom".to_string())),
            },
        );
        assert!(!app.view.is_list_loading());
        let (msg, _) = app.status_message.as_ref().unwrap();
        assert!(msg.contains("internal error"));
    }

    #[tokio::test]
    async fn test_panicked_search_clears_loading() {
        let mut app = test_app();
        let ticket = app.view.set_search_query("heat").unwrap();
        handle_app_event(
            &mut app,
            AppEvent::SearchCompleted {
                seq: ticket.seq,
                query: ticket.query,
                result: Err(CatalogError::TaskPanicked("boom".to_string())),
            },
        );
        assert!(!app.view.is_search_loading());
        assert!(!app.is_loading());
    }
}
