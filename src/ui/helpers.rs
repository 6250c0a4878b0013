//! Background fetch spawning and other helpers shared by the UI layer.

use crate::app::{abort_task, App, AppEvent};
use crate::catalog::{CatalogClient, CatalogError};
use crate::controller::{DetailTicket, FetchTicket, ListingTicket, SearchTicket};
use crate::util::validate_url_for_open;
use futures::FutureExt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Wraps a future to catch panics and convert them to errors.
///
/// A panic inside a spawned fetch would otherwise vanish into the runtime and
/// leave its loading flag set forever. Returns `Err(panic_message)` instead.
pub(super) async fn catch_task_panic<F, T>(future: F) -> Result<T, String>
where
    F: Future<Output = T>,
{
    AssertUnwindSafe(future)
        .catch_unwind()
        .await
        .map_err(|panic| {
            if let Some(s) = panic.downcast_ref::<&'static str>() {
                s.to_string()
            } else if let Some(s) = panic.downcast_ref::<String>() {
                s.clone()
            } else {
                "Unknown panic payload".to_string()
            }
        })
}

/// Run `work` on the runtime and send its event back. A panic is reported
/// through `on_panic`, so the fetch still resolves as a failure.
fn spawn_reporting<F, P>(
    task: &'static str,
    tx: mpsc::Sender<AppEvent>,
    work: F,
    on_panic: P,
) -> JoinHandle<()>
where
    F: Future<Output = AppEvent> + Send + 'static,
    P: FnOnce(CatalogError) -> AppEvent + Send + 'static,
{
    tokio::spawn(async move {
        let event = match catch_task_panic(work).await {
            Ok(event) => event,
            Err(panic_msg) => {
                tracing::error!(task, error = %panic_msg, "Background task panicked");
                on_panic(CatalogError::TaskPanicked(panic_msg))
            }
        };
        if let Err(e) = tx.send(event).await {
            tracing::warn!(task, error = %e, "Channel send failed (receiver dropped)");
        }
    })
}

fn spawn_listing(
    ticket: ListingTicket,
    catalog: CatalogClient,
    tx: mpsc::Sender<AppEvent>,
) -> JoinHandle<()> {
    tracing::debug!(seq = ticket.seq, mode = ?ticket.mode, "Spawning listing fetch");
    let (seq, mode) = (ticket.seq, ticket.mode);
    spawn_reporting(
        "listing",
        tx,
        async move {
            let result = catalog.listing(mode).await;
            AppEvent::ListingLoaded { seq, mode, result }
        },
        move |e| AppEvent::ListingLoaded {
            seq,
            mode,
            result: Err(e),
        },
    )
}

fn spawn_search(
    ticket: SearchTicket,
    catalog: CatalogClient,
    tx: mpsc::Sender<AppEvent>,
) -> JoinHandle<()> {
    tracing::debug!(seq = ticket.seq, query = %ticket.query, "Spawning search");
    let seq = ticket.seq;
    let query = ticket.query.clone();
    spawn_reporting(
        "search",
        tx,
        async move {
            let result = catalog.search(&ticket.query).await;
            AppEvent::SearchCompleted {
                seq,
                query: ticket.query,
                result,
            }
        },
        move |e| AppEvent::SearchCompleted {
            seq,
            query,
            result: Err(e),
        },
    )
}

fn spawn_detail(
    ticket: DetailTicket,
    catalog: CatalogClient,
    tx: mpsc::Sender<AppEvent>,
) -> JoinHandle<()> {
    tracing::debug!(seq = ticket.seq, movie_id = ticket.movie_id, "Spawning detail fetch");
    let (seq, movie_id) = (ticket.seq, ticket.movie_id);
    spawn_reporting(
        "detail",
        tx,
        async move {
            let result = catalog.detail(movie_id).await;
            AppEvent::DetailLoaded {
                seq,
                movie_id,
                result,
            }
        },
        move |e| AppEvent::DetailLoaded {
            seq,
            movie_id,
            result: Err(e),
        },
    )
}

/// Perform the request a ticket describes, replacing any in-flight fetch of
/// the same kind.
pub(super) fn dispatch(
    app: &mut App,
    ticket: impl Into<FetchTicket>,
    tx: &mpsc::Sender<AppEvent>,
) {
    let catalog = app.catalog.clone();
    let tx = tx.clone();
    match ticket.into() {
        FetchTicket::Listing(t) => {
            abort_task(&mut app.listing_handle, "listing");
            app.listing_handle = Some(spawn_listing(t, catalog, tx));
        }
        FetchTicket::Search(t) => {
            abort_task(&mut app.search_handle, "search");
            app.search_handle = Some(spawn_search(t, catalog, tx));
        }
        FetchTicket::Detail(t) => {
            abort_task(&mut app.detail_handle, "detail");
            app.detail_handle = Some(spawn_detail(t, catalog, tx));
        }
    }
    app.needs_redraw = true;
}

/// Open a catalog-supplied URL in the system browser after validation.
pub(super) fn open_external(app: &mut App, url: &str) {
    match validate_url_for_open(url) {
        Err(e) => {
            tracing::warn!(url, error = %e, "Refusing to open URL");
            app.set_status(e.to_string());
        }
        Ok(url) => match open::that(url.as_str()) {
            Ok(()) => app.set_status("Opened in browser"),
            Err(e) => app.set_status(format!("Failed to open browser: {}", e)),
        },
    }
}
