use crate::catalog::{CatalogClient, CatalogError, ListingMode, MovieDetail, MovieSummary};
use crate::controller::{
    DetailTicket, FilterOptions, LanguageFilter, MediaFilter, Overlay, SearchTicket, SortKey, ViewState,
};
use crate::keybindings::KeybindingRegistry;
use crate::theme::{StyleMap, ThemeVariant};
use crate::util::MAX_SEARCH_QUERY_LENGTH;
use ratatui::style::Style;
use std::borrow::Cow;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Maximum scroll offset for scrollable panels (ratatui u16 limit).
pub const MAX_SCROLL: usize = u16::MAX as usize;

/// Braille spinner shown while a fetch is in flight.
pub const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Grid width breakpoints: at least this many columns of terminal width for
/// 2, 3, 4 and 5 cards per row.
const COLUMN_BREAKPOINTS: [u16; 4] = [64, 96, 128, 160];

/// Number of rows in the filter menu: language choices then media choices.
pub const FILTER_MENU_ROWS: usize = LanguageFilter::ALL.len() + MediaFilter::ALL.len();

/// How long a status message stays visible.
const STATUS_TTL: Duration = Duration::from_secs(3);

// ============================================================================
// Background Events
// ============================================================================

/// Completions sent back to the UI task by spawned fetches.
pub enum AppEvent {
    ListingLoaded {
        seq: u64,
        mode: ListingMode,
        result: Result<Vec<MovieSummary>, CatalogError>,
    },
    SearchCompleted {
        seq: u64,
        query: String,
        result: Result<Vec<MovieSummary>, CatalogError>,
    },
    DetailLoaded {
        seq: u64,
        movie_id: u64,
        result: Result<MovieDetail, CatalogError>,
    },
}

// ============================================================================
// Application State
// ============================================================================

/// UI shell around [`ViewState`].
///
/// `ViewState` owns the catalog-derived state; everything here is
/// presentation: theme, cursor, animation, input buffers and the handles of
/// the tasks currently fetching on our behalf.
pub struct App {
    pub view: ViewState,
    pub catalog: CatalogClient,

    // Theme
    pub theme_variant: ThemeVariant,
    pub theme: StyleMap,

    pub keybindings: KeybindingRegistry,

    // Grid
    /// Index into `view.arranged()` of the focused card.
    pub selected: usize,
    /// Cards per row at the last render.
    pub grid_columns: usize,
    /// First visible grid row, kept by the renderer.
    pub grid_scroll_row: usize,
    /// Number of cards revealed by the entrance animation so far.
    pub revealed: usize,

    // Search
    pub search_mode: bool,
    pub search_input: String,
    /// Time of the last keystroke not yet sent as a query.
    pub search_debounce: Option<Instant>,
    pub search_debounce_delay: Duration,

    // Overlays
    pub menu_cursor: usize,
    pub detail_scroll: usize,
    /// Why the open detail record failed to load, if it did.
    pub detail_error: Option<String>,
    /// Visible lines of the detail panel at the last render.
    pub detail_visible_lines: usize,
    pub help_scroll_offset: usize,

    pub status_message: Option<(Cow<'static, str>, Instant)>,

    /// Skip frame renders when nothing changed.
    pub needs_redraw: bool,

    /// Current frame of the loading spinner animation.
    pub spinner_frame: usize,

    // In-flight tasks. A new fetch of the same kind aborts the previous one;
    // the view state's sequence numbers discard anything that still lands.
    pub listing_handle: Option<JoinHandle<()>>,
    pub search_handle: Option<JoinHandle<()>>,
    pub detail_handle: Option<JoinHandle<()>>,
}

impl App {
    pub fn new(catalog: CatalogClient, mode: ListingMode) -> Self {
        Self {
            view: ViewState::new(mode),
            catalog,
            theme_variant: ThemeVariant::Dark,
            theme: StyleMap::from_palette(&ThemeVariant::Dark.palette()),
            keybindings: KeybindingRegistry::new(),
            selected: 0,
            grid_columns: 1,
            grid_scroll_row: 0,
            revealed: 0,
            search_mode: false,
            search_input: String::new(),
            search_debounce: None,
            search_debounce_delay: Duration::from_millis(300),
            menu_cursor: 0,
            detail_scroll: 0,
            detail_error: None,
            detail_visible_lines: 0,
            help_scroll_offset: 0,
            status_message: None,
            needs_redraw: true,
            spinner_frame: 0,
            listing_handle: None,
            search_handle: None,
            detail_handle: None,
        }
    }

    /// Resolve a semantic role name to its `Style`.
    pub fn style(&self, role: &str) -> Style {
        self.theme.resolve(role)
    }

    pub fn set_theme(&mut self, variant: ThemeVariant) {
        self.theme_variant = variant;
        self.theme = StyleMap::from_palette(&variant.palette());
        self.needs_redraw = true;
    }

    /// Toggle Dark ↔ Light. Returns the new theme's name for the status bar.
    pub fn cycle_theme(&mut self) -> &'static str {
        let next = self.theme_variant.next();
        self.set_theme(next);
        next.name()
    }

    pub fn is_loading(&self) -> bool {
        self.view.is_list_loading()
            || self.view.is_search_loading()
            || (self.view.is_detail_open()
                && self.view.selected_detail().is_none()
                && self.detail_error.is_none())
    }

    // ========================================================================
    // Grid
    // ========================================================================

    /// Cards per row for a grid area `width` columns wide (1 to 5).
    pub fn columns_for_width(width: u16) -> usize {
        1 + COLUMN_BREAKPOINTS.iter().filter(|&&bp| width >= bp).count()
    }

    /// The card under the grid cursor.
    pub fn focused_movie(&self) -> Option<&MovieSummary> {
        self.view.arranged().get(self.selected).copied()
    }

    /// Keep the cursor inside the arranged list. Call whenever it changes.
    pub fn clamp_selection(&mut self) {
        let len = self.view.arranged().len();
        self.selected = self.selected.min(len.saturating_sub(1));
        self.revealed = self.revealed.min(len);
    }

    /// Restart the grid from the top with the entrance animation.
    pub fn reset_grid(&mut self) {
        self.selected = 0;
        self.grid_scroll_row = 0;
        self.revealed = 0;
        self.needs_redraw = true;
    }

    /// Reveal one more card. Returns `true` if anything changed.
    pub fn advance_reveal(&mut self) -> bool {
        let len = self.view.arranged().len();
        if self.revealed < len {
            self.revealed += 1;
            true
        } else {
            false
        }
    }

    pub fn nav_up(&mut self) {
        let cols = self.grid_columns.max(1);
        if self.selected >= cols {
            self.selected -= cols;
        }
    }

    pub fn nav_down(&mut self) {
        let cols = self.grid_columns.max(1);
        let len = self.view.arranged().len();
        if self.selected + cols < len {
            self.selected += cols;
        } else if len > 0 && self.selected / cols < (len - 1) / cols {
            // Partial last row: land on its last card
            self.selected = len - 1;
        }
    }

    pub fn nav_left(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn nav_right(&mut self) {
        let len = self.view.arranged().len();
        if self.selected + 1 < len {
            self.selected += 1;
        }
    }

    // ========================================================================
    // Sort / filter menus
    // ========================================================================

    pub fn open_sort_menu(&mut self) -> bool {
        if !self.view.open_sort_menu() {
            return false;
        }
        let current = self.view.sort_key();
        self.menu_cursor = SortKey::ALL.iter().position(|k| *k == current).unwrap_or(0);
        true
    }

    pub fn open_filter_menu(&mut self) -> bool {
        if !self.view.open_filter_menu() {
            return false;
        }
        let current = self.view.filter_options().language;
        self.menu_cursor = LanguageFilter::ALL
            .iter()
            .position(|l| *l == current)
            .unwrap_or(0);
        true
    }

    fn menu_len(&self) -> usize {
        match self.view.overlay() {
            Overlay::SortMenu => SortKey::ALL.len(),
            Overlay::FilterMenu => FILTER_MENU_ROWS,
            _ => 0,
        }
    }

    pub fn menu_up(&mut self) {
        self.menu_cursor = self.menu_cursor.saturating_sub(1);
    }

    pub fn menu_down(&mut self) {
        let len = self.menu_len();
        if self.menu_cursor + 1 < len {
            self.menu_cursor += 1;
        }
    }

    /// Apply the option under the menu cursor.
    ///
    /// Choosing a sort order closes the menu. The filter menu stays open so
    /// both dimensions can be set in one visit.
    pub fn choose_menu_option(&mut self) {
        match self.view.overlay() {
            Overlay::SortMenu => {
                if let Some(&key) = SortKey::ALL.get(self.menu_cursor) {
                    if key != self.view.sort_key() {
                        self.view.set_sort_key(key);
                        self.reset_grid();
                    }
                    self.set_status(format!("Sorted by {}", key.label()));
                }
                self.view.dismiss_overlay();
            }
            Overlay::FilterMenu => {
                let mut options: FilterOptions = self.view.filter_options();
                let lang_rows = LanguageFilter::ALL.len();
                if let Some(&language) = LanguageFilter::ALL.get(self.menu_cursor) {
                    options.language = language;
                } else if let Some(&media) = MediaFilter::ALL.get(self.menu_cursor - lang_rows) {
                    options.media = media;
                }
                if options != self.view.filter_options() {
                    self.view.set_filter(options);
                    self.reset_grid();
                }
            }
            _ => {}
        }
        self.needs_redraw = true;
    }

    // ========================================================================
    // Search
    // ========================================================================

    pub fn enter_search(&mut self) {
        self.search_mode = true;
        self.search_input = self.view.search_query().to_string();
    }

    /// Append a typed character and restart the debounce timer.
    pub fn search_push(&mut self, c: char) {
        if self.search_input.chars().count() >= MAX_SEARCH_QUERY_LENGTH {
            self.set_status("Search query too long");
            return;
        }
        self.search_input.push(c);
        self.search_debounce = Some(Instant::now());
    }

    pub fn search_backspace(&mut self) {
        if self.search_input.pop().is_some() {
            self.search_debounce = Some(Instant::now());
        }
    }

    /// True once the debounce delay has passed since the last keystroke.
    pub fn search_due(&self) -> bool {
        self.search_debounce
            .map(|t| t.elapsed() >= self.search_debounce_delay)
            .unwrap_or(false)
    }

    /// Hand the typed text to the view state now. A blank query ends the
    /// search and yields no ticket.
    pub fn commit_search(&mut self) -> Option<SearchTicket> {
        self.search_debounce = None;
        let trimmed = self.search_input.trim();
        if self.view.is_search_loading() && trimmed == self.view.search_query().trim() {
            // Same query already in flight
            return None;
        }
        let ticket = self.view.set_search_query(&self.search_input);
        if ticket.is_none() {
            abort_task(&mut self.search_handle, "search");
        }
        self.reset_grid();
        ticket
    }

    /// Leave search input and return to the listing.
    pub fn exit_search(&mut self) {
        self.search_mode = false;
        self.search_input.clear();
        self.search_debounce = None;
        if !self.view.search_query().is_empty() || self.view.is_search_loading() {
            self.view.set_search_query("");
            abort_task(&mut self.search_handle, "search");
            self.reset_grid();
        }
    }

    // ========================================================================
    // Detail / help scrolling
    // ========================================================================

    pub fn scroll_up(&mut self, lines: usize) {
        match self.view.overlay() {
            Overlay::Help => {
                self.help_scroll_offset = self.help_scroll_offset.saturating_sub(lines);
            }
            _ => self.detail_scroll = self.detail_scroll.saturating_sub(lines),
        }
    }

    pub fn scroll_down(&mut self, lines: usize) {
        match self.view.overlay() {
            Overlay::Help => {
                self.help_scroll_offset =
                    self.help_scroll_offset.saturating_add(lines).min(MAX_SCROLL);
            }
            _ => self.detail_scroll = self.detail_scroll.saturating_add(lines).min(MAX_SCROLL),
        }
    }

    /// Clamp a scroll offset so the last line stays on screen.
    pub fn clamp_scroll(offset: usize, content_lines: usize, visible_lines: usize) -> usize {
        offset.min(content_lines.saturating_sub(visible_lines)).min(MAX_SCROLL)
    }

    /// Open the detail overlay for the focused card.
    pub fn open_detail(&mut self) -> Option<DetailTicket> {
        let summary = self.focused_movie()?.clone();
        self.detail_scroll = 0;
        self.detail_error = None;
        self.needs_redraw = true;
        Some(self.view.select_movie(summary))
    }

    /// Close the detail overlay and drop its in-flight fetch.
    pub fn close_detail(&mut self) {
        abort_task(&mut self.detail_handle, "detail");
        self.view.close_detail();
        self.detail_scroll = 0;
        self.detail_error = None;
        self.needs_redraw = true;
    }

    /// Poster URL of the movie in the detail view, or of the focused card.
    pub fn poster_url(&self) -> Option<String> {
        let movie = if self.view.is_detail_open() {
            self.view.selected_movie()
        } else {
            self.focused_movie()
        }?;
        self.catalog.image_url(movie.poster_path.as_deref())
    }

    /// Homepage of the movie in the detail view, once its record has loaded.
    pub fn homepage_url(&self) -> Option<String> {
        if !self.view.is_detail_open() {
            return None;
        }
        self.view
            .selected_detail()
            .and_then(MovieDetail::homepage)
            .map(str::to_string)
    }

    // ========================================================================
    // Status line
    // ========================================================================

    /// Set status message (auto-expires after 3 seconds).
    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now()));
        self.needs_redraw = true;
    }

    /// Clear the status message once expired. Returns true if one was cleared.
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, time)) = &self.status_message {
            if time.elapsed() >= STATUS_TTL {
                self.status_message = None;
                return true;
            }
        }
        false
    }
}

/// Abort a task handle if one is held.
pub fn abort_task(handle: &mut Option<JoinHandle<()>>, kind: &'static str) {
    if let Some(handle) = handle.take() {
        handle.abort();
        tracing::debug!(kind, "Aborted in-flight fetch");
    }
}

// ============================================================================
// Resource Cleanup
// ============================================================================

/// Abort all in-flight fetches so no task outlives the event loop.
impl Drop for App {
    fn drop(&mut self) {
        abort_task(&mut self.listing_handle, "listing");
        abort_task(&mut self.search_handle, "search");
        abort_task(&mut self.detail_handle, "detail");
    }
}
