//! View state for the movie browser.
//!
//! `ViewState` owns everything derived from the catalog: the current listing,
//! the active search, the selected movie and its detail record, the sort and
//! filter choices, and which overlay is showing. It performs no I/O. Operations
//! that need the network return a ticket; the caller runs the request and hands
//! the outcome back through the matching `apply_*` method.
//!
//! Each fetch kind has its own sequence counter. Issuing a ticket advances the
//! counter, and a completion is applied only while its sequence number is still
//! the latest for that kind, so the last intent always wins regardless of the
//! order in which responses arrive.

use crate::catalog::{ListingMode, MovieDetail, MovieSummary};
use std::cmp::Ordering;
use std::fmt::Display;

/// Presentation order for the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Release date, most recent first.
    #[default]
    Newest,
    Popularity,
    Alphabetical,
}

impl SortKey {
    pub const ALL: [SortKey; 3] = [SortKey::Newest, SortKey::Popularity, SortKey::Alphabetical];

    pub fn label(self) -> &'static str {
        match self {
            SortKey::Newest => "Newest",
            SortKey::Popularity => "Popularity",
            SortKey::Alphabetical => "Alphabetical",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LanguageFilter {
    #[default]
    All,
    /// Original language is not English.
    Subtitled,
    /// Original language is English.
    Dubbed,
}

impl LanguageFilter {
    pub const ALL: [LanguageFilter; 3] = [
        LanguageFilter::All,
        LanguageFilter::Subtitled,
        LanguageFilter::Dubbed,
    ];

    pub fn label(self) -> &'static str {
        match self {
            LanguageFilter::All => "All languages",
            LanguageFilter::Subtitled => "Subtitled",
            LanguageFilter::Dubbed => "Dubbed",
        }
    }

    fn matches(self, movie: &MovieSummary) -> bool {
        let english = movie.original_language.eq_ignore_ascii_case(INTERFACE_LANGUAGE);
        match self {
            LanguageFilter::All => true,
            LanguageFilter::Subtitled => !english,
            LanguageFilter::Dubbed => english,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MediaFilter {
    #[default]
    All,
    Series,
    Movies,
}

impl MediaFilter {
    pub const ALL: [MediaFilter; 3] = [MediaFilter::All, MediaFilter::Series, MediaFilter::Movies];

    pub fn label(self) -> &'static str {
        match self {
            MediaFilter::All => "All media",
            MediaFilter::Series => "Series",
            MediaFilter::Movies => "Movies",
        }
    }

    fn matches(self, movie: &MovieSummary) -> bool {
        match self {
            MediaFilter::All => true,
            MediaFilter::Series => movie.media_type.as_deref() == Some("tv"),
            MediaFilter::Movies => matches!(movie.media_type.as_deref(), None | Some("movie")),
        }
    }
}

const INTERFACE_LANGUAGE: &str = "en";

/// Grid filter. Both dimensions must match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FilterOptions {
    pub language: LanguageFilter,
    pub media: MediaFilter,
}

impl FilterOptions {
    pub fn is_default(&self) -> bool {
        *self == FilterOptions::default()
    }

    pub fn matches(&self, movie: &MovieSummary) -> bool {
        self.language.matches(movie) && self.media.matches(movie)
    }

    /// Short human-readable summary for the header, e.g. `Subtitled / Movies`.
    pub fn summary(&self) -> String {
        match (self.language, self.media) {
            (LanguageFilter::All, MediaFilter::All) => "No filter".to_string(),
            (LanguageFilter::All, media) => media.label().to_string(),
            (language, MediaFilter::All) => language.label().to_string(),
            (language, media) => format!("{} / {}", language.label(), media.label()),
        }
    }
}

/// The one panel layered over the grid, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Overlay {
    #[default]
    None,
    SortMenu,
    FilterMenu,
    Detail,
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingTicket {
    pub seq: u64,
    pub mode: ListingMode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    pub seq: u64,
    /// Trimmed query text.
    pub query: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailTicket {
    pub seq: u64,
    pub movie_id: u64,
}

/// Any request the view state wants performed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchTicket {
    Listing(ListingTicket),
    Search(SearchTicket),
    Detail(DetailTicket),
}

impl From<ListingTicket> for FetchTicket {
    fn from(ticket: ListingTicket) -> Self {
        FetchTicket::Listing(ticket)
    }
}

impl From<SearchTicket> for FetchTicket {
    fn from(ticket: SearchTicket) -> Self {
        FetchTicket::Search(ticket)
    }
}

impl From<DetailTicket> for FetchTicket {
    fn from(ticket: DetailTicket) -> Self {
        FetchTicket::Detail(ticket)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewState {
    listing_mode: ListingMode,
    raw_summaries: Vec<MovieSummary>,
    search_query: String,
    search_results: Option<Vec<MovieSummary>>,
    selected_movie: Option<MovieSummary>,
    selected_detail: Option<MovieDetail>,
    is_list_loading: bool,
    is_search_loading: bool,
    overlay: Overlay,
    sort_key: SortKey,
    filter_options: FilterOptions,
    listing_seq: u64,
    search_seq: u64,
    detail_seq: u64,
}

impl ViewState {
    pub fn new(mode: ListingMode) -> Self {
        Self {
            listing_mode: mode,
            ..Self::default()
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn listing_mode(&self) -> ListingMode {
        self.listing_mode
    }

    pub fn raw_summaries(&self) -> &[MovieSummary] {
        &self.raw_summaries
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn search_results(&self) -> Option<&[MovieSummary]> {
        self.search_results.as_deref()
    }

    pub fn selected_movie(&self) -> Option<&MovieSummary> {
        self.selected_movie.as_ref()
    }

    pub fn selected_detail(&self) -> Option<&MovieDetail> {
        self.selected_detail.as_ref()
    }

    pub fn is_list_loading(&self) -> bool {
        self.is_list_loading
    }

    pub fn is_search_loading(&self) -> bool {
        self.is_search_loading
    }

    pub fn overlay(&self) -> Overlay {
        self.overlay
    }

    pub fn is_detail_open(&self) -> bool {
        self.overlay == Overlay::Detail
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort_key
    }

    pub fn filter_options(&self) -> FilterOptions {
        self.filter_options
    }

    /// True when the trimmed query is non-empty.
    pub fn is_search_active(&self) -> bool {
        !self.search_query.trim().is_empty()
    }

    /// The summaries backing the grid: search results while a search is
    /// active and has produced a result, the listing otherwise.
    pub fn displayed(&self) -> &[MovieSummary] {
        match &self.search_results {
            Some(results) if self.is_search_active() => results,
            _ => &self.raw_summaries,
        }
    }

    /// `displayed()` with the filter applied, in sort order. Ties keep their
    /// `displayed()` order.
    pub fn arranged(&self) -> Vec<&MovieSummary> {
        let mut items: Vec<&MovieSummary> = self
            .displayed()
            .iter()
            .filter(|m| self.filter_options.matches(m))
            .collect();

        match self.sort_key {
            SortKey::Newest => items.sort_by(|a, b| match (a.release(), b.release()) {
                (Some(x), Some(y)) => y.cmp(&x),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }),
            SortKey::Popularity => items.sort_by(|a, b| b.popularity.total_cmp(&a.popularity)),
            SortKey::Alphabetical => items.sort_by(|a, b| {
                a.display_title()
                    .to_lowercase()
                    .cmp(&b.display_title().to_lowercase())
            }),
        }
        items
    }

    // ========================================================================
    // Listing
    // ========================================================================

    /// Switch the listing collection. Returns `None` when `mode` is already
    /// current.
    pub fn set_listing_mode(&mut self, mode: ListingMode) -> Option<ListingTicket> {
        if mode == self.listing_mode {
            return None;
        }
        self.listing_mode = mode;
        Some(self.reload_listing())
    }

    /// Re-fetch the current collection unconditionally.
    pub fn reload_listing(&mut self) -> ListingTicket {
        self.listing_seq += 1;
        self.is_list_loading = true;
        ListingTicket {
            seq: self.listing_seq,
            mode: self.listing_mode,
        }
    }

    /// Apply a listing completion. Returns `true` if it was current.
    pub fn apply_listing<E: Display>(
        &mut self,
        seq: u64,
        result: Result<Vec<MovieSummary>, E>,
    ) -> bool {
        if seq != self.listing_seq {
            tracing::debug!(seq, current = self.listing_seq, "Discarding stale listing result");
            return false;
        }
        match result {
            Ok(movies) => {
                tracing::debug!(count = movies.len(), mode = ?self.listing_mode, "Listing loaded");
                self.raw_summaries = movies;
            }
            Err(e) => {
                tracing::warn!(error = %e, mode = ?self.listing_mode, "Listing fetch failed");
            }
        }
        self.is_list_loading = false;
        true
    }

    // ========================================================================
    // Search
    // ========================================================================

    /// Store the query. A blank query ends the search without a request and
    /// invalidates any search still in flight.
    pub fn set_search_query(&mut self, text: &str) -> Option<SearchTicket> {
        self.search_query = text.to_string();
        self.search_seq += 1;

        let trimmed = text.trim();
        if trimmed.is_empty() {
            self.search_results = None;
            self.is_search_loading = false;
            return None;
        }

        self.is_search_loading = true;
        Some(SearchTicket {
            seq: self.search_seq,
            query: trimmed.to_string(),
        })
    }

    /// Apply a search completion. A failed search shows as an empty result
    /// set. Returns `true` if it was current.
    pub fn apply_search<E: Display>(
        &mut self,
        seq: u64,
        result: Result<Vec<MovieSummary>, E>,
    ) -> bool {
        if seq != self.search_seq {
            tracing::debug!(seq, current = self.search_seq, "Discarding stale search result");
            return false;
        }
        match result {
            Ok(movies) => {
                tracing::debug!(count = movies.len(), query = %self.search_query.trim(), "Search completed");
                self.search_results = Some(movies);
            }
            Err(e) => {
                tracing::warn!(error = %e, query = %self.search_query.trim(), "Search failed");
                self.search_results = Some(Vec::new());
            }
        }
        self.is_search_loading = false;
        true
    }

    // ========================================================================
    // Detail
    // ========================================================================

    /// Open the detail overlay for `summary` right away; the detail record
    /// follows when the returned ticket resolves.
    pub fn select_movie(&mut self, summary: MovieSummary) -> DetailTicket {
        self.detail_seq += 1;
        let movie_id = summary.id;
        self.selected_movie = Some(summary);
        self.selected_detail = None;
        self.overlay = Overlay::Detail;
        DetailTicket {
            seq: self.detail_seq,
            movie_id,
        }
    }

    /// Apply a detail completion. Ignored unless the request is still the
    /// latest, the overlay is still open and the same movie is selected.
    pub fn apply_detail<E: Display>(
        &mut self,
        seq: u64,
        movie_id: u64,
        result: Result<MovieDetail, E>,
    ) -> bool {
        let selected_id = self.selected_movie.as_ref().map(|m| m.id);
        if seq != self.detail_seq || !self.is_detail_open() || selected_id != Some(movie_id) {
            tracing::debug!(seq, movie_id, "Discarding stale detail result");
            return false;
        }
        match result {
            Ok(detail) if detail.id == movie_id => {
                self.selected_detail = Some(detail);
            }
            Ok(detail) => {
                tracing::warn!(
                    movie_id,
                    received_id = detail.id,
                    "Detail response is for a different movie"
                );
            }
            Err(e) => {
                tracing::warn!(error = %e, movie_id, "Detail fetch failed");
            }
        }
        true
    }

    pub fn close_detail(&mut self) {
        let was_open = self.is_detail_open()
            || self.selected_movie.is_some()
            || self.selected_detail.is_some();
        if !was_open {
            return;
        }
        self.detail_seq += 1;
        if self.overlay == Overlay::Detail {
            self.overlay = Overlay::None;
        }
        self.selected_movie = None;
        self.selected_detail = None;
    }

    // ========================================================================
    // Sort, filter and overlays
    // ========================================================================

    pub fn set_sort_key(&mut self, key: SortKey) {
        self.sort_key = key;
    }

    pub fn set_filter(&mut self, options: FilterOptions) {
        self.filter_options = options;
    }

    /// Returns `false` while the detail overlay is showing.
    pub fn open_sort_menu(&mut self) -> bool {
        self.open_panel(Overlay::SortMenu)
    }

    /// Returns `false` while the detail overlay is showing.
    pub fn open_filter_menu(&mut self) -> bool {
        self.open_panel(Overlay::FilterMenu)
    }

    pub fn open_help(&mut self) -> bool {
        self.open_panel(Overlay::Help)
    }

    /// Close whatever overlay is showing. Dismissing the detail overlay is
    /// the same as `close_detail`.
    pub fn dismiss_overlay(&mut self) {
        match self.overlay {
            Overlay::Detail => self.close_detail(),
            Overlay::SortMenu | Overlay::FilterMenu | Overlay::Help => {
                self.overlay = Overlay::None;
            }
            Overlay::None => {}
        }
    }

    fn open_panel(&mut self, panel: Overlay) -> bool {
        if self.is_detail_open() {
            return false;
        }
        self.overlay = panel;
        true
    }
}
