//! Theme system for the TUI.
//!
//! Provides semantic color roles that map to ratatui `Style` values.
//! The `ThemeVariant` enum selects between Dark and Light palettes,
//! and `StyleMap` resolves role names to concrete styles.

use ratatui::style::{Color, Modifier, Style};
use std::collections::HashMap;

// ============================================================================
// Theme Variant
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeVariant {
    #[default]
    Dark,
    Light,
}

impl ThemeVariant {
    /// Parse a variant name from a string (case-insensitive).
    pub fn from_str_name(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }

    pub fn palette(self) -> ColorPalette {
        match self {
            Self::Dark => ColorPalette::dark(),
            Self::Light => ColorPalette::light(),
        }
    }

    /// Dark → Light → Dark.
    pub fn next(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Dark => "Dark",
            Self::Light => "Light",
        }
    }
}

// ============================================================================
// Color Palette: semantic roles to Style
// ============================================================================

/// A complete color palette mapping every semantic UI role to a `Style`.
#[derive(Debug, Clone)]
pub struct ColorPalette {
    // -- Header --
    pub header_title: Style,
    pub header_meta: Style,
    pub tab_active: Style,
    pub tab_inactive: Style,
    pub search_bar: Style,
    pub search_bar_active: Style,

    // -- Movie grid --
    pub card_border: Style,
    pub card_border_selected: Style,
    pub card_title: Style,
    pub card_year: Style,
    pub card_rating: Style,
    pub card_overview: Style,
    pub grid_empty: Style,

    // -- Detail view --
    pub detail_title: Style,
    pub detail_tagline: Style,
    pub detail_label: Style,
    pub detail_body: Style,
    pub detail_loading: Style,
    pub detail_link: Style,

    // -- Menus --
    pub menu_border: Style,
    pub menu_option: Style,
    pub menu_cursor: Style,
    pub menu_heading: Style,

    // -- Chrome --
    pub status_bar: Style,
    pub status_error: Style,
    pub spinner: Style,
}

impl ColorPalette {
    fn dark() -> Self {
        Self {
            header_title: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            header_meta: Style::default().fg(Color::Gray),
            tab_active: Style::default()
                .bg(Color::Cyan)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::Gray),
            search_bar: Style::default().fg(Color::DarkGray),
            search_bar_active: Style::default().fg(Color::Yellow),

            card_border: Style::default().fg(Color::DarkGray),
            card_border_selected: Style::default().fg(Color::Cyan),
            card_title: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            card_year: Style::default().fg(Color::Gray),
            card_rating: Style::default().fg(Color::Yellow),
            card_overview: Style::default().fg(Color::Gray),
            grid_empty: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),

            detail_title: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            detail_tagline: Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::ITALIC),
            detail_label: Style::default().fg(Color::DarkGray),
            detail_body: Style::default(),
            detail_loading: Style::default().fg(Color::Yellow),
            detail_link: Style::default().fg(Color::Blue),

            menu_border: Style::default().fg(Color::Cyan),
            menu_option: Style::default(),
            menu_cursor: Style::default().bg(Color::DarkGray).fg(Color::White),
            menu_heading: Style::default().add_modifier(Modifier::BOLD),

            status_bar: Style::default().bg(Color::DarkGray).fg(Color::White),
            status_error: Style::default().bg(Color::DarkGray).fg(Color::LightRed),
            spinner: Style::default().fg(Color::Cyan),
        }
    }

    /// Light palette, adapted for light terminal backgrounds.
    fn light() -> Self {
        Self {
            header_title: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            header_meta: Style::default().fg(Color::DarkGray),
            tab_active: Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::DarkGray),
            search_bar: Style::default().fg(Color::DarkGray),
            search_bar_active: Style::default().fg(Color::Magenta),

            card_border: Style::default().fg(Color::Gray),
            card_border_selected: Style::default().fg(Color::Blue),
            card_title: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            card_year: Style::default().fg(Color::DarkGray),
            card_rating: Style::default().fg(Color::Magenta),
            card_overview: Style::default().fg(Color::DarkGray),
            grid_empty: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),

            detail_title: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            detail_tagline: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
            detail_label: Style::default().fg(Color::DarkGray),
            detail_body: Style::default().fg(Color::Black),
            detail_loading: Style::default().fg(Color::Magenta),
            detail_link: Style::default().fg(Color::Blue),

            menu_border: Style::default().fg(Color::Blue),
            menu_option: Style::default().fg(Color::Black),
            menu_cursor: Style::default().bg(Color::Blue).fg(Color::White),
            menu_heading: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),

            status_bar: Style::default().bg(Color::White).fg(Color::Black),
            status_error: Style::default().bg(Color::White).fg(Color::Red),
            spinner: Style::default().fg(Color::Blue),
        }
    }
}

// ============================================================================
// Style Map: string-keyed lookup
// ============================================================================

/// Role-name keyed style lookup, built from a `ColorPalette`.
#[derive(Debug, Clone)]
pub struct StyleMap {
    map: HashMap<&'static str, Style>,
}

/// All semantic role names, in declaration order.
const ROLE_NAMES: [&str; 26] = [
    "header_title",
    "header_meta",
    "tab_active",
    "tab_inactive",
    "search_bar",
    "search_bar_active",
    "card_border",
    "card_border_selected",
    "card_title",
    "card_year",
    "card_rating",
    "card_overview",
    "grid_empty",
    "detail_title",
    "detail_tagline",
    "detail_label",
    "detail_body",
    "detail_loading",
    "detail_link",
    "menu_border",
    "menu_option",
    "menu_cursor",
    "menu_heading",
    "status_bar",
    "status_error",
    "spinner",
];

impl StyleMap {
    pub fn from_palette(p: &ColorPalette) -> Self {
        let styles: [Style; 26] = [
            p.header_title,
            p.header_meta,
            p.tab_active,
            p.tab_inactive,
            p.search_bar,
            p.search_bar_active,
            p.card_border,
            p.card_border_selected,
            p.card_title,
            p.card_year,
            p.card_rating,
            p.card_overview,
            p.grid_empty,
            p.detail_title,
            p.detail_tagline,
            p.detail_label,
            p.detail_body,
            p.detail_loading,
            p.detail_link,
            p.menu_border,
            p.menu_option,
            p.menu_cursor,
            p.menu_heading,
            p.status_bar,
            p.status_error,
            p.spinner,
        ];

        let map = ROLE_NAMES.iter().copied().zip(styles).collect();
        Self { map }
    }

    /// Resolve a role name to its `Style`. Returns `Style::default()` for unknown roles.
    pub fn resolve(&self, role: &str) -> Style {
        self.map.get(role).copied().unwrap_or_default()
    }
}

// ============================================================================
// Tests
// ============================================================================
