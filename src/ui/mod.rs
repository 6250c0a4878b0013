//! Terminal User Interface module.
//!
//! This module provides the TUI for the movie browser, including:
//! - Main event loop (`run`)
//! - Input handling for the grid, overlays and search input
//! - Rendering for the header, card grid, detail view and menus
//! - Background fetch spawning and completion processing
//!
//! # Module Structure
//!
//! - `loop_runner` - Main event loop and terminal management
//! - `input` - Keyboard input handling
//! - `events` - Background task event processing
//! - `helpers` - Fetch spawning and browser hand-off
//! - `render` - Screen layout and overlay dispatch
//! - `header` - Heading, tabs and search bar
//! - `grid` - Movie card grid
//! - `detail` - Detail overlay
//! - `menus` - Sort and filter menus
//! - `help` - Keybinding help overlay
//! - `status` - Status bar widget

mod detail;
mod events;
mod grid;
mod header;
mod help;
mod helpers;
mod input;
mod loop_runner;
mod menus;
mod render;
mod status;
#[cfg(test)]
mod test_support;

// Re-export the public API
pub use loop_runner::{run, Action};
